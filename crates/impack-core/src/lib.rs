#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]

//! Core engine for impack.
//!
//! Rewrites a tree of compiled JavaScript modules so every import/export
//! specifier is a resolvable relative path, flattens external dependencies
//! into the output tree, and produces a manifest of every module the
//! artifact needs at run time.

pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod import_map;
pub mod pack;
pub mod paths;
pub mod probe;
pub mod resolver;
pub mod rewrite;

pub use config::PackConfig;
pub use error::Error;
pub use graph::{build_manifest, Manifest};
pub use import_map::ImportMap;
pub use pack::pack;
pub use resolver::{AliasPlugin, ResolvedId, Resolver, ResolverPlugin};
pub use rewrite::{rewrite_all, RewriteSession};
