#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod logging;

use clap::Parser;
use impack_core::PackConfig;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "impack")]
#[command(author, version, about = "Packs compiled module trees into self-contained, import-mapped artifacts", long_about = None)]
struct Cli {
    /// Import map JSON file (missing or malformed files load as empty)
    #[arg(value_name = "IMPORT_MAP", default_value = "import-map.json")]
    import_map: PathBuf,

    /// Directory containing the compiled module tree
    #[arg(value_name = "DIRECTORY", default_value = "build")]
    directory: PathBuf,

    /// Build the manifest from this entrypoint's transitive imports
    /// (default: every module file under the directory)
    #[arg(long, value_name = "FILE")]
    entrypoint: Option<PathBuf>,

    /// Emit the module list in worker config format instead of JSON
    #[arg(long)]
    capnp: bool,

    /// Worker config template to splice the module list into (implies --capnp)
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Rewrite the tree without printing the manifest
    #[arg(long)]
    silent: bool,

    /// Extract embedded service workers while packing (experimental,
    /// requires a script host)
    #[arg(long)]
    extract_services: bool,

    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON formatted logs (stable, machine-readable)
    #[arg(long)]
    json: bool,

    /// Override the working directory
    #[arg(long, value_name = "PATH")]
    cwd: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = PackConfig::new(cwd, cli.directory)
        .with_import_map(cli.import_map)
        .with_capnp(cli.capnp)
        .with_silent(cli.silent)
        .with_extract_services(cli.extract_services);

    if let Some(entrypoint) = cli.entrypoint {
        config = config.with_entrypoint(entrypoint);
    }
    if let Some(template) = cli.template {
        config = config.with_template(template);
    }

    tracing::debug!(?config, "pack configuration");
    commands::pack::run(&config)
}
