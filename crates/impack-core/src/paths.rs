//! Slash-path arithmetic.
//!
//! Specifiers and manifest keys are slash-delimited paths relative to the
//! working directory. All arithmetic here is lexical: nothing touches the
//! filesystem, so candidates can be computed for files that do not exist yet.

use std::path::Path;

/// Strip a single leading `./` from a slash path.
#[must_use]
pub fn strip_dot_prefix(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

/// Lexically normalize a slash path: drops `.` and empty segments, resolves
/// `..` against preceding segments (clamped at the root for relative paths).
#[must_use]
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut out: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(out.last(), Some(&s) if s != "..") {
                    out.pop();
                } else if !absolute {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }

    let joined = out.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Join a specifier onto a directory and normalize the result.
///
/// `rel` starting with `/` replaces `dir` outright, like `path.resolve`.
#[must_use]
pub fn join(dir: &str, rel: &str) -> String {
    if rel.starts_with('/') {
        normalize(rel)
    } else if dir.is_empty() {
        normalize(rel)
    } else {
        normalize(&format!("{dir}/{rel}"))
    }
}

/// Directory portion of a slash path ("" for a bare filename).
#[must_use]
pub fn dir_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Count of shared leading segments of two slash paths.
///
/// Walks segment-by-segment while segments are equal, stopping when either
/// path is exhausted.
#[must_use]
pub fn shared_prefix_segments(a: &str, b: &str) -> usize {
    a.split('/')
        .zip(b.split('/'))
        .take_while(|(x, y)| x == y)
        .count()
}

/// Express `target` (working-directory-relative) relative to the file that
/// will contain it, via shared-prefix arithmetic.
///
/// When the containing directory and the target share no leading segment,
/// the containing directory is treated as the shared root (shift count 0)
/// rather than producing an undefined number of `..` hops.
#[must_use]
pub fn rebase(target: &str, containing_file: &str) -> String {
    let target = normalize(strip_dot_prefix(target));
    let dir = dir_of(&normalize(strip_dot_prefix(containing_file))).to_string();

    if dir.is_empty() {
        return format!("./{target}");
    }

    let shared = shared_prefix_segments(&dir, &target);
    let ups = if shared == 0 {
        0
    } else {
        dir.split('/').count() - shared
    };

    let rest = target
        .split('/')
        .skip(shared)
        .collect::<Vec<_>>()
        .join("/");

    if ups == 0 {
        format!("./{rest}")
    } else {
        let mut spec = String::new();
        for _ in 0..ups {
            spec.push_str("../");
        }
        spec.push_str(&rest);
        spec
    }
}

/// Render a filesystem path as a slash-delimited string.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
