//! Project tree enumeration.
//!
//! Produces the lazy sequence of regular files under a project directory.
//! Hidden (dot-prefixed) entries are traversed like any other; directories
//! contribute only their prefix to the emitted paths. Paths use `/` as the
//! separator regardless of the host convention, and entries are sorted by
//! file name so archive ordering is reproducible across runs.

use std::path::Path;

use walkdir::WalkDir;

use crate::error::{PackError, Result};

/// Enumerate every regular file under `root` as a normalized relative path.
///
/// Symlinks are followed; a dangling link therefore surfaces as a walk error
/// instead of silently dropping the file it should have pointed at.
pub fn enumerate_files(root: &Path) -> impl Iterator<Item = Result<String>> + '_ {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    return None;
                }
                Some(Ok(normalize(entry.path(), root)))
            }
            Err(e) => Some(Err(PackError::Walk(e))),
        })
}

/// Convert an absolute path under `root` into a `/`-separated relative path.
fn normalize(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.join("/")
}
