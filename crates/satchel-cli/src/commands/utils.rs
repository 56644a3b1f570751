//! Shared helpers for command implementations.

use std::path::{Path, PathBuf};

use crate::error::{CliError, Result};

/// Resolve the repository root from the optional `--cwd` flag.
///
/// An explicit path must exist and be a directory; relative paths are made
/// absolute against the process working directory.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => {
            let absolute = if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()?.join(path)
            };

            if !absolute.exists() {
                return Err(CliError::InvalidArgument(format!(
                    "Specified --cwd directory does not exist: {}",
                    absolute.display()
                )));
            }
            if !absolute.is_dir() {
                return Err(CliError::InvalidArgument(format!(
                    "Specified --cwd is not a directory: {}",
                    absolute.display()
                )));
            }

            Ok(absolute)
        }
        None => Ok(std::env::current_dir()?),
    }
}
