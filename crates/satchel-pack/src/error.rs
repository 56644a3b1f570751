//! Error types for configuration loading and the packaging pipeline.
//!
//! Two layers: [`ConfigError`] for everything that can go wrong before a run
//! starts, and [`PackError`] for the run itself. Every pipeline failure is
//! fatal; there is no retry or partial-success path, so each variant carries
//! enough context to identify the failing step from the process exit message.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias using [`PackError`] as the default error type.
pub type Result<T, E = PackError> = std::result::Result<T, E>;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No satchel.toml or package.json `satchel` field was found
    #[error("config not found\n\nHint: create a satchel.toml or add a \"satchel\" field to package.json")]
    NotFound,

    /// Config file has invalid TOML syntax
    #[error("invalid TOML in {}: {message}", .path.display())]
    InvalidToml {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// Config file has invalid JSON syntax (package.json route)
    #[error("invalid JSON in {}: {message}", .path.display())]
    InvalidJson {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A field holds a value the packager cannot work with
    #[error("invalid config value for '{field}': {hint}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// What a correct value looks like
        hint: String,
    },

    /// The tutorial project directory does not exist
    #[error("project directory not found: {}\n\nHint: check the 'project' and 'content_dir' settings", .0.display())]
    ProjectDirNotFound(PathBuf),

    /// I/O error while reading config
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Packaging pipeline errors.
///
/// Ordered roughly by pipeline stage: reset, install, enumerate, read,
/// serialize, write.
#[derive(Debug, Error)]
pub enum PackError {
    /// Configuration problems surfaced during the run
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The destructive content reset did not exit cleanly. A stale content
    /// tree must never feed the bundle, so this aborts before any packaging.
    #[error("environment reset failed: `{command}` exited with {status}")]
    ResetFailed {
        /// Rendered command line
        command: String,
        /// Exit status of the reset process
        status: ExitStatus,
    },

    /// The package installer did not exit cleanly; no archive is produced
    #[error("dependency install failed: `{command}` exited with {status}\n\nHint: run the installer manually in the project directory to see its output")]
    InstallFailed {
        /// Rendered command line
        command: String,
        /// Exit status of the installer process
        status: ExitStatus,
    },

    /// An external command could not be launched at all
    #[error("failed to launch `{command}`: {source}")]
    CommandSpawn {
        /// Rendered command line
        command: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed partway through enumeration
    #[error("failed to walk project tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A file selected for the archive could not be read (e.g. broken
    /// symlink). The whole run aborts; a silently missing dependency file
    /// would break the sandboxed runtime much later.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Zip serialization failed
    #[error("archive serialization failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// An output artifact could not be written
    #[error("failed to write {}: {source}\n\nHint: check free space and directory permissions", .path.display())]
    Write {
        /// Output path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A user-supplied extraction script source does not exist
    #[error("extraction script source not found: {}", .0.display())]
    ScriptSourceNotFound(PathBuf),

    /// Other I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_messages_carry_hints() {
        let err = ConfigError::NotFound;
        assert!(err.to_string().contains("satchel.toml"));

        let err = ConfigError::ProjectDirNotFound(PathBuf::from("content/tutorial/demo"));
        let msg = err.to_string();
        assert!(msg.contains("content/tutorial/demo"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn pack_error_from_config_error() {
        let err: PackError = ConfigError::NotFound.into();
        assert!(matches!(err, PackError::Config(_)));
    }

    #[test]
    fn read_error_names_the_file() {
        let err = PackError::Read {
            path: PathBuf::from("node_modules/vite/package.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("node_modules/vite/package.json"));
    }
}
