//! # satchel-pack
//!
//! Packages a tutorial project's installed dependency tree into a zip
//! archive plus a dependency-free extraction script, for unpacking inside a
//! sandboxed in-browser runtime that cannot reach a package registry.
//!
//! The pipeline is a single synchronous pass: optionally reset the content
//! tree, run the package installer, enumerate the project files, filter them
//! through the exclusion rules, remap the browser/WASM vendor directory back
//! to its native location, serialize everything to one zip blob, and write
//! the blob plus the extraction script to the client-adapter directory.
//!
//! Every step is all-or-nothing: any failure aborts the run before the
//! output artifacts are touched, so a bundle on disk is always complete.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use satchel_pack::{pack, PackConfig};
//!
//! # fn main() -> Result<(), satchel_pack::PackError> {
//! let config = PackConfig::default();
//! let summary = pack(&config, Path::new("."))?;
//! println!(
//!     "{} entries -> {}",
//!     summary.entry_count,
//!     summary.archive_path.display()
//! );
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod installer;
pub mod rules;
pub mod script;
pub mod walk;

use std::path::{Path, PathBuf};

use tracing::info;

pub use archive::{Archive, ArchiveEntry, ExclusionReport};
pub use config::{BinLink, ConfigDiscovery, PackConfig, RuleConfig};
pub use error::{ConfigError, PackError, Result};
pub use installer::PackageManager;
pub use rules::{ExcludeRule, FilterRules, PathRemap};

/// What a completed run produced.
#[derive(Debug)]
pub struct PackSummary {
    /// Path of the written archive blob
    pub archive_path: PathBuf,
    /// Path of the written extraction script
    pub script_path: PathBuf,
    /// Number of entries in the archive
    pub entry_count: usize,
    /// Serialized archive size in bytes
    pub archive_bytes: usize,
    /// What the filters removed
    pub exclusions: ExclusionReport,
}

/// Run the full packaging pipeline.
///
/// `repo_root` anchors every relative path in the configuration. On success
/// both artifacts are on disk; on failure neither has been overwritten
/// (except for a disk-level fault between the two final writes).
pub fn pack(config: &PackConfig, repo_root: &Path) -> Result<PackSummary> {
    config.validate()?;

    installer::prepare_environment(config, repo_root)?;

    let project_dir = config.project_dir(repo_root);
    if !project_dir.is_dir() {
        return Err(ConfigError::ProjectDirNotFound(project_dir).into());
    }

    installer::install_dependencies(config, &project_dir)?;

    let rules = FilterRules::from_config(&config.rules);
    let (archive, exclusions) = Archive::build(&project_dir, &rules)?;
    let bytes = archive.serialize()?;

    // Render the script before the first write so a bad source cannot leave
    // a bundle without its extractor.
    let script_text = script::render_extraction_script(config, repo_root)?;

    let archive_path = config.archive_path(repo_root);
    if let Some(parent) = archive_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PackError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&archive_path, &bytes).map_err(|source| PackError::Write {
        path: archive_path.clone(),
        source,
    })?;

    let script_path = script::write_script(&script_text, config, repo_root)?;

    info!(
        entries = archive.len(),
        excluded = exclusions.excluded(),
        bytes = bytes.len(),
        archive = %archive_path.display(),
        "bundle written"
    );

    Ok(PackSummary {
        archive_path,
        script_path,
        entry_count: archive.len(),
        archive_bytes: bytes.len(),
        exclusions,
    })
}
