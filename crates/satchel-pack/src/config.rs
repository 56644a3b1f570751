//! Packager configuration and file-based discovery.
//!
//! Configuration lives in a `satchel.toml` at the repository root, or in a
//! `satchel` field of `package.json`. Every field has a default matching the
//! layout the tutorial runtime expects, so a bare `satchel pack` works on a
//! conventionally laid out repository.
//!
//! The destructive pre-build reset is an explicit `reset_before_build` flag
//! here rather than ambient process state; callers that want the hosted-CI
//! behavior read their environment and set the flag themselves.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// Default project identifier; also names the output artifacts.
pub const DEFAULT_PROJECT: &str = "tutorial";

/// Default directory holding tutorial projects, relative to the repo root.
pub const DEFAULT_CONTENT_DIR: &str = "content/tutorial";

/// Default client-adapter directory receiving the output artifacts.
pub const DEFAULT_ADAPTERS_DIR: &str = "src/lib/client/adapters";

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_content_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CONTENT_DIR)
}

fn default_adapters_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ADAPTERS_DIR)
}

/// Executable shim the extraction script installs under `node_modules/.bin`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinLink {
    /// Well-known binary name the sandboxed runtime invokes
    pub name: String,
    /// Symlink target relative to `node_modules/.bin`
    pub target: String,
}

impl Default for BinLink {
    fn default() -> Self {
        Self {
            name: "esbuild".to_string(),
            target: "../esbuild/bin/esbuild".to_string(),
        }
    }
}

/// Exclusion and remap rule configuration.
///
/// The defaults reproduce the bundle-size trims the tutorial runtime relies
/// on: editor droppings, type declarations, source maps, installer shims, a
/// rollup internals directory, and the native esbuild binaries that the
/// WASM variant replaces.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Excluded exact basenames (final path segment)
    pub basenames: Vec<String>,
    /// Excluded path suffixes
    pub extensions: Vec<String>,
    /// Excluded directory prefixes (matched with a trailing separator)
    pub directories: Vec<String>,
    /// Bulk-excluded vendor package prefixes
    pub packages: Vec<String>,
    /// Vendor prefix rewritten in archive entry names
    pub remap_from: String,
    /// Replacement prefix
    pub remap_to: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            basenames: vec![".DS_Store".to_string(), "LICENSE".to_string()],
            extensions: vec![".d.ts".to_string(), ".map".to_string()],
            directories: vec![
                "node_modules/.bin".to_string(),
                "node_modules/rollup/dist/shared".to_string(),
            ],
            packages: vec![
                "node_modules/esbuild/".to_string(),
                "node_modules/@esbuild/".to_string(),
            ],
            remap_from: "node_modules/esbuild-wasm/".to_string(),
            remap_to: "node_modules/esbuild/".to_string(),
        }
    }
}

/// Complete packager configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Project identifier; names the project directory and both artifacts
    pub project: String,

    /// Directory holding tutorial projects, relative to the repo root
    pub content_dir: PathBuf,

    /// Client-adapter directory receiving the artifacts, relative to the root
    pub adapters_dir: PathBuf,

    /// Package installer command; `None` selects one from lock files
    pub installer: Option<Vec<String>>,

    /// Run the destructive content reset before anything else
    pub reset_before_build: bool,

    /// Reset command; `None` means `git clean -d -f <content_dir>`
    pub reset_command: Option<Vec<String>>,

    /// Custom extraction-script source; `None` uses the embedded template
    pub script_source: Option<PathBuf>,

    /// Executable shim installed at extraction time
    pub bin_link: BinLink,

    /// Exclusion and remap rules
    pub rules: RuleConfig,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            project: default_project(),
            content_dir: default_content_dir(),
            adapters_dir: default_adapters_dir(),
            installer: None,
            reset_before_build: false,
            reset_command: None,
            script_source: None,
            bin_link: BinLink::default(),
            rules: RuleConfig::default(),
        }
    }
}

impl PackConfig {
    /// Directory of the tutorial project being packaged.
    pub fn project_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.content_dir).join(&self.project)
    }

    /// Directory receiving both output artifacts.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.adapters_dir).join(&self.project)
    }

    /// Path of the archive artifact.
    pub fn archive_path(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join(format!("{}.zip", self.project))
    }

    /// Path of the extraction-script artifact.
    pub fn script_path(&self, root: &Path) -> PathBuf {
        self.output_dir(root).join("unzip.cjs")
    }

    /// The reset command to run when `reset_before_build` is set.
    pub fn effective_reset_command(&self) -> Vec<String> {
        match &self.reset_command {
            Some(argv) => argv.clone(),
            None => vec![
                "git".to_string(),
                "clean".to_string(),
                "-d".to_string(),
                "-f".to_string(),
                self.content_dir.to_string_lossy().into_owned(),
            ],
        }
    }

    /// Validate settings that cannot be caught by deserialization alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project.is_empty() || self.project.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "project".to_string(),
                hint: "must be a non-empty name without path separators".to_string(),
            });
        }

        for (field, argv) in [
            ("installer", &self.installer),
            ("reset_command", &self.reset_command),
        ] {
            if let Some(argv) = argv {
                if argv.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        hint: "command must have at least a program name".to_string(),
                    });
                }
            }
        }

        if self.rules.remap_from == self.rules.remap_to {
            return Err(ConfigError::InvalidValue {
                field: "rules.remap_from".to_string(),
                hint: "remap source and target must differ".to_string(),
            });
        }
        if !self.rules.remap_from.ends_with('/') || !self.rules.remap_to.ends_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "rules.remap_from".to_string(),
                hint: "remap prefixes must end with '/'".to_string(),
            });
        }

        if self.bin_link.name.is_empty() || self.bin_link.target.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "bin_link".to_string(),
                hint: "both name and target are required".to_string(),
            });
        }

        Ok(())
    }
}

/// File-based configuration discovery.
///
/// Searches the repository root for configuration in this order:
/// 1. `satchel.toml`
/// 2. `package.json` with a `satchel` field
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    /// Create a discovery rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Find a config file, if any.
    pub fn find(&self) -> Option<PathBuf> {
        let toml_path = self.root.join("satchel.toml");
        if toml_path.exists() {
            return Some(toml_path);
        }

        let pkg_path = self.root.join("package.json");
        if pkg_path.exists() {
            if let Ok(content) = std::fs::read_to_string(&pkg_path) {
                if let Ok(parsed) = serde_json::from_str::<Value>(&content) {
                    if parsed.get("satchel").is_some_and(|v| !v.is_null()) {
                        return Some(pkg_path);
                    }
                }
            }
        }

        None
    }

    /// Load config from the discovered file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if no config file exists.
    pub fn load(&self) -> Result<PackConfig, ConfigError> {
        let path = self.find().ok_or(ConfigError::NotFound)?;
        self.load_from(&path)
    }

    /// Load config, falling back to defaults when nothing is on disk.
    pub fn load_or_default(&self) -> Result<PackConfig, ConfigError> {
        match self.load() {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound) => Ok(PackConfig::default()),
            Err(e) => Err(e),
        }
    }

    fn load_from(&self, path: &Path) -> Result<PackConfig, ConfigError> {
        if path.file_name() == Some(std::ffi::OsStr::new("package.json")) {
            return self.load_from_package_json(path);
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ConfigError::InvalidToml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn load_from_package_json(&self, path: &Path) -> Result<PackConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let parsed: Value = serde_json::from_str(&content).map_err(|e| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let field = parsed.get("satchel").ok_or_else(|| ConfigError::InvalidValue {
            field: "satchel".to_string(),
            hint: "add a \"satchel\" field to package.json".to_string(),
        })?;

        serde_json::from_value(field.clone()).map_err(|e| ConfigError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
