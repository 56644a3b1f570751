//! Check command implementation.
//!
//! Offline validation: the configuration parses, derived paths make sense,
//! and the filter rules still name the vendor directories they are supposed
//! to trim. The filters are plain string matches, so a renamed dependency
//! silently stops being filtered; this command is where that drift shows up.

use satchel_pack::{ConfigDiscovery, FilterRules, PackConfig, PackageManager};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::{CliError, Result};
use crate::ui;

/// Vendor package prefixes the bundle must not carry; the native binaries
/// they cover are replaced by the WASM variant at extraction time.
const EXPECTED_PACKAGE_PREFIXES: [&str; 2] = ["node_modules/esbuild/", "node_modules/@esbuild/"];

/// Execute the check command.
pub fn execute(args: CheckArgs) -> Result<()> {
    let root = utils::resolve_root(args.cwd.as_deref())?;

    let discovery = ConfigDiscovery::new(&root);
    let config = match discovery.find() {
        Some(path) => {
            ui::info(&format!("Using config: {}", path.display()));
            discovery.load()?
        }
        None => {
            ui::info("No config found; defaults are in effect");
            PackConfig::default()
        }
    };

    config.validate()?;

    let mut warnings = Vec::new();

    let project_dir = config.project_dir(&root);
    if !project_dir.is_dir() {
        return Err(CliError::ValidationFailed(format!(
            "project directory not found: {}",
            project_dir.display()
        )));
    }
    if !project_dir.join("package.json").is_file() {
        warnings.push(format!(
            "no package.json in {}; the install step will fail",
            project_dir.display()
        ));
    }

    if config.installer.is_none() {
        let manager = PackageManager::detect(&project_dir);
        ui::info(&format!("Installer: {manager} (detected from lock files)"));
    }

    for prefix in EXPECTED_PACKAGE_PREFIXES {
        if !config.rules.packages.iter().any(|p| p == prefix) {
            warnings.push(format!(
                "bulk exclusion for {prefix} is missing; the bundle may carry large native binaries"
            ));
        }
    }
    if !config
        .rules
        .packages
        .iter()
        .any(|p| p.as_str() == config.rules.remap_to.as_str())
    {
        warnings.push(format!(
            "remap target {} is not bulk-excluded; remapped entries may collide with originals",
            config.rules.remap_to
        ));
    }

    let rules = FilterRules::from_config(&config.rules);
    ui::info(&format!(
        "{} exclusion rules, remap {} -> {}",
        rules.rules().len(),
        rules.remap().from(),
        rules.remap().to()
    ));

    for warning in &warnings {
        ui::warning(warning);
    }

    if args.strict && !warnings.is_empty() {
        return Err(CliError::ValidationFailed(format!(
            "{} warning(s) with --strict",
            warnings.len()
        )));
    }

    ui::success("Configuration is valid");
    Ok(())
}
