//! Pack command implementation.
//!
//! Merges configuration (CLI flags over `satchel.toml` over defaults),
//! resolves the hosted-environment reset behavior, and drives the library
//! pipeline with progress reporting.

use std::time::Instant;

use console::style;
use satchel_pack::{pack, ConfigDiscovery, PackConfig, PackSummary};
use tracing::debug;

use crate::cli::PackArgs;
use crate::commands::utils;
use crate::error::Result;
use crate::ui;

/// Execute the pack command.
///
/// # Pipeline
///
/// 1. Resolve the repository root and load configuration
/// 2. Apply CLI overrides and decide the reset behavior
/// 3. Run the packaging pipeline with a spinner
/// 4. Display the bundle summary
pub fn execute(args: PackArgs) -> Result<()> {
    let start = Instant::now();
    let root = utils::resolve_root(args.cwd.as_deref())?;

    let mut config = ConfigDiscovery::new(&root).load_or_default()?;
    apply_overrides(&mut config, &args, hosted_environment());
    config.validate()?;

    if config.reset_before_build {
        ui::info("Resetting content tree to its checked-in state");
    }

    let spinner = ui::Spinner::new(&format!("Packing {}...", config.project));
    let summary = match pack(&config, &root) {
        Ok(summary) => summary,
        Err(e) => {
            spinner.abandon("Packaging failed");
            return Err(e.into());
        }
    };
    spinner.finish(&format!(
        "Bundle complete → {}",
        summary.archive_path.display()
    ));

    for (rule, count) in summary.exclusions.by_rule() {
        debug!(rule, count, "exclusions");
    }
    print_summary(&summary, start.elapsed());

    Ok(())
}

/// Fold CLI flags into the discovered configuration.
///
/// The reset decision: an explicit `--reset` / `--no-reset` wins; otherwise
/// the config flag, or the managed-hosting detection when the config is
/// silent.
fn apply_overrides(config: &mut PackConfig, args: &PackArgs, hosted: bool) {
    if let Some(project) = &args.project {
        config.project = project.clone();
    }
    if let Some(dir) = &args.content_dir {
        config.content_dir = dir.clone();
    }
    if let Some(dir) = &args.adapters_dir {
        config.adapters_dir = dir.clone();
    }
    if let Some(installer) = &args.installer {
        config.installer = Some(
            installer
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        );
    }
    if let Some(source) = &args.script_source {
        config.script_source = Some(source.clone());
    }

    config.reset_before_build = if args.reset {
        true
    } else if args.no_reset {
        false
    } else {
        config.reset_before_build || hosted
    };
}

/// Managed hosting marks its builds with the VERCEL environment variable;
/// builds there must start from a clean checked-in tree.
fn hosted_environment() -> bool {
    std::env::var_os("VERCEL").is_some_and(|v| !v.is_empty())
}

fn print_summary(summary: &PackSummary, elapsed: std::time::Duration) {
    println!(
        "  {} entries | {} excluded | {} | {}",
        style(summary.entry_count).cyan(),
        style(summary.exclusions.excluded()).yellow(),
        ui::format_size(summary.archive_bytes),
        ui::format_duration(elapsed)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn overrides_replace_discovered_values() {
        let mut config = PackConfig::default();
        let args = PackArgs {
            project: Some("orders".to_string()),
            installer: Some("npm install".to_string()),
            script_source: Some(PathBuf::from("custom.cjs")),
            ..PackArgs::default()
        };

        apply_overrides(&mut config, &args, false);

        assert_eq!(config.project, "orders");
        assert_eq!(
            config.installer,
            Some(vec!["npm".to_string(), "install".to_string()])
        );
        assert_eq!(config.script_source, Some(PathBuf::from("custom.cjs")));
    }

    #[test]
    fn explicit_reset_flag_wins_over_everything() {
        let mut config = PackConfig::default();
        let args = PackArgs {
            reset: true,
            ..PackArgs::default()
        };
        apply_overrides(&mut config, &args, false);
        assert!(config.reset_before_build);
    }

    #[test]
    fn no_reset_overrides_hosted_detection() {
        let mut config = PackConfig {
            reset_before_build: true,
            ..PackConfig::default()
        };
        let args = PackArgs {
            no_reset: true,
            ..PackArgs::default()
        };
        apply_overrides(&mut config, &args, true);
        assert!(!config.reset_before_build);
    }

    #[test]
    fn hosted_environment_seeds_reset_when_config_is_silent() {
        let mut config = PackConfig::default();
        apply_overrides(&mut config, &PackArgs::default(), true);
        assert!(config.reset_before_build);

        let mut config = PackConfig::default();
        apply_overrides(&mut config, &PackArgs::default(), false);
        assert!(!config.reset_before_build);
    }
}
