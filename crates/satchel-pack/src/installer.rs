//! Environment preparation and dependency installation.
//!
//! Both steps shell out synchronously and block until the child exits, so
//! enumeration never observes a half-installed tree. A non-zero exit from
//! either command is fatal for the whole run.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::config::PackConfig;
use crate::error::{ConfigError, PackError, Result};

/// Package manager driving the install step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl PackageManager {
    /// Detect the package manager from lock files.
    ///
    /// Detection order (highest priority first):
    /// 1. `pnpm-lock.yaml` → pnpm
    /// 2. `yarn.lock` → yarn
    /// 3. `bun.lockb` → bun
    /// 4. Default to npm (also covers package-lock.json)
    pub fn detect(project_dir: &Path) -> Self {
        if project_dir.join("pnpm-lock.yaml").exists() {
            PackageManager::Pnpm
        } else if project_dir.join("yarn.lock").exists() {
            PackageManager::Yarn
        } else if project_dir.join("bun.lockb").exists() {
            PackageManager::Bun
        } else {
            PackageManager::Npm
        }
    }

    /// The install command line for this package manager.
    pub fn install_argv(&self) -> Vec<String> {
        let argv: &[&str] = match self {
            // bare `yarn` installs
            PackageManager::Yarn => &["yarn"],
            PackageManager::Npm => &["npm", "install"],
            PackageManager::Pnpm => &["pnpm", "install"],
            PackageManager::Bun => &["bun", "install"],
        };
        argv.iter().map(|s| s.to_string()).collect()
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        };
        write!(f, "{name}")
    }
}

fn render(argv: &[String]) -> String {
    argv.join(" ")
}

fn run(argv: &[String], cwd: &Path) -> Result<std::process::ExitStatus> {
    let (program, args) = argv.split_first().ok_or_else(|| {
        PackError::Config(ConfigError::InvalidValue {
            field: "command".to_string(),
            hint: "command must have at least a program name".to_string(),
        })
    })?;

    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .map_err(|source| PackError::CommandSpawn {
            command: render(argv),
            source,
        })
}

/// Reset the content tree to its checked-in state when configured to do so.
///
/// When `reset_before_build` is unset this is a no-op: the reset command is
/// never invoked. When set, a failing reset aborts before any packaging work
/// so a stale tree cannot silently produce a corrupt bundle.
pub fn prepare_environment(config: &PackConfig, repo_root: &Path) -> Result<()> {
    if !config.reset_before_build {
        return Ok(());
    }

    let argv = config.effective_reset_command();
    info!(command = %render(&argv), "resetting content tree");

    let status = run(&argv, repo_root)?;
    if !status.success() {
        return Err(PackError::ResetFailed {
            command: render(&argv),
            status,
        });
    }
    Ok(())
}

/// Run the package installer synchronously in the project directory.
///
/// Uses the configured installer when set, otherwise the one detected from
/// lock files. Must complete successfully before enumeration starts.
pub fn install_dependencies(config: &PackConfig, project_dir: &Path) -> Result<()> {
    let argv = config
        .installer
        .clone()
        .unwrap_or_else(|| PackageManager::detect(project_dir).install_argv());
    info!(command = %render(&argv), dir = %project_dir.display(), "installing dependencies");

    let status = run(&argv, project_dir)?;
    if !status.success() {
        return Err(PackError::InstallFailed {
            command: render(&argv),
            status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn detect_prefers_pnpm_then_yarn_then_bun() {
        let dir = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Npm);

        File::create(dir.path().join("bun.lockb")).unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Bun);

        File::create(dir.path().join("yarn.lock")).unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Yarn);

        File::create(dir.path().join("pnpm-lock.yaml")).unwrap();
        assert_eq!(PackageManager::detect(dir.path()), PackageManager::Pnpm);
    }

    #[test]
    fn yarn_installs_with_a_bare_invocation() {
        assert_eq!(PackageManager::Yarn.install_argv(), vec!["yarn"]);
        assert_eq!(PackageManager::Npm.install_argv(), vec!["npm", "install"]);
    }

    #[test]
    fn reset_is_never_invoked_when_flag_unset() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("reset-ran");
        let config = PackConfig {
            reset_before_build: false,
            reset_command: Some(vec![
                "touch".to_string(),
                marker.to_string_lossy().into_owned(),
            ]),
            ..PackConfig::default()
        };

        prepare_environment(&config, dir.path()).unwrap();
        assert!(!marker.exists());
    }

    #[test]
    fn reset_runs_when_flag_set() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("reset-ran");
        let config = PackConfig {
            reset_before_build: true,
            reset_command: Some(vec![
                "touch".to_string(),
                marker.to_string_lossy().into_owned(),
            ]),
            ..PackConfig::default()
        };

        prepare_environment(&config, dir.path()).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn failing_reset_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig {
            reset_before_build: true,
            reset_command: Some(vec!["false".to_string()]),
            ..PackConfig::default()
        };

        let result = prepare_environment(&config, dir.path());
        assert!(matches!(result, Err(PackError::ResetFailed { .. })));
    }

    #[test]
    fn failing_installer_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig {
            installer: Some(vec!["false".to_string()]),
            ..PackConfig::default()
        };

        let result = install_dependencies(&config, dir.path());
        assert!(matches!(result, Err(PackError::InstallFailed { .. })));
    }

    #[test]
    fn succeeding_installer_is_ok() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig {
            installer: Some(vec!["true".to_string()]),
            ..PackConfig::default()
        };

        install_dependencies(&config, dir.path()).unwrap();
    }

    #[test]
    fn unlaunchable_installer_reports_spawn_failure() {
        let dir = TempDir::new().unwrap();
        let config = PackConfig {
            installer: Some(vec!["satchel-test-no-such-binary".to_string()]),
            ..PackConfig::default()
        };

        let result = install_dependencies(&config, dir.path());
        assert!(matches!(result, Err(PackError::CommandSpawn { .. })));
    }
}
