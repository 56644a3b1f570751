//! Command-line interface definition for the Satchel packager.
//!
//! Defines the CLI structure with clap v4 derive macros. Flags mirror the
//! configuration fields so anything in `satchel.toml` can be overridden per
//! invocation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Satchel - packages tutorial projects for sandboxed execution
#[derive(Parser, Debug)]
#[command(
    name = "satchel",
    version,
    about = "Packages a tutorial project into a zip bundle plus extraction script",
    long_about = "Satchel installs a tutorial project's dependencies, filters the resulting\n\
                  tree, and packages it into a single zip archive with a dependency-free\n\
                  extraction script, ready for a sandboxed in-browser runtime that cannot\n\
                  reach a package registry."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows each excluded file with the rule that removed it.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available Satchel subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Package the tutorial project into a bundle
    ///
    /// Runs the full pipeline: optional content reset, dependency install,
    /// enumeration, filtering, archiving, and artifact emission.
    Pack(PackArgs),

    /// Validate configuration without packaging
    ///
    /// Checks that the configuration parses, the project directory exists,
    /// and the filter rules still cover the well-known vendor directories.
    Check(CheckArgs),
}

/// Arguments for the pack command
#[derive(Args, Debug, Default)]
pub struct PackArgs {
    /// Repository root directory
    ///
    /// All relative paths (content directory, adapter directory, script
    /// source) resolve against this. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Project identifier
    ///
    /// Names the project directory under the content directory and both
    /// output artifacts.
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Directory holding tutorial projects
    #[arg(long, value_name = "DIR")]
    pub content_dir: Option<PathBuf>,

    /// Client-adapter directory receiving the artifacts
    #[arg(long, value_name = "DIR")]
    pub adapters_dir: Option<PathBuf>,

    /// Package installer command, e.g. "yarn" or "npm install"
    ///
    /// Overrides lock-file detection. The string is split on whitespace.
    #[arg(long, value_name = "CMD")]
    pub installer: Option<String>,

    /// Custom extraction-script source file
    #[arg(long, value_name = "FILE")]
    pub script_source: Option<PathBuf>,

    /// Force the destructive content reset before packaging
    ///
    /// Without this flag (or --no-reset), the reset runs only when the
    /// config requests it or a managed hosting environment is detected.
    #[arg(long, conflicts_with = "no_reset")]
    pub reset: bool,

    /// Never run the content reset, even on managed hosting
    #[arg(long)]
    pub no_reset: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Repository root directory
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}
