//! Satchel CLI - tutorial bundle packager.
//!
//! This crate provides the command-line interface over `satchel-pack`: a
//! one-shot build tool that zips an installed tutorial project and emits the
//! dependency-free extraction script the sandboxed runtime uses to
//! materialize it.
//!
//! # Architecture
//!
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Terminal UI utilities for spinners and status messages
//! - `cli` - clap argument definitions
//! - `commands` - Individual CLI command implementations

// Public modules
pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, Result};
