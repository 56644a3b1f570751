//! Logging infrastructure for the Satchel CLI.
//!
//! Structured logging on the `tracing` ecosystem. Verbosity is driven by the
//! global CLI flags, with `RUST_LOG` as the escape hatch for custom filters.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber with the specified options.
///
/// Call once at the start of the program, before any logging occurs.
///
/// The logging level is determined in this order:
/// 1. `--verbose` flag: DEBUG for satchel crates
/// 2. `--quiet` flag: errors only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for satchel crates
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new("satchel=debug,satchel_pack=debug,satchel_cli=debug")
    } else if quiet {
        EnvFilter::new("satchel=error,satchel_pack=error,satchel_cli=error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("satchel=info,satchel_pack=info,satchel_cli=info"))
    };

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
