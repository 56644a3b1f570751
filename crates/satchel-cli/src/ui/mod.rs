//! Terminal UI utilities for spinners and formatted output.
//!
//! Status messages go to stderr so the tool stays pipe-friendly; the
//! pack summary is the only stdout output. Color handling respects the
//! NO_COLOR / FORCE_COLOR conventions and degrades in CI.

// Submodules
mod format;
mod messages;
mod spinner;

// Re-exports for convenient access
pub use format::{format_duration, format_size};
pub use messages::{info, success, warning};
pub use spinner::Spinner;

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Initialize color support based on environment.
///
/// owo-colors respects NO_COLOR and terminal capabilities on its own; this
/// exists for explicit initialization and future extensibility.
pub fn init_colors() {
    let _ = should_use_color();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_wins() {
        std::env::set_var("NO_COLOR", "1");
        assert!(!should_use_color());
        std::env::remove_var("NO_COLOR");
    }
}
