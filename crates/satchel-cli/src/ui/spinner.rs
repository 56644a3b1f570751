//! Simple spinner for tasks without known duration.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

/// Spinner shown while the installer or the archive pass runs.
///
/// # Examples
///
/// ```no_run
/// use satchel_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Installing dependencies...");
/// // Do work...
/// spinner.finish("Dependencies installed");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("valid template")
                .tick_strings(&["◐", "◓", "◑", "◒"]),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Update the message while the spinner is running.
    pub fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    /// Finish with a success message and a green checkmark.
    pub fn finish(&self, message: &str) {
        self.pb
            .finish_with_message(format!("{} {}", "✓".green(), message));
    }

    /// Finish with an error message and a red X.
    pub fn abandon(&self, message: &str) {
        self.pb
            .abandon_with_message(format!("{} {}", "✗".red(), message));
    }
}
