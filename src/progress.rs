//! Progress display for directory scans
//!
//! One reporter follows a scan through both phases: an indeterminate
//! spinner while the tree is walked for manifest files, then a bar over
//! the discovered files as they are parsed. It draws on stderr, so piped
//! output stays clean.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Progress reporter the scanner drives while it works
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    /// Create a reporter showing the discovery spinner
    ///
    /// A disabled reporter accepts every call but draws nothing.
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        bar.set_message("Scanning for manifest files...");
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Create a reporter that draws nothing
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Switch from the discovery spinner to a bar over the found files
    pub fn begin_parsing(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})")
                .expect("Invalid template")
                .progress_chars("█▓▒░"),
        );
        self.bar.set_message("Parsing manifests");
    }

    /// Record one file as parsed
    pub fn file_done(&self, path: &Path) {
        if let Some(name) = path.file_name() {
            self.bar
                .set_message(format!("Parsed {}", name.to_string_lossy()));
        }
        self.bar.inc(1);
    }

    /// Remove the display
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
