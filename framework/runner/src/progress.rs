use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a test renders, with the latest renderer output as its message.
pub struct RenderProgress {
    pb: ProgressBar,
}

impl RenderProgress {
    /// Start a spinner for the named test. With `enabled` false nothing is drawn, which is
    /// what you want in CI logs.
    pub fn start(test_name: &str, enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {prefix}: {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_prefix(test_name.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));

        Self { pb }
    }

    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn update(&self, line: &str) {
        if self.pb.is_hidden() {
            return;
        }

        let line = line.trim();
        if !line.is_empty() {
            self.pb.set_message(line.to_string());
        }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}
