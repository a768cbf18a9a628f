//! Progress reporting module

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress over the inputs of one run
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: None,
            quiet,
        }
    }

    /// Show a bar over `total` inputs
    ///
    /// A single input gets no bar.
    pub fn start(&mut self, total: u64) {
        if self.quiet || total < 2 {
            return;
        }

        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] {bar:40.green/white} {pos}/{len} inputs {wide_msg}")
        {
            bar.set_style(style.progress_chars("##-"));
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        self.bar = Some(bar);
    }

    /// Mark one input as done
    pub fn completed(&self, source: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(source.to_string());
            bar.inc(1);
        }
    }

    /// Remove the bar
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
