//! Progress reporting for the extraction phase
//!
//! Bars draw on stderr so a report written to stdout stays clean.

use crate::core::parallel::ProgressUpdate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}";

/// Progress reporter for a cruise
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
    verbose: bool,
}

impl ProgressReporter {
    /// A reporter that draws nothing when `enabled` is false
    pub fn new(enabled: bool, verbose: bool) -> Self {
        let bar = enabled.then(|| {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            let style = ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .map(|style| style.progress_chars("#>-"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        });

        Self { bar, verbose }
    }

    /// A reporter that never draws
    pub fn hidden() -> Self {
        Self::new(false, false)
    }

    pub fn is_enabled(&self) -> bool {
        self.bar.is_some()
    }

    /// Start a new progress operation
    pub fn start(&self, total: usize, operation: &str) {
        if let Some(bar) = &self.bar {
            bar.reset();
            bar.set_length(total as u64);
            bar.set_message(operation.to_string());
        }
        if self.verbose {
            tracing::debug!(total, "{}", operation);
        }
    }

    pub fn update(&self, current: usize, total: usize, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
            bar.set_message(message.to_string());
        }
    }

    pub fn update_from(&self, progress: ProgressUpdate) {
        self.update(progress.current, progress.total, &progress.message);
    }

    /// Finish and clear the bar
    pub fn finish(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        if self.verbose {
            tracing::debug!("{}", message);
        }
    }
}

/// Create a progress callback that feeds a shared reporter
pub fn create_progress_callback(reporter: Arc<ProgressReporter>) -> impl Fn(ProgressUpdate) + Send + Sync {
    move |progress: ProgressUpdate| {
        reporter.update_from(progress);
    }
}
