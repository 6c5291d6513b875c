//! Progress callbacks. Every pass reports into one continuous scale of
//! `100 * nb_passes` units so observers see a single bar.

use std::sync::atomic::{AtomicU64, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

/// Receives `current / total` updates. Called concurrently from workers.
pub trait ProgressReporter: Sync {
    fn report(&self, current: u64, total: u64, label: &str);

    fn finish(&self) {}
}

/// Discards every update.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _current: u64, _total: u64, _label: &str) {}
}

/// Logs at `debug` each time another tenth of the run completes.
#[derive(Default)]
pub struct LogProgress {
    last_decile: AtomicU64,
}

impl ProgressReporter for LogProgress {
    fn report(&self, current: u64, total: u64, label: &str) {
        if total == 0 {
            return;
        }
        let decile = current * 10 / total;
        if self.last_decile.fetch_max(decile, Ordering::Relaxed) < decile {
            log::debug!("{label}: {}%", decile * 10);
        }
    }
}

/// Terminal progress bar.
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }
}

impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for IndicatifProgress {
    fn report(&self, current: u64, total: u64, label: &str) {
        if self.bar.length() != Some(total) {
            self.bar.set_length(total);
        }
        self.bar.set_position(current);
        self.bar.set_message(label.to_string());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Rescales one pass's `[0, 1]` fraction into the run-wide scale:
/// `current = 100 * (fraction + pass)`, `total = 100 * nb_passes`.
pub struct PassProgress<'a> {
    reporter: &'a dyn ProgressReporter,
    pass: u64,
    nb_passes: u64,
    label: String,
}

impl<'a> PassProgress<'a> {
    pub fn new(
        reporter: &'a dyn ProgressReporter,
        pass: u64,
        nb_passes: u64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            reporter,
            pass,
            nb_passes,
            label: label.into(),
        }
    }

    pub fn current(&self, fraction: f64) -> u64 {
        let fraction = fraction.clamp(0.0, 1.0);
        (100.0 * (fraction + self.pass as f64)).round() as u64
    }

    pub fn total(&self) -> u64 {
        100 * self.nb_passes
    }

    pub fn update(&self, fraction: f64) {
        self.reporter
            .report(self.current(fraction), self.total(), &self.label);
    }

    pub fn complete(&self) {
        self.update(1.0);
    }
}
