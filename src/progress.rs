//! Progress reporting for long-running stages.
//!
//! Each stage calls [`ProgressReporter::start`] with a label and the number of
//! steps it will take, [`ProgressReporter::advance`] as it completes them, and
//! [`ProgressReporter::finish`] at the end. Reporting is purely cosmetic.

use std::time::Instant;

use log::{debug, info};

/// Receives stage progress.
pub trait ProgressReporter {
    /// Begin a new task.
    fn start(&mut self, label: &str, total: usize);

    /// Record `steps` completed steps of the current task.
    fn advance(&mut self, steps: usize);

    /// Mark the current task as complete.
    fn finish(&mut self);
}

/// Discards all progress updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&mut self, _label: &str, _total: usize) {}

    fn advance(&mut self, _steps: usize) {}

    fn finish(&mut self) {}
}

/// Reports progress through the `log` facade.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    total: usize,
    done: usize,
    interval: usize,
    last_reported: usize,
    started: Option<Instant>,
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl LogProgress {
    /// Create a reporter that logs every `interval` steps.
    pub fn new(interval: usize) -> Self {
        LogProgress {
            label: String::new(),
            total: 0,
            done: 0,
            interval: interval.max(1),
            last_reported: 0,
            started: None,
        }
    }

    /// Steps completed in the current task.
    pub fn completed(&self) -> usize {
        self.done
    }
}

impl ProgressReporter for LogProgress {
    fn start(&mut self, label: &str, total: usize) {
        self.label = label.to_string();
        self.total = total;
        self.done = 0;
        self.last_reported = 0;
        self.started = Some(Instant::now());
        info!("{label}");
    }

    fn advance(&mut self, steps: usize) {
        self.done += steps;
        if self.done - self.last_reported >= self.interval {
            self.last_reported = self.done;
            debug!("{}: {}/{}", self.label, self.done, self.total);
        }
    }

    fn finish(&mut self) {
        let elapsed = self
            .started
            .take()
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        info!(
            "{}: done ({}/{}) in {}ms",
            self.label, self.done, self.total, elapsed
        );
    }
}
