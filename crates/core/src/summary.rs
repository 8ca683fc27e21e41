//! Run statistics and the final summary.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::ConversionResult;

/// A failed conversion as listed in the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedFile {
    pub filename: String,
    pub message: String,
}

/// Running totals for one run, owned by the thread draining results.
#[derive(Debug)]
pub struct RunStatistics {
    total: usize,
    succeeded: usize,
    failed: usize,
    processing_time: Duration,
    failures: Vec<FailedFile>,
    started: Instant,
    started_at: DateTime<Local>,
}

impl RunStatistics {
    /// Start the wall clock for a run of `total` files.
    pub fn start(total: usize) -> Self {
        Self {
            total,
            succeeded: 0,
            failed: 0,
            processing_time: Duration::ZERO,
            failures: Vec::new(),
            started: Instant::now(),
            started_at: Local::now(),
        }
    }

    pub fn record(&mut self, result: &ConversionResult) {
        if result.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
            self.failures.push(FailedFile {
                filename: result.filename.clone(),
                message: result.error_message().to_string(),
            });
        }
        self.processing_time += result.elapsed;
    }

    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Stop the wall clock.
    pub fn finish(self) -> RunSummary {
        RunSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            processing_time: self.processing_time,
            wall_time: self.started.elapsed(),
            failures: self.failures,
            started_at: self.started_at,
            finished_at: Local::now(),
        }
    }
}

/// Final, immutable statistics of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sum of per-file conversion times.
    pub processing_time: Duration,
    pub wall_time: Duration,
    /// Failures in the order their results were collected.
    pub failures: Vec<FailedFile>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunSummary {
    /// Mean conversion time per file; zero for an empty run.
    pub fn average_per_file(&self) -> Duration {
        match u32::try_from(self.total) {
            Ok(0) => Duration::ZERO,
            Ok(total) => self.processing_time / total,
            Err(_) => {
                Duration::from_secs_f64(self.processing_time.as_secs_f64() / self.total as f64)
            }
        }
    }

    /// Successful conversions per wall-clock second; zero when no time
    /// elapsed.
    pub fn throughput(&self) -> f64 {
        let secs = self.wall_time.as_secs_f64();
        if secs > 0.0 { self.succeeded as f64 / secs } else { 0.0 }
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
