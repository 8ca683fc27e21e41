//! Fontbatch Core - parallel batch conversion of font files.
//!
//! Files are discovered in a single directory, converted one per task on a
//! bounded worker pool by an external executable, and collected in
//! completion order for progress display and a final summary.

pub mod config;
pub mod convert;
pub mod discover;
mod error;
pub mod pool;
pub mod progress;
pub mod run;
pub mod summary;

pub use convert::{
    ConversionOutcome, ConversionResult, ConversionTask, Converter, ExternalConverter, FailureKind,
};
pub use discover::discover_fonts;
pub use error::{Error, Result};
pub use pool::{Completions, Dispatcher, default_worker_count, detected_cpus, worker_count};
pub use progress::ProgressReporter;
pub use run::{RunObserver, RunOptions, RunOutcome, RunPlan, run};
pub use summary::{FailedFile, RunStatistics, RunSummary};
