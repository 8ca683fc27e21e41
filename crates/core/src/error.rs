//! Error types for fontbatch runs.

use std::{io, path::PathBuf, result};

use glob::PatternError;
use rayon::ThreadPoolBuildError;

/// Errors that abort a run before any conversion is dispatched.
///
/// Failures of individual conversions are never reported through this type;
/// they are folded into [`ConversionResult`](crate::ConversionResult).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to list directory {}: {source}", path.display())]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("invalid file pattern: {0}")]
    Glob(#[from] PatternError),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

pub type Result<T> = result::Result<T, Error>;
