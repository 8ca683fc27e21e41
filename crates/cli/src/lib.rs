//! Fontbatch CLI library.

pub mod cli;
pub mod report;

/// Exit code when the run could not start (missing directory, no pool).
pub const FATAL_EXIT_CODE: u8 = 3;
