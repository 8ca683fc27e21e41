//! Configuration constants for batch font conversion.

/// Source font extension matched when none is given.
pub const DEFAULT_EXTENSION: &str = "otf";

/// Converter executable, invoked as `otf2ttf <input-path>`.
pub const DEFAULT_CONVERTER: &str = "otf2ttf";

/// Worker threads started per logical CPU.
pub const WORKERS_PER_CPU: usize = 2;

/// Upper bound on the worker pool size.
pub const MAX_WORKERS: usize = 32;

/// Width of banner and report rules.
pub const DISPLAY_WIDTH: usize = 80;

/// Characters of a filename shown on a progress line before truncation.
pub const FILENAME_DISPLAY_CHARS: usize = 40;

/// Characters of an error message shown on a progress line.
pub const ERROR_EXCERPT_CHARS: usize = 50;
