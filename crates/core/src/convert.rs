//! Single-file conversion through an external executable.

use std::{
    fmt,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    time::{Duration, Instant},
};

use log::{debug, warn};

use crate::config::DEFAULT_CONVERTER;

/// One unit of work: convert the font at `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionTask {
    path: PathBuf,
}

impl ConversionTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name used to identify the task in results and reports.
    pub fn filename(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Why a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The input file was gone when the task started.
    FileMissing,
    /// The converter ran and exited non-zero.
    NonZeroExit,
    /// The converter could not be launched or waited on.
    Invocation,
    /// The task panicked before producing a result.
    TaskPanicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::FileMissing => "file missing",
            FailureKind::NonZeroExit => "converter failed",
            FailureKind::Invocation => "invocation error",
            FailureKind::TaskPanicked => "task panicked",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    Success,
    Failure { kind: FailureKind, message: String },
}

/// The outcome of exactly one [`ConversionTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub filename: String,
    pub outcome: ConversionOutcome,
    pub elapsed: Duration,
}

impl ConversionResult {
    pub fn success(filename: impl Into<String>, elapsed: Duration) -> Self {
        Self { filename: filename.into(), outcome: ConversionOutcome::Success, elapsed }
    }

    pub fn failure(
        filename: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            filename: filename.into(),
            outcome: ConversionOutcome::Failure { kind, message: message.into() },
            elapsed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Success)
    }

    /// Error message, empty on success.
    pub fn error_message(&self) -> &str {
        match &self.outcome {
            ConversionOutcome::Success => "",
            ConversionOutcome::Failure { message, .. } => message,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.outcome {
            ConversionOutcome::Success => None,
            ConversionOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

/// Converts one font file.
///
/// Implementations never fail past their own boundary: every error is
/// reported as a failed [`ConversionResult`].
pub trait Converter: Send + Sync {
    fn convert(&self, task: &ConversionTask) -> ConversionResult;
}

/// Runs `<program> <input-path>` and judges the result by its exit status.
///
/// The converter is expected to write its output next to the input; that
/// file is not inspected here.
#[derive(Debug, Clone)]
pub struct ExternalConverter {
    program: PathBuf,
}

impl ExternalConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ExternalConverter {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERTER)
    }
}

impl Converter for ExternalConverter {
    fn convert(&self, task: &ConversionTask) -> ConversionResult {
        let start = Instant::now();
        let filename = task.filename();

        if !task.path().exists() {
            warn!("{filename}: file not found");
            return ConversionResult::failure(
                filename,
                FailureKind::FileMissing,
                "file not found",
                start.elapsed(),
            );
        }

        debug!("Running {} {}", self.program.display(), task.path().display());
        let output = Command::new(&self.program)
            .arg(task.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        let result = match output {
            Ok(output) if output.status.success() => {
                ConversionResult::success(filename, start.elapsed())
            }
            Ok(output) => {
                debug!("{filename}: converter exited with {}", output.status);
                let stderr = String::from_utf8_lossy(&output.stderr);
                ConversionResult::failure(
                    filename,
                    FailureKind::NonZeroExit,
                    last_diagnostic_line(&stderr),
                    start.elapsed(),
                )
            }
            Err(e) => ConversionResult::failure(
                filename,
                FailureKind::Invocation,
                format!("system error: {e}"),
                start.elapsed(),
            ),
        };

        if let ConversionOutcome::Failure { kind, message } = &result.outcome {
            warn!("{}: {kind}: {message}", result.filename);
        }
        result
    }
}

/// Last non-empty line of a converter's error stream.
fn last_diagnostic_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .rfind(|line| !line.is_empty())
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_diagnostic_line() {
        assert_eq!(last_diagnostic_line("warning\nbad glyph table\n"), "bad glyph table");
        assert_eq!(last_diagnostic_line("first\nsecond\n\n  \n"), "second");
        assert_eq!(last_diagnostic_line("crlf\r\n"), "crlf");
    }

    #[test]
    fn test_empty_stderr_is_unknown_error() {
        assert_eq!(last_diagnostic_line(""), "unknown error");
        assert_eq!(last_diagnostic_line("\n\n"), "unknown error");
    }

    #[test]
    fn test_task_filename() {
        assert_eq!(ConversionTask::new("/fonts/Regular.otf").filename(), "Regular.otf");
    }

    #[test]
    fn test_missing_file_does_not_launch() {
        let converter = ExternalConverter::new("/nonexistent/converter");
        let result = converter.convert(&ConversionTask::new("/nonexistent/font.otf"));

        assert!(!result.is_success());
        assert_eq!(result.failure_kind(), Some(FailureKind::FileMissing));
        assert_eq!(result.error_message(), "file not found");
        assert_eq!(result.filename, "font.otf");
    }

    #[test]
    fn test_missing_executable_is_system_error() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("a.otf");
        std::fs::write(&font, b"").unwrap();

        let converter = ExternalConverter::new(dir.path().join("no-such-converter"));
        let result = converter.convert(&ConversionTask::new(&font));

        assert_eq!(result.failure_kind(), Some(FailureKind::Invocation));
        assert!(result.error_message().starts_with("system error: "));
    }

    #[test]
    fn test_success_result_has_empty_message() {
        let result = ConversionResult::success("a.otf", Duration::from_millis(5));
        assert!(result.is_success());
        assert_eq!(result.error_message(), "");
        assert_eq!(result.failure_kind(), None);
    }
}
