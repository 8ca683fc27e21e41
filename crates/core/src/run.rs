//! Whole-run driver: discover, dispatch, collect, summarize.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::{DateTime, Local};
use log::info;

use crate::{
    ConversionTask, Converter, Dispatcher, ProgressReporter, Result, RunStatistics, RunSummary,
    config::DEFAULT_EXTENSION, detected_cpus, discover_fonts, worker_count,
};

/// Options resolved once, before discovery starts.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub dir: PathBuf,
    pub extension: String,
    /// Logical CPUs the default worker count was derived from.
    pub cpus: usize,
    pub workers: usize,
    pub show_progress: bool,
}

impl RunOptions {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let cpus = detected_cpus();
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
            cpus,
            workers: worker_count(cpus),
            show_progress: true,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

/// What a run is about to do, announced once files have been found.
#[derive(Debug, Clone)]
pub struct RunPlan<'a> {
    pub dir: &'a Path,
    pub extension: &'a str,
    pub files: usize,
    pub cpus: usize,
    pub workers: usize,
    pub started_at: DateTime<Local>,
}

/// Hook for printing the run banner before dispatch.
pub trait RunObserver {
    fn on_start(&mut self, plan: &RunPlan<'_>);
}

impl RunObserver for () {
    fn on_start(&mut self, _plan: &RunPlan<'_>) {}
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The directory held no matching files; nothing was dispatched.
    NoFiles,
    Completed(RunSummary),
}

impl RunOutcome {
    /// Process exit code: 0 when every conversion succeeded, 1 when any
    /// failed, 2 when there was nothing to convert.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Completed(summary) if summary.all_succeeded() => 0,
            RunOutcome::Completed(_) => 1,
            RunOutcome::NoFiles => 2,
        }
    }
}

/// Convert every matching file in `options.dir`.
///
/// Fails only before dispatch (missing directory, pool creation). Once
/// tasks are submitted the run always completes with a summary, however
/// many conversions fail.
pub fn run<C>(
    options: &RunOptions,
    converter: Arc<C>,
    observer: &mut impl RunObserver,
) -> Result<RunOutcome>
where
    C: Converter + ?Sized + 'static,
{
    let fonts = discover_fonts(&options.dir, &options.extension)?;
    if fonts.is_empty() {
        info!("No .{} files in {}, nothing to do", options.extension, options.dir.display());
        return Ok(RunOutcome::NoFiles);
    }

    let total = fonts.len();
    let dispatcher = Dispatcher::new(options.workers)?;
    observer.on_start(&RunPlan {
        dir: &options.dir,
        extension: &options.extension,
        files: total,
        cpus: options.cpus,
        workers: dispatcher.workers(),
        started_at: Local::now(),
    });

    let mut stats = RunStatistics::start(total);
    let mut reporter = ProgressReporter::new(total, options.show_progress);
    let tasks = fonts.into_iter().map(ConversionTask::new).collect();
    for result in dispatcher.dispatch(tasks, converter) {
        reporter.record(&result);
        stats.record(&result);
    }

    let summary = stats.finish();
    info!(
        "Run finished: {} succeeded, {} failed in {:.3}s",
        summary.succeeded,
        summary.failed,
        summary.wall_time.as_secs_f64()
    );
    Ok(RunOutcome::Completed(summary))
}

#[cfg(test)]
mod tests {
    use std::{fs::write, time::Duration};

    use tempfile::tempdir;

    use super::*;
    use crate::{Error, pool::SleepConverter};

    #[derive(Default)]
    struct Recorder {
        plans: Vec<(usize, usize)>,
        cpus: Vec<usize>,
    }

    impl RunObserver for Recorder {
        fn on_start(&mut self, plan: &RunPlan<'_>) {
            self.plans.push((plan.files, plan.workers));
            self.cpus.push(plan.cpus);
        }
    }

    fn options(dir: &Path) -> RunOptions {
        RunOptions::new(dir).with_workers(2).with_progress(false)
    }

    #[test]
    fn test_missing_directory_aborts_before_dispatch() {
        let dir = tempdir().unwrap();
        let mut recorder = Recorder::default();
        let converter = Arc::new(SleepConverter(Duration::ZERO));

        let err = run(&options(&dir.path().join("missing")), converter, &mut recorder).unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { .. }));
        assert!(recorder.plans.is_empty());
    }

    #[test]
    fn test_no_files_skips_pool() {
        let dir = tempdir().unwrap();
        write(dir.path().join("readme.txt"), b"").unwrap();
        let mut recorder = Recorder::default();
        let converter = Arc::new(SleepConverter(Duration::ZERO));

        let outcome = run(&options(dir.path()), converter, &mut recorder).unwrap();
        assert!(matches!(outcome, RunOutcome::NoFiles));
        assert_eq!(outcome.exit_code(), 2);
        assert!(recorder.plans.is_empty());
    }

    #[test]
    fn test_completed_run_counts_every_file() {
        let dir = tempdir().unwrap();
        for name in ["a.otf", "b.OTF", "c.otf", "skip.ttf"] {
            write(dir.path().join(name), b"").unwrap();
        }
        let mut recorder = Recorder::default();
        let converter = Arc::new(SleepConverter(Duration::from_millis(1)));

        let outcome = run(&options(dir.path()), converter, &mut recorder).unwrap();
        assert_eq!(recorder.plans, [(3, 2)]);
        assert_eq!(outcome.exit_code(), 0);
        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 0);
        assert!(summary.failures.is_empty());
    }

    #[test]
    fn test_plan_reports_cpus_from_options() {
        let dir = tempdir().unwrap();
        write(dir.path().join("a.otf"), b"").unwrap();
        let mut recorder = Recorder::default();
        let converter = Arc::new(SleepConverter(Duration::ZERO));
        let mut opts = options(dir.path()).with_workers(3);
        opts.cpus = 7;

        run(&opts, converter, &mut recorder).unwrap();
        assert_eq!(recorder.plans, [(1, 3)]);
        assert_eq!(recorder.cpus, [7]);
    }

    #[test]
    fn test_default_workers_follow_cpus() {
        let opts = RunOptions::new("/fonts");
        assert_eq!(opts.workers, worker_count(opts.cpus));
    }

    #[test]
    fn test_extension_option() {
        let dir = tempdir().unwrap();
        write(dir.path().join("a.otf"), b"").unwrap();
        write(dir.path().join("b.ttf"), b"").unwrap();
        write(dir.path().join("c.ttf"), b"").unwrap();
        let converter = Arc::new(SleepConverter(Duration::ZERO));

        let outcome =
            run(&options(dir.path()).with_extension("ttf"), converter, &mut ()).unwrap();
        let RunOutcome::Completed(summary) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(summary.total, 2);
    }
}
