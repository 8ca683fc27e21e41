//! Bounded worker pool yielding conversion results in completion order.

use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc,
        mpsc::{Receiver, channel},
    },
    thread::available_parallelism,
    time::Instant,
};

use log::{debug, error, info};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    ConversionResult, ConversionTask, Converter, FailureKind, Result,
    config::{MAX_WORKERS, WORKERS_PER_CPU},
};

/// Pool size for a machine with `cpus` logical CPUs:
/// `min(2 × cpus, 32)`, never less than 1.
pub fn worker_count(cpus: usize) -> usize {
    cpus.saturating_mul(WORKERS_PER_CPU).clamp(1, MAX_WORKERS)
}

/// Logical CPU count, falling back to 1 when it cannot be detected.
pub fn detected_cpus() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// [`worker_count`] for the current machine.
pub fn default_worker_count() -> usize {
    worker_count(detected_cpus())
}

/// Runs conversion tasks on a fixed number of worker threads.
pub struct Dispatcher {
    pool: ThreadPool,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("fontbatch-worker-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    pub fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Submit every task up front and return the results as they complete.
    ///
    /// Each task yields exactly one result. A panic inside `converter` is
    /// caught and reported as a [`FailureKind::TaskPanicked`] failure for
    /// that task only.
    pub fn dispatch<C>(self, tasks: Vec<ConversionTask>, converter: Arc<C>) -> Completions
    where
        C: Converter + ?Sized + 'static,
    {
        let total = tasks.len();
        let (tx, rx) = channel();
        info!("Dispatching {total} tasks on {} workers", self.workers());

        for task in tasks {
            let tx = tx.clone();
            let converter = Arc::clone(&converter);
            self.pool.spawn(move || {
                let result = run_task(converter.as_ref(), &task);
                // The receiver only goes away when the caller stops draining.
                let _ = tx.send(result);
            });
        }

        Completions { rx, remaining: total, _pool: self.pool }
    }
}

fn run_task<C>(converter: &C, task: &ConversionTask) -> ConversionResult
where
    C: Converter + ?Sized,
{
    let start = Instant::now();
    debug!("Starting {}", task.path().display());
    catch_unwind(AssertUnwindSafe(|| converter.convert(task))).unwrap_or_else(|payload| {
        let message = format!("task error: {}", panic_message(payload.as_ref()));
        error!("{}: {message}", task.filename());
        ConversionResult::failure(
            task.filename(),
            FailureKind::TaskPanicked,
            message,
            start.elapsed(),
        )
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Results of a dispatch, in the order they complete.
///
/// Owns the worker pool, so the workers live until every result has been
/// received.
pub struct Completions {
    rx: Receiver<ConversionResult>,
    remaining: usize,
    _pool: ThreadPool,
}

impl Iterator for Completions {
    type Item = ConversionResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let result = self.rx.recv().ok()?;
        self.remaining -= 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Completions {}

/// Succeeds after sleeping, without launching a process.
#[cfg(test)]
pub(crate) struct SleepConverter(pub std::time::Duration);

#[cfg(test)]
impl Converter for SleepConverter {
    fn convert(&self, task: &ConversionTask) -> ConversionResult {
        std::thread::sleep(self.0);
        ConversionResult::success(task.filename(), self.0)
    }
}
