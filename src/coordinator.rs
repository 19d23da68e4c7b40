//! Bounded parallel conversion of many files
//!
//! Each input is converted on a dedicated rayon pool sized to the concurrency
//! limit. Workers report their outcome over a channel; the calling thread
//! drains it and is the only thread that ever invokes the listener, so the
//! listener needs no synchronization of its own.

use crate::error::{Result, TranscribeError};
use crate::types::{BatchSummary, ConversionEvent, FileOutcome};
use crate::worker::ConversionJob;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Converts one input file; implemented by [`ConversionJob`]
pub trait FileConverter: Sync {
    fn convert(&self, input: &Path) -> Result<FileOutcome>;
}

impl FileConverter for ConversionJob {
    fn convert(&self, input: &Path) -> Result<FileOutcome> {
        self.convert_file(input)
    }
}

/// Worker pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of files converted at the same time
    pub concurrency: usize,
}

impl PoolConfig {
    pub fn new(concurrency: usize) -> Self {
        Self { concurrency }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self { concurrency }
    }
}

/// Convert every file with `job`, reporting progress to `listener`
pub fn convert_files<F>(
    files: &[PathBuf],
    job: &ConversionJob,
    config: &PoolConfig,
    listener: F,
) -> Result<BatchSummary>
where
    F: FnMut(&ConversionEvent),
{
    run_batch(files, job, config, listener)
}

/// Run one conversion, turning a panic into a failure of that file
fn convert_isolated<C: FileConverter>(converter: &C, input: &Path) -> Result<FileOutcome> {
    panic::catch_unwind(AssertUnwindSafe(|| converter.convert(input)))
        .unwrap_or_else(|payload| Err(TranscribeError::worker(panic_message(payload.as_ref()))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("converter panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("converter panicked: {}", msg)
    } else {
        "converter panicked".to_string()
    }
}

/// Run `converter` over all files with at most `config.concurrency` in flight.
///
/// Emits `BatchStarted`, one `FileCompleted` or `FileFailed` per file, then
/// `BatchFinished` once every worker has returned. A failing file never stops
/// the others. Configuration problems are returned before anything is emitted.
pub fn run_batch<C, F>(
    files: &[PathBuf],
    converter: &C,
    config: &PoolConfig,
    mut listener: F,
) -> Result<BatchSummary>
where
    C: FileConverter,
    F: FnMut(&ConversionEvent),
{
    if files.is_empty() {
        return Err(TranscribeError::configuration("no input files given"));
    }
    if config.concurrency < 1 {
        return Err(TranscribeError::configuration(
            "concurrency limit must be at least 1",
        ));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.concurrency)
        .thread_name(|index| format!("transcribe-{}", index))
        .build()
        .map_err(|e| {
            TranscribeError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("failed to create worker pool: {e}"),
            ))
        })?;

    let started = Instant::now();
    let mut summary = BatchSummary::new(files.len());

    info!(
        files = files.len(),
        concurrency = config.concurrency,
        "conversion started"
    );
    listener(&ConversionEvent::BatchStarted {
        total_files: files.len(),
    });

    let (sender, receiver) = crossbeam_channel::unbounded::<ConversionEvent>();

    pool.in_place_scope(|scope| {
        for input in files {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let event = match convert_isolated(converter, input) {
                    Ok(outcome) => {
                        debug!(input = %input.display(), rows = outcome.rows_written, "file converted");
                        ConversionEvent::FileCompleted(outcome)
                    }
                    Err(error) => {
                        warn!(input = %input.display(), %error, "file failed");
                        ConversionEvent::FileFailed {
                            input: input.clone(),
                            error,
                        }
                    }
                };
                // The receiver outlives the scope
                let _ = sender.send(event);
            });
        }
        drop(sender);

        for event in receiver.iter() {
            summary.record(&event);
            listener(&event);
        }
    });

    summary.elapsed_ms = started.elapsed().as_millis() as u64;
    info!(
        completed = summary.completed.len(),
        failed = summary.failed.len(),
        elapsed_ms = summary.elapsed_ms,
        "conversion finished"
    );
    listener(&ConversionEvent::BatchFinished(summary.clone()));

    Ok(summary)
}
