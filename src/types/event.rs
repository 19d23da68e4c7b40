use crate::error::TranscribeError;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of one successful file conversion
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_written: u64,
    /// Readings of an incomplete final cycle that were not written
    pub dropped_readings: usize,
}

/// A file that could not be converted
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FailedFile {
    pub input: PathBuf,
    pub kind: String,
    pub message: String,
}

/// Events delivered to the batch listener, always from one thread
#[derive(Debug)]
pub enum ConversionEvent {
    BatchStarted { total_files: usize },
    FileCompleted(FileOutcome),
    FileFailed { input: PathBuf, error: TranscribeError },
    BatchFinished(BatchSummary),
}

/// Aggregate of a finished batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BatchSummary {
    pub total_files: usize,
    pub completed: Vec<FileOutcome>,
    pub failed: Vec<FailedFile>,
    pub elapsed_ms: u64,
}

impl BatchSummary {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Self::default()
        }
    }

    /// Fold a per-file event into the summary
    pub fn record(&mut self, event: &ConversionEvent) {
        match event {
            ConversionEvent::FileCompleted(outcome) => self.completed.push(outcome.clone()),
            ConversionEvent::FileFailed { input, error } => self.failed.push(FailedFile {
                input: input.clone(),
                kind: error.kind().to_string(),
                message: error.to_string(),
            }),
            ConversionEvent::BatchStarted { .. } | ConversionEvent::BatchFinished(_) => {}
        }
    }

    /// Files reported so far, successful or not
    pub fn reported(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.completed.len() == self.total_files
    }
}
