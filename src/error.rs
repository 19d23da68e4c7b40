use std::fmt;

/// Errors raised while transcribing logger files
#[derive(Debug)]
pub enum TranscribeError {
    /// Table header unreadable or inconsistent
    MalformedHeader(String),
    /// A kept field could not be decoded
    RecordDecode(String),
    /// I/O errors
    Io(std::io::Error),
    /// Invalid job configuration (selection, cycle length, catalog)
    Configuration(String),
    /// CSV reading or writing errors
    Csv(csv::Error),
    /// A conversion worker panicked
    Worker(String),
}

impl TranscribeError {
    pub fn malformed_header(msg: impl Into<String>) -> Self {
        TranscribeError::MalformedHeader(msg.into())
    }

    pub fn record_decode(msg: impl Into<String>) -> Self {
        TranscribeError::RecordDecode(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        TranscribeError::Configuration(msg.into())
    }

    pub fn worker(msg: impl Into<String>) -> Self {
        TranscribeError::Worker(msg.into())
    }

    /// Short machine-friendly name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            TranscribeError::MalformedHeader(_) => "malformed_header",
            TranscribeError::RecordDecode(_) => "record_decode",
            TranscribeError::Io(_) => "io",
            TranscribeError::Configuration(_) => "configuration",
            TranscribeError::Csv(_) => "csv",
            TranscribeError::Worker(_) => "worker",
        }
    }
}

impl fmt::Display for TranscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscribeError::MalformedHeader(msg) => write!(f, "Malformed header: {}", msg),
            TranscribeError::RecordDecode(msg) => write!(f, "Record decode error: {}", msg),
            TranscribeError::Io(err) => write!(f, "I/O error: {}", err),
            TranscribeError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            TranscribeError::Csv(err) => write!(f, "CSV error: {}", err),
            TranscribeError::Worker(msg) => write!(f, "Worker error: {}", msg),
        }
    }
}

impl std::error::Error for TranscribeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranscribeError::Io(err) => Some(err),
            TranscribeError::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TranscribeError {
    fn from(err: std::io::Error) -> Self {
        TranscribeError::Io(err)
    }
}

impl From<csv::Error> for TranscribeError {
    fn from(err: csv::Error) -> Self {
        TranscribeError::Csv(err)
    }
}

impl From<tempfile::PersistError> for TranscribeError {
    fn from(err: tempfile::PersistError) -> Self {
        TranscribeError::Io(err.error)
    }
}

pub type Result<T> = std::result::Result<T, TranscribeError>;
