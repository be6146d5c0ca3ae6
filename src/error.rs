use std::path::PathBuf;
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Tracking is already running")]
    AlreadyTracking,

    #[error("Could not determine project directories")]
    NoProjectDirs,

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Failed to load config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Foreground probe unavailable: {0}")]
    Probe(#[from] ProbeError),

    #[error("Foreground probe failed {attempts} times in a row: {last}")]
    ProbeExhausted { attempts: u32, last: ProbeError },

    #[error("Tracker thread panicked")]
    ThreadPanicked,
}

/// Failure reported by a foreground probe for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("display connection unavailable: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("foreground probing is not supported on this platform")]
    Unsupported,
}

/// Check if an I/O error just means the file is not there yet
pub fn is_not_found(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::NotFound
}
