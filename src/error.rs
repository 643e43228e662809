use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures inside a single recognition run. None of these are retried.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unreadable image: {0}")]
    UnreadableImage(String),

    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failures observing a run's outcome from the other side of the exchange.
///
/// These are transport-level: they say nothing about what the pipeline
/// computed, only that no usable outcome could be seen.
#[derive(Debug, Error)]
pub enum ExchangeError {
    #[error("no result observed at {} after {attempts} attempts", path.display())]
    Timeout { path: PathBuf, attempts: u32 },

    #[error("no outcome received within {0:?}")]
    Elapsed(Duration),

    #[error("unrecognized result line: {0:?}")]
    Malformed(String),

    #[error("recognition worker exited without reporting an outcome")]
    Disconnected,

    #[error("artifact I/O error: {0}")]
    Io(#[from] std::io::Error),
}
