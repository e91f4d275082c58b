use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while running an experiment.
///
/// Only `FileAccess` is recovered from (the file is skipped and its worker
/// moves on). Everything else ends the experiment.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no csv files found in {location}")]
    NoInput { location: String },

    #[error("could not read {}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write timing report to {}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("round {round} did not finish within {timeout:?}")]
    RoundTimeout { round: u32, timeout: Duration },

    #[error("worker {worker} panicked during round {round}")]
    WorkerPanicked {
        round: u32,
        worker: usize,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to serialize timing report")]
    Serialize(#[from] serde_json::Error),
}

/// Why a single csv row was skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("expected at least {} fields, found {found}", crate::parser::MIN_FIELDS)]
    TooFewFields { found: usize },

    #[error("month {0:?} is not an integer")]
    InvalidMonth(String),

    #[error("month {0} is outside 1..=12")]
    MonthOutOfRange(i64),

    #[error("temperature {0:?} is not a finite number")]
    InvalidTemperature(String),

    #[error("record could not be decoded: {0}")]
    Unreadable(String),
}
