use crate::error::{Error, Result};
use crate::report::ReportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ROUNDS: u32 = 10;
pub const DEFAULT_WORKERS: usize = 320;

/// How files are divided among workers for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartitionStrategy {
    /// `floor(N / W)` files per worker, remainder to the last worker.
    #[default]
    EqualCount,
    /// Contiguous slices cut at cumulative byte-size targets.
    ByteSize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExperimentConfig {
    pub rounds: u32,
    pub workers: usize,
    pub input_dir: PathBuf,
    pub report_path: PathBuf,
    pub report_format: ReportFormat,
    pub strategy: PartitionStrategy,
    /// Upper bound on the round barrier. `None` waits forever.
    pub round_timeout: Option<Duration>,
}

impl Default for ExperimentConfig {
    fn default() -> ExperimentConfig {
        ExperimentConfig {
            rounds: DEFAULT_ROUNDS,
            workers: DEFAULT_WORKERS,
            input_dir: PathBuf::from("./city_temperatures"),
            report_path: PathBuf::from("experiment_timings.txt"),
            report_format: ReportFormat::Text,
            strategy: PartitionStrategy::EqualCount,
            round_timeout: None,
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            return Err(Error::InvalidConfig("rounds must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(Error::InvalidConfig("workers must be at least 1".into()));
        }
        if self.round_timeout == Some(Duration::ZERO) {
            return Err(Error::InvalidConfig("round timeout must be positive".into()));
        }
        Ok(())
    }
}
