use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub mod aggregator;
pub mod config;
pub mod coordinator_node;
pub mod error;
pub mod parser;
pub mod partition;
pub mod report;
pub mod sink;
pub mod source;
pub mod worker_node;

pub use config::{ExperimentConfig, PartitionStrategy};
pub use coordinator_node::{ExperimentDriver, RoundScheduler};
pub use error::{Error, Result, RowError};

/// One input file as found by directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFileRef {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

impl CsvFileRef {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> CsvFileRef {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        CsvFileRef {
            path,
            name,
            size_bytes,
        }
    }
}

/// Calendar month, always within 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub fn new(month: i64) -> Option<Month> {
        if (1..=12).contains(&month) {
            Some(Month(month as u8))
        } else {
            None
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based slot for fixed twelve-entry tables.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12).map(Month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRow {
    pub month: Month,
    pub temperature_c: f64,
}

/// Running count/sum/min/max for one month of one file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyStats {
    pub month: Month,
    pub count: u64,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl MonthlyStats {
    pub fn empty(month: Month) -> MonthlyStats {
        MonthlyStats {
            month,
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn absorb(&mut self, temperature_c: f64) {
        self.count += 1;
        self.sum += temperature_c;
        self.min = self.min.min(temperature_c);
        self.max = self.max.max(temperature_c);
    }

    /// `None` while no row has been absorbed.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Finalized per-month summary of one file. Months without rows are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub file_name: String,
    pub monthly: Vec<MonthlyStats>,
    pub skipped_lines: u64,
}

impl FileReport {
    pub fn month(&self, month: Month) -> Option<&MonthlyStats> {
        self.monthly.iter().find(|stats| stats.month == month)
    }
}

pub const REPORT_SEPARATOR: &str = "------------------------------------";

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.file_name)?;
        for stats in &self.monthly {
            // finalize() never keeps a month with count == 0
            let average = stats.average().unwrap_or_default();
            writeln!(f, "Month: {}", stats.month.number())?;
            writeln!(f, "Average temperature: {:.2}", average)?;
            writeln!(f, "Maximum temperature: {:.2}", stats.max)?;
            writeln!(f, "Minimum temperature: {:.2}", stats.min)?;
            writeln!(f, "{}", REPORT_SEPARATOR)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RoundResult {
    pub round_index: u32,
    pub elapsed_millis: u64,
    pub files_processed: usize,
    pub files_failed: usize,
    pub rows_skipped: u64,
}

impl RoundResult {
    pub fn new(round_index: u32, elapsed_millis: u64) -> RoundResult {
        RoundResult {
            round_index,
            elapsed_millis,
            files_processed: 0,
            files_failed: 0,
            rows_skipped: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExperimentSummary {
    pub rounds: Vec<RoundResult>,
    pub mean_millis: u64,
}

impl ExperimentSummary {
    /// The mean uses truncating integer division.
    pub fn from_rounds(rounds: Vec<RoundResult>) -> ExperimentSummary {
        let total: u64 = rounds.iter().map(|r| r.elapsed_millis).sum();
        let mean_millis = match rounds.len() as u64 {
            0 => 0,
            n => total / n,
        };
        ExperimentSummary {
            rounds,
            mean_millis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rounds(times: &[u64]) -> Vec<RoundResult> {
        times
            .iter()
            .enumerate()
            .map(|(i, &ms)| RoundResult::new(i as u32 + 1, ms))
            .collect()
    }

    #[test]
    fn mean_of_even_rounds() {
        let summary = ExperimentSummary::from_rounds(rounds(&[100, 200, 300]));
        assert_eq!(summary.mean_millis, 200);
        assert_eq!(summary.rounds.len(), 3);
    }

    #[test]
    fn mean_truncates() {
        let summary = ExperimentSummary::from_rounds(rounds(&[100, 200, 201]));
        assert_eq!(summary.mean_millis, 167);
    }

    #[test]
    fn month_rejects_out_of_range() {
        assert!(Month::new(0).is_none());
        assert!(Month::new(13).is_none());
        assert!(Month::new(-3).is_none());
        assert_eq!(Month::new(12).map(Month::index), Some(11));
        assert_eq!(Month::all().count(), 12);
    }

    #[test]
    fn file_name_taken_from_path() {
        let file = CsvFileRef::new("/data/cities/Lisbon.csv", 42);
        assert_eq!(file.name, "Lisbon.csv");
        assert_eq!(file.size_bytes, 42);
    }

    #[test]
    fn report_renders_months_with_separator() {
        let month = Month::new(3).unwrap();
        let mut stats = MonthlyStats::empty(month);
        for t in [10.0, 20.0, 30.0] {
            stats.absorb(t);
        }
        let report = FileReport {
            file_name: "Porto.csv".to_string(),
            monthly: vec![stats],
            skipped_lines: 0,
        };

        let rendered = report.to_string();
        assert_eq!(
            rendered,
            format!(
                "File: Porto.csv\nMonth: 3\nAverage temperature: 20.00\n\
                 Maximum temperature: 30.00\nMinimum temperature: 10.00\n{}\n",
                REPORT_SEPARATOR
            )
        );
    }

    #[test]
    fn empty_stats_have_no_average() {
        let stats = MonthlyStats::empty(Month::new(1).unwrap());
        assert_eq!(stats.average(), None);
        assert_eq!(stats.count, 0);
    }
}
