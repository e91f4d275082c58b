use crate::aggregator::MonthlyAggregator;
use crate::error::{Error, Result, RowError};
use crate::parser;
use crate::sink::ReportSink;
use crate::{CsvFileRef, FileReport};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use tracing::{debug, warn};

/// Reduces one csv file to its monthly statistics.
///
/// Line 1 is always the header. Every later line, blank ones included, goes
/// through `parser::parse_line`; failures are counted in `skipped_lines` and
/// logged but never stop the file.
pub fn process_file(file: &CsvFileRef) -> Result<FileReport> {
    let handle = File::open(&file.path).map_err(|source| Error::FileAccess {
        path: file.path.clone(),
        source,
    })?;
    process_reader(file, BufReader::new(handle))
}

pub(crate) fn process_reader<R: BufRead>(file: &CsvFileRef, input: R) -> Result<FileReport> {
    let mut aggregator = MonthlyAggregator::new();
    let mut skipped = 0u64;

    for (index, bytes) in input.split(b'\n').enumerate() {
        let bytes = bytes.map_err(|source| Error::FileAccess {
            path: file.path.clone(),
            source,
        })?;
        if index == 0 {
            continue;
        }

        let line = index + 1;
        let row = std::str::from_utf8(&bytes)
            .map_err(|e| RowError::Unreadable(e.to_string()))
            .and_then(|text| parser::parse_line(text.strip_suffix('\r').unwrap_or(text)));

        match row {
            Ok(row) => aggregator.absorb(row),
            Err(reason) => {
                skipped += 1;
                warn!(file = %file.name, line, %reason, "skipping row");
            }
        }
    }

    let report = aggregator.finalize(file.name.clone(), skipped);
    debug!(
        file = %file.name,
        months = report.monthly.len(),
        skipped,
        "file processed"
    );
    Ok(report)
}

/// What one worker did during a round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub worker: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    pub rows_skipped: u64,
}

pub struct Worker {
    index: usize,
    sink: Arc<dyn ReportSink>,
}

impl Worker {
    pub fn new(index: usize, sink: Arc<dyn ReportSink>) -> Worker {
        Worker { index, sink }
    }

    /// Processes `files` in order, emitting one report per readable file.
    /// Blocking; run it off the async executor.
    pub fn run(&self, files: &[CsvFileRef]) -> WorkerOutcome {
        let mut outcome = WorkerOutcome {
            worker: self.index,
            ..WorkerOutcome::default()
        };

        for file in files {
            match process_file(file) {
                Ok(report) => {
                    outcome.files_processed += 1;
                    outcome.rows_skipped += report.skipped_lines;
                    self.sink.emit(&report);
                }
                Err(e) => {
                    outcome.files_failed += 1;
                    warn!(worker = self.index, file = %file.name, error = %e, "skipping file");
                }
            }
        }

        debug!(
            worker = self.index,
            processed = outcome.files_processed,
            failed = outcome.files_failed,
            "worker finished"
        );
        outcome
    }
}
