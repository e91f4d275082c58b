use crate::FileReport;
use std::io::Write;
use std::sync::Mutex;
use tracing::error;

/// Where finished `FileReport`s go. Shared by every worker of a round, so
/// each `emit` must land as one unit.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &FileReport);
}

/// Prints each report to stdout under a single lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn emit(&self, report: &FileReport) {
        let rendered = report.to_string();
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(rendered.as_bytes()).and_then(|_| out.flush()) {
            error!(file = %report.file_name, error = %e, "failed to print report");
        }
    }
}

/// Keeps reports in memory, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<FileReport>>,
}

impl CollectingSink {
    pub fn new() -> CollectingSink {
        CollectingSink::default()
    }

    pub fn take(&self) -> Vec<FileReport> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<FileReport>> {
        // a panicking worker cannot leave a half-pushed Vec behind
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ReportSink for CollectingSink {
    fn emit(&self, report: &FileReport) {
        self.lock().push(report.clone());
    }
}
