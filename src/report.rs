use crate::error::{Error, Result};
use crate::ExperimentSummary;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Persists the timing summary once every round has finished.
pub trait SummaryWriter: Send + Sync {
    fn write_summary(&self, summary: &ExperimentSummary) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSummaryWriter {
    path: PathBuf,
    format: ReportFormat,
}

impl FileSummaryWriter {
    pub fn new(path: impl Into<PathBuf>, format: ReportFormat) -> FileSummaryWriter {
        FileSummaryWriter {
            path: path.into(),
            format,
        }
    }

    fn write_err(&self, source: std::io::Error) -> Error {
        Error::ReportWrite {
            path: self.path.clone(),
            source,
        }
    }
}

pub fn render_text(summary: &ExperimentSummary) -> String {
    let mut out = String::new();
    for round in &summary.rounds {
        out.push_str(&format!(
            "Round {}: {} ms\n",
            round.round_index, round.elapsed_millis
        ));
    }
    out.push_str(&format!("Mean: {} ms\n", summary.mean_millis));
    out
}

impl SummaryWriter for FileSummaryWriter {
    fn write_summary(&self, summary: &ExperimentSummary) -> Result<()> {
        let body = match self.format {
            ReportFormat::Text => render_text(summary),
            ReportFormat::Json => serde_json::to_string_pretty(summary)? + "\n",
        };

        let file = File::create(&self.path).map_err(|e| self.write_err(e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(body.as_bytes())
            .and_then(|_| writer.flush())
            .map_err(|e| self.write_err(e))?;

        info!(path = %self.path.display(), "timing report saved");
        Ok(())
    }
}
