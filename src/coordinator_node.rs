use crate::config::{ExperimentConfig, PartitionStrategy};
use crate::error::{Error, Result};
use crate::partition::partition;
use crate::report::{FileSummaryWriter, SummaryWriter};
use crate::sink::ReportSink;
use crate::source::{DirectorySource, FileSource};
use crate::worker_node::{Worker, WorkerOutcome};
use crate::{CsvFileRef, ExperimentSummary, RoundResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinSet};
use tracing::{debug, error, info};

/// Runs a single round: list, partition, fan out to `workers` blocking
/// tasks and wait for all of them.
pub struct RoundScheduler {
    workers: usize,
    strategy: PartitionStrategy,
    timeout: Option<Duration>,
    source: Arc<dyn FileSource>,
    sink: Arc<dyn ReportSink>,
}

impl RoundScheduler {
    pub fn new(
        workers: usize,
        strategy: PartitionStrategy,
        timeout: Option<Duration>,
        source: Arc<dyn FileSource>,
        sink: Arc<dyn ReportSink>,
    ) -> RoundScheduler {
        RoundScheduler {
            workers: workers.max(1),
            strategy,
            timeout,
            source,
            sink,
        }
    }

    pub async fn run_round(&self, round: u32) -> Result<RoundResult> {
        let files = self.source.list_files()?;
        if files.is_empty() {
            return Err(Error::NoInput {
                location: self.source.location(),
            });
        }

        let start = Instant::now();
        let files: Arc<[CsvFileRef]> = files.into();
        let slices = partition(&files, self.workers, self.strategy);
        debug!(round, files = files.len(), workers = slices.len(), "starting round");

        let mut set = JoinSet::new();
        let mut worker_ids = HashMap::with_capacity(slices.len());
        for (index, range) in slices.into_iter().enumerate() {
            let files = Arc::clone(&files);
            let worker = Worker::new(index, Arc::clone(&self.sink));
            let handle = set.spawn_blocking(move || worker.run(&files[range]));
            worker_ids.insert(handle.id(), index);
        }

        let barrier = join_workers(round, &mut set, &worker_ids);
        let outcomes = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, barrier)
                .await
                .map_err(|_| Error::RoundTimeout { round, timeout })??,
            None => barrier.await?,
        };

        let elapsed_millis = start.elapsed().as_millis() as u64;
        Ok(RoundResult {
            round_index: round,
            elapsed_millis,
            files_processed: outcomes.iter().map(|o| o.files_processed).sum(),
            files_failed: outcomes.iter().map(|o| o.files_failed).sum(),
            rows_skipped: outcomes.iter().map(|o| o.rows_skipped).sum(),
        })
    }
}

async fn join_workers(
    round: u32,
    set: &mut JoinSet<WorkerOutcome>,
    worker_ids: &HashMap<task::Id, usize>,
) -> Result<Vec<WorkerOutcome>> {
    let mut outcomes = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(source) => {
                let worker = worker_ids.get(&source.id()).copied().unwrap_or_default();
                return Err(Error::WorkerPanicked {
                    round,
                    worker,
                    source,
                });
            }
        }
    }
    Ok(outcomes)
}

/// Repeats rounds strictly one after another and summarizes their timings.
pub struct ExperimentDriver {
    config: ExperimentConfig,
    scheduler: RoundScheduler,
    writer: Box<dyn SummaryWriter>,
}

impl ExperimentDriver {
    /// Reads from `config.input_dir` and writes the summary to
    /// `config.report_path`.
    pub fn new(config: ExperimentConfig, sink: Arc<dyn ReportSink>) -> ExperimentDriver {
        let source = Arc::new(DirectorySource::new(&config.input_dir));
        let writer = Box::new(FileSummaryWriter::new(
            &config.report_path,
            config.report_format,
        ));
        ExperimentDriver::with_parts(config, source, sink, writer)
    }

    pub fn with_parts(
        config: ExperimentConfig,
        source: Arc<dyn FileSource>,
        sink: Arc<dyn ReportSink>,
        writer: Box<dyn SummaryWriter>,
    ) -> ExperimentDriver {
        let scheduler = RoundScheduler::new(
            config.workers,
            config.strategy,
            config.round_timeout,
            source,
            sink,
        );
        ExperimentDriver {
            config,
            scheduler,
            writer,
        }
    }

    /// Any round error aborts the remaining rounds and no summary is
    /// written.
    pub async fn run(&self) -> Result<ExperimentSummary> {
        self.config.validate()?;

        let mut rounds = Vec::with_capacity(self.config.rounds as usize);
        for round in 1..=self.config.rounds {
            let result = match self.scheduler.run_round(round).await {
                Ok(result) => result,
                Err(e) => {
                    error!(round, error = %e, "round failed, aborting experiment");
                    return Err(e);
                }
            };
            info!(
                round,
                elapsed_ms = result.elapsed_millis,
                files = result.files_processed,
                failed = result.files_failed,
                skipped_rows = result.rows_skipped,
                "round finished"
            );
            rounds.push(result);
        }

        let summary = ExperimentSummary::from_rounds(rounds);
        info!(mean_ms = summary.mean_millis, rounds = summary.rounds.len(), "experiment finished");
        self.writer.write_summary(&summary)?;
        Ok(summary)
    }
}
