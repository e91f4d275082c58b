use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempstat::config::{DEFAULT_ROUNDS, DEFAULT_WORKERS};
use tempstat::report::ReportFormat;
use tempstat::sink::StdoutSink;
use tempstat::{ExperimentConfig, ExperimentDriver, PartitionStrategy};
use tracing::{debug, error};

// tokio's own default for the blocking pool
const MIN_BLOCKING_THREADS: usize = 512;

/// Per-month temperature statistics over a directory of city csv files,
/// timed over repeated rounds.
#[derive(Parser)]
#[command(name = "tempstat", version)]
struct Cli {
    /// Directory holding the per-city csv files
    #[arg(short, long, default_value = "./city_temperatures")]
    input_dir: PathBuf,

    /// Number of timed rounds
    #[arg(short, long, default_value_t = DEFAULT_ROUNDS)]
    rounds: u32,

    /// Number of concurrent workers per round
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// File the timing report is written to
    #[arg(short = 'o', long, default_value = "experiment_timings.txt")]
    report: PathBuf,

    /// Write the timing report as json instead of text
    #[arg(long)]
    json: bool,

    /// Split work by cumulative file size instead of file count
    #[arg(long)]
    by_size: bool,

    /// Give up on a round that takes longer than this many seconds
    #[arg(long)]
    round_timeout_secs: Option<u64>,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn into_config(self) -> ExperimentConfig {
        ExperimentConfig {
            rounds: self.rounds,
            workers: self.workers,
            input_dir: self.input_dir,
            report_path: self.report,
            report_format: if self.json {
                ReportFormat::Json
            } else {
                ReportFormat::Text
            },
            strategy: if self.by_size {
                PartitionStrategy::ByteSize
            } else {
                PartitionStrategy::EqualCount
            },
            round_timeout: self.round_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 2)
        .init();

    if let Err(e) = run(cli.into_config()) {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(config: ExperimentConfig) -> anyhow::Result<()> {
    debug!(?config, "starting experiment");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .max_blocking_threads(config.workers.max(MIN_BLOCKING_THREADS))
        .build()?;

    let driver = ExperimentDriver::new(config, Arc::new(StdoutSink));
    let result = runtime.block_on(driver.run());
    // a timed out round may leave blocking workers behind
    runtime.shutdown_background();

    result?;
    Ok(())
}
