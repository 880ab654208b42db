// ABOUTME: Command-line entry point for running ingestion, comparisons, and flag management
// ABOUTME: Loads JSON fixtures into the synthetic store and prints results as JSON on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Usage:
//! ```bash
//! # Ingest the last year of a fixture through whichever pipeline the flag selects
//! cargo run --bin health-ingest -- ingest --fixture data/history.json --days 365
//!
//! # Simulate a provider that silently truncates at 50 records per query
//! cargo run --bin health-ingest -- ingest --fixture data/history.json --truncate-after 50
//!
//! # Compare both pipelines and append the report to the comparison log
//! cargo run --bin health-ingest -- compare --fixture data/history.json
//!
//! # Flip the pipeline flag
//! cargo run --bin health-ingest -- flag enable
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use health_ingest::config::IngestConfig;
use health_ingest::flags::{FileFlagStore, FlagStore};
use health_ingest::logging::LoggingConfig;
use health_ingest::models::TimeWindow;
use health_ingest::pipeline::{ChunkedPipeline, IngestionPipeline, SinglePassPipeline};
use health_ingest::providers::{SampleStore, SyntheticSampleStore};
use health_ingest::selector::PipelineSelector;
use health_ingest::telemetry::{ComparisonLog, JsonLinesComparisonLog, TelemetryHarness};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "health-ingest",
    about = "Historical health-data ingestion and workout segmentation",
    long_about = "Ingest historical health data through the single-pass or chunked pipeline, compare the two, and manage the flag that selects between them."
)]
struct IngestArgs {
    #[command(subcommand)]
    command: IngestCommand,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
#[non_exhaustive]
enum IngestCommand {
    /// Ingest a window from a fixture
    Ingest {
        #[command(flatten)]
        source: FixtureArgs,

        /// Pipeline to run; `flag` follows the persisted pipeline flag
        #[arg(long, value_enum, default_value = "flag")]
        pipeline: PipelineChoice,
    },
    /// Run both pipelines over the same window and log a comparison
    Compare {
        #[command(flatten)]
        source: FixtureArgs,
    },
    /// Show or change the pipeline flag
    Flag {
        #[command(subcommand)]
        action: FlagAction,
    },
    /// Print every recorded comparison
    History,
}

#[derive(Subcommand)]
#[non_exhaustive]
enum FlagAction {
    /// Print the current flag
    Status,
    /// Route ingestion to the chunked pipeline
    Enable,
    /// Route ingestion to the single-pass pipeline
    Disable,
}

#[derive(Clone, Copy, ValueEnum)]
enum PipelineChoice {
    Flag,
    SinglePass,
    Chunked,
}

#[derive(Args)]
struct FixtureArgs {
    /// JSON array of provider records
    #[arg(long)]
    fixture: PathBuf,

    /// Window start (RFC 3339)
    #[arg(long, requires = "to", conflicts_with = "days")]
    from: Option<DateTime<Utc>>,

    /// Window end (RFC 3339)
    #[arg(long, requires = "from")]
    to: Option<DateTime<Utc>>,

    /// Trailing window length in days, ending now
    #[arg(long, default_value = "365")]
    days: u32,

    /// Return at most this many records per query, oldest first
    #[arg(long)]
    truncate_after: Option<usize>,

    /// Return nothing for queries longer than this many days
    #[arg(long)]
    max_span_days: Option<u32>,
}

impl FixtureArgs {
    fn window(&self) -> Result<TimeWindow> {
        let window = match (self.from, self.to) {
            (Some(from), Some(to)) => TimeWindow::new(from, to)?,
            _ => TimeWindow::trailing_days(Utc::now(), self.days)?,
        };
        Ok(window)
    }

    fn store(&self) -> Result<Arc<dyn SampleStore>> {
        let mut store = SyntheticSampleStore::from_json_file(&self.fixture)
            .with_context(|| format!("loading fixture {}", self.fixture.display()))?;
        if let Some(limit) = self.truncate_after {
            store = store.with_max_records_per_query(limit);
        }
        if let Some(days) = self.max_span_days {
            store = store.with_max_query_span(Duration::days(i64::from(days)));
        }
        Ok(Arc::new(store))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = IngestArgs::parse();

    let mut logging = LoggingConfig::from_env();
    if args.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let config = IngestConfig::from_env()?;
    info!("{}", config.summary());

    let flag_store: Arc<dyn FlagStore> = Arc::new(FileFlagStore::new(&config.flag_path));
    let comparison_log: Arc<dyn ComparisonLog> =
        Arc::new(JsonLinesComparisonLog::new(&config.comparison_log_path));

    match args.command {
        IngestCommand::Ingest { source, pipeline } => {
            let store = source.store()?;
            let legacy: Arc<dyn IngestionPipeline> =
                Arc::new(SinglePassPipeline::new(Arc::clone(&store)));
            let chunked: Arc<dyn IngestionPipeline> = Arc::new(ChunkedPipeline::new(store));
            let runner: Arc<dyn IngestionPipeline> = match pipeline {
                PipelineChoice::SinglePass => legacy,
                PipelineChoice::Chunked => chunked,
                PipelineChoice::Flag => Arc::new(
                    PipelineSelector::load(&config.flag_name, flag_store, legacy, chunked).await?,
                ),
            };
            let result = runner
                .ingest_range(source.window()?, &config.ingest_options()?)
                .await?;
            print_json(&result)?;
        }
        IngestCommand::Compare { source } => {
            let store = source.store()?;
            let harness = TelemetryHarness::new(
                Arc::new(SinglePassPipeline::new(Arc::clone(&store))),
                Arc::new(ChunkedPipeline::new(store)),
                comparison_log,
            );
            let report = harness
                .compare_implementations(source.window()?, &config.ingest_options()?)
                .await?;
            print_json(&report)?;
        }
        IngestCommand::Flag { action } => {
            let selector = flag_selector(&config.flag_name, flag_store).await?;
            match action {
                FlagAction::Status => {}
                FlagAction::Enable => selector.enable().await?,
                FlagAction::Disable => selector.disable().await?,
            }
            print_json(&selector.flag())?;
        }
        IngestCommand::History => {
            print_json(&comparison_log.entries().await?)?;
        }
    }

    Ok(())
}

/// Selector over an empty store; only the flag itself is used
async fn flag_selector(
    flag_name: &str,
    flag_store: Arc<dyn FlagStore>,
) -> Result<PipelineSelector> {
    let store: Arc<dyn SampleStore> = Arc::new(SyntheticSampleStore::new());
    let selector = PipelineSelector::load(
        flag_name,
        flag_store,
        Arc::new(SinglePassPipeline::new(Arc::clone(&store))),
        Arc::new(ChunkedPipeline::new(store)),
    )
    .await?;
    Ok(selector)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow!("failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}
