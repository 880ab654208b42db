// ABOUTME: Runs both pipeline implementations over the same window and records a comparison
// ABOUTME: Comparison reports are appended to a JSON Lines log or kept in memory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Telemetry Harness
//!
//! [`TelemetryHarness::compare_implementations`] runs implementation A and
//! then implementation B, never concurrently, and records timing, workout
//! counts and detail coverage for each. It does not consult or change the
//! pipeline flag.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::logging::IngestLogger;
use crate::models::TimeWindow;
use crate::pipeline::{IngestOptions, IngestionPipeline, IngestionResult};

/// Side-by-side measurements of one window ingested by both implementations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Report identifier
    pub id: Uuid,
    /// When the comparison finished
    pub recorded_at: DateTime<Utc>,
    /// Window both implementations ingested
    pub window: TimeWindow,
    /// Name of implementation A
    pub a_pipeline: String,
    /// Name of implementation B
    pub b_pipeline: String,
    /// Wall-clock time of A
    pub a_duration: Duration,
    /// Wall-clock time of B
    pub b_duration: Duration,
    /// Workouts returned by A
    pub a_count: usize,
    /// Workouts returned by B
    pub b_count: usize,
    /// Fraction of A's workouts with splits
    pub a_has_detail_fraction: f64,
    /// Fraction of B's workouts with splits
    pub b_has_detail_fraction: f64,
    /// Fraction of A's workouts with a heart rate summary
    pub a_heart_rate_fraction: f64,
    /// Fraction of B's workouts with a heart rate summary
    pub b_heart_rate_fraction: f64,
    /// Error text if A failed outright
    pub a_error: Option<String>,
    /// Error text if B failed outright
    pub b_error: Option<String>,
}

/// Append-only sink for comparison reports
#[async_trait]
pub trait ComparisonLog: Send + Sync {
    /// Append one report
    ///
    /// # Errors
    ///
    /// Returns an error if the report could not be written
    async fn append(&self, report: &ComparisonReport) -> AppResult<()>;

    /// Every report appended so far, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read
    async fn entries(&self) -> AppResult<Vec<ComparisonReport>>;
}

/// One JSON document per line in a file that is only ever appended to
pub struct JsonLinesComparisonLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesComparisonLog {
    /// Log to `path`, creating it on first append
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Log file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ComparisonLog for JsonLinesComparisonLog {
    async fn append(&self, report: &ComparisonReport) -> AppResult<()> {
        let mut line = serde_json::to_string(report)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                AppError::storage(format!(
                    "failed to open comparison log {}: {e}",
                    self.path.display()
                ))
            })?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn entries(&self) -> AppResult<Vec<ComparisonReport>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path).await?;
        let mut reports = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(report) => reports.push(report),
                Err(e) => warn!(line = number + 1, "skipping unreadable comparison entry: {e}"),
            }
        }
        Ok(reports)
    }
}

/// Reports kept in memory
#[derive(Default)]
pub struct InMemoryComparisonLog {
    reports: RwLock<Vec<ComparisonReport>>,
}

impl InMemoryComparisonLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ComparisonLog for InMemoryComparisonLog {
    async fn append(&self, report: &ComparisonReport) -> AppResult<()> {
        self.reports
            .write()
            .map_err(|e| AppError::internal(format!("comparison log lock poisoned: {e}")))?
            .push(report.clone());
        Ok(())
    }

    async fn entries(&self) -> AppResult<Vec<ComparisonReport>> {
        let reports = self
            .reports
            .read()
            .map_err(|e| AppError::internal(format!("comparison log lock poisoned: {e}")))?;
        Ok(reports.clone())
    }
}

/// What one implementation produced, for the report
struct RunMeasurement {
    duration: Duration,
    result: AppResult<IngestionResult>,
}

impl RunMeasurement {
    fn count(&self) -> usize {
        self.result.as_ref().map_or(0, |r| r.workouts.len())
    }

    fn detail_fraction(&self) -> f64 {
        self.result
            .as_ref()
            .map_or(0.0, IngestionResult::detail_fraction)
    }

    fn heart_rate_fraction(&self) -> f64 {
        self.result
            .as_ref()
            .map_or(0.0, IngestionResult::heart_rate_fraction)
    }

    fn error(&self) -> Option<String> {
        self.result.as_ref().err().map(ToString::to_string)
    }
}

/// Compares two pipeline implementations
pub struct TelemetryHarness {
    a: Arc<dyn IngestionPipeline>,
    b: Arc<dyn IngestionPipeline>,
    log: Arc<dyn ComparisonLog>,
}

impl TelemetryHarness {
    /// Create a harness comparing `a` against `b`
    #[must_use]
    pub fn new(
        a: Arc<dyn IngestionPipeline>,
        b: Arc<dyn IngestionPipeline>,
        log: Arc<dyn ComparisonLog>,
    ) -> Self {
        Self { a, b, log }
    }

    /// Run A then B over `window`, append the report, and return it
    ///
    /// A failing implementation is recorded in the report, not raised.
    ///
    /// # Errors
    ///
    /// Returns an error only if the report cannot be appended to the log
    #[instrument(skip(self, options), fields(a = self.a.name(), b = self.b.name()))]
    pub async fn compare_implementations(
        &self,
        window: TimeWindow,
        options: &IngestOptions,
    ) -> AppResult<ComparisonReport> {
        let a = measure(self.a.as_ref(), window, options).await;
        let b = measure(self.b.as_ref(), window, options).await;

        let report = ComparisonReport {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            window,
            a_pipeline: self.a.name().to_owned(),
            b_pipeline: self.b.name().to_owned(),
            a_duration: a.duration,
            b_duration: b.duration,
            a_count: a.count(),
            b_count: b.count(),
            a_has_detail_fraction: a.detail_fraction(),
            b_has_detail_fraction: b.detail_fraction(),
            a_heart_rate_fraction: a.heart_rate_fraction(),
            b_heart_rate_fraction: b.heart_rate_fraction(),
            a_error: a.error(),
            b_error: b.error(),
        };

        self.log.append(&report).await?;
        IngestLogger::log_comparison(
            &report.a_pipeline,
            &report.b_pipeline,
            report.a_duration,
            report.b_duration,
            report.a_has_detail_fraction,
            report.b_has_detail_fraction,
        );
        Ok(report)
    }
}

async fn measure(
    pipeline: &dyn IngestionPipeline,
    window: TimeWindow,
    options: &IngestOptions,
) -> RunMeasurement {
    let started = Instant::now();
    let result = pipeline.ingest_range(window, options).await;
    let duration = started.elapsed();
    if let Err(e) = &result {
        warn!(pipeline = pipeline.name(), "pipeline run failed during comparison: {e}");
    }
    RunMeasurement { duration, result }
}
