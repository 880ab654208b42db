// ABOUTME: Shared fixtures for integration tests: provider records, stores, and stub pipelines
// ABOUTME: Builds year-long synthetic histories and workouts with known split layouts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `health_ingest`

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use health_ingest::errors::{AppError, AppResult};
use health_ingest::models::{
    DistanceUnit, ProviderRecord, Sample, SampleKind, Split, TimeWindow, Workout, WorkoutKind,
};
use health_ingest::pipeline::{IngestOptions, IngestionPipeline, IngestionReport, IngestionResult};
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Start of every synthetic history
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
}

/// `[epoch, epoch + days)`
pub fn window_days(days: i64) -> TimeWindow {
    TimeWindow::new(epoch(), epoch() + Duration::days(days)).unwrap()
}

/// A 12-minute run header starting at `start`
pub fn run_header(id: &str, start: DateTime<Utc>) -> ProviderRecord {
    ProviderRecord::Workout(
        Workout::new(
            id,
            WorkoutKind::Running,
            start,
            start + Duration::minutes(12),
            "watch",
        )
        .with_total_distance(2.3),
    )
}

/// 0.1 km every 30 s from `start`, i.e. 5:00 per kilometer
pub fn distance_records(start: DateTime<Utc>, tenths: i64) -> Vec<ProviderRecord> {
    (0..tenths)
        .map(|i| {
            ProviderRecord::Sample(Sample::interval(
                SampleKind::DistanceWalkingRunning,
                0.1,
                start + Duration::seconds(i * 30),
                start + Duration::seconds((i + 1) * 30),
                "watch",
            ))
        })
        .collect()
}

/// One heart rate reading per minute from `start`
pub fn heart_rate_records(start: DateTime<Utc>, minutes: i64, bpm: f64) -> Vec<ProviderRecord> {
    (0..minutes)
        .map(|i| {
            ProviderRecord::Sample(Sample::instant(
                SampleKind::HeartRate,
                bpm,
                start + Duration::minutes(i),
                "watch",
            ))
        })
        .collect()
}

/// `count` 2.3 km runs, one every three days at 06:00, each with distance
/// samples and heart rate
pub fn run_history(count: i64) -> Vec<ProviderRecord> {
    let mut records = Vec::new();
    for i in 0..count {
        let start = epoch() + Duration::days(i * 3) + Duration::hours(6);
        records.push(run_header(&format!("run-{i}"), start));
        records.extend(distance_records(start, 23));
        records.extend(heart_rate_records(start, 12, 150.0));
    }
    records
}

/// One body mass reading every morning for `days` days, slowly decreasing
pub fn daily_body_mass(days: i64) -> Vec<ProviderRecord> {
    (0..days)
        .map(|i| {
            ProviderRecord::Sample(Sample::instant(
                SampleKind::BodyMass,
                80.0 - 0.01 * i as f64,
                epoch() + Duration::days(i) + Duration::hours(7),
                "scale",
            ))
        })
        .collect()
}

/// A computed-looking full kilometer split
pub fn full_split(index: u32, start: DateTime<Utc>) -> Split {
    Split {
        index,
        distance: 1.0,
        distance_unit: DistanceUnit::Kilometers,
        timestamp_start: start,
        timestamp_end: start + Duration::minutes(5),
        duration_seconds: 300.0,
        pace_per_unit: 5.0,
        is_partial: false,
        heart_rate: None,
    }
}

/// Pipeline returning a fixed set of workouts, counting its calls
pub struct FixedPipeline {
    name: &'static str,
    workouts: Vec<Workout>,
    fail: bool,
    calls: AtomicUsize,
}

impl FixedPipeline {
    /// `count` workouts, each with one split when `with_splits`
    pub fn new(name: &'static str, count: i64, with_splits: bool) -> Self {
        let workouts = (0..count)
            .map(|i| {
                let start = epoch() + Duration::days(i);
                let workout = Workout::new(
                    format!("{name}-{i}"),
                    WorkoutKind::Running,
                    start,
                    start + Duration::minutes(5),
                    "watch",
                );
                if with_splits {
                    workout.with_segments(vec![full_split(1, start)])
                } else {
                    workout
                }
            })
            .collect();
        Self {
            name,
            workouts,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// A pipeline whose every run fails
    pub fn failing(name: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(name, 0, false)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IngestionPipeline for FixedPipeline {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn ingest_range(
        &self,
        window: TimeWindow,
        _options: &IngestOptions,
    ) -> AppResult<IngestionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::external_service(self.name, "provider unreachable"));
        }
        Ok(IngestionResult {
            workouts: self.workouts.clone(),
            biometrics: Vec::new(),
            activities: Vec::new(),
            sleep: Vec::new(),
            report: IngestionReport::new(self.name, window),
        })
    }
}
