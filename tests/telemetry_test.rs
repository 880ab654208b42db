// ABOUTME: Integration tests for the pipeline comparison harness and comparison logs
// ABOUTME: Validates detail fractions, error capture, and append-only JSON Lines persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;
use std::sync::Arc;

use common::{init_test_logging, run_history, window_days, FixedPipeline};
use health_ingest::pipeline::{
    ChunkedPipeline, IngestGroup, IngestOptions, IngestionPipeline, SinglePassPipeline,
};
use health_ingest::providers::{SampleStore, SyntheticSampleStore};
use health_ingest::telemetry::{
    ComparisonLog, InMemoryComparisonLog, JsonLinesComparisonLog, TelemetryHarness,
};
use tempfile::TempDir;

fn harness(
    a: Arc<dyn IngestionPipeline>,
    b: Arc<dyn IngestionPipeline>,
    log: Arc<dyn ComparisonLog>,
) -> TelemetryHarness {
    TelemetryHarness::new(a, b, log)
}

#[tokio::test]
async fn test_detail_fractions_for_ten_versus_ten() {
    init_test_logging();
    let a = Arc::new(FixedPipeline::new("a", 10, true));
    let b = Arc::new(FixedPipeline::new("b", 10, false));
    let log = Arc::new(InMemoryComparisonLog::new());

    let report = harness(
        Arc::clone(&a) as Arc<dyn IngestionPipeline>,
        Arc::clone(&b) as Arc<dyn IngestionPipeline>,
        Arc::clone(&log) as Arc<dyn ComparisonLog>,
    )
    .compare_implementations(window_days(30), &IngestOptions::default())
    .await
    .unwrap();

    assert_eq!(report.a_count, 10);
    assert_eq!(report.b_count, 10);
    assert!((report.a_has_detail_fraction - 1.0).abs() < f64::EPSILON);
    assert!(report.b_has_detail_fraction.abs() < f64::EPSILON);
    assert_eq!(report.a_pipeline, "a");
    assert_eq!(report.b_pipeline, "b");
    assert!(report.a_error.is_none() && report.b_error.is_none());
    assert_eq!(a.calls(), 1);
    assert_eq!(b.calls(), 1);

    let entries = log.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, report.id);
}

#[tokio::test]
async fn test_no_workouts_gives_zero_fraction() {
    init_test_logging();
    let report = harness(
        Arc::new(FixedPipeline::new("a", 0, true)),
        Arc::new(FixedPipeline::new("b", 0, false)),
        Arc::new(InMemoryComparisonLog::new()),
    )
    .compare_implementations(window_days(30), &IngestOptions::default())
    .await
    .unwrap();

    assert_eq!(report.a_count, 0);
    assert!(report.a_has_detail_fraction.abs() < f64::EPSILON);
    assert!(report.b_has_detail_fraction.abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_failing_implementation_is_recorded_not_raised() {
    init_test_logging();
    let log = Arc::new(InMemoryComparisonLog::new());
    let report = harness(
        Arc::new(FixedPipeline::failing("a")),
        Arc::new(FixedPipeline::new("b", 3, true)),
        Arc::clone(&log) as Arc<dyn ComparisonLog>,
    )
    .compare_implementations(window_days(30), &IngestOptions::default())
    .await
    .unwrap();

    assert!(report.a_error.as_deref().unwrap().contains("provider unreachable"));
    assert_eq!(report.a_count, 0);
    assert_eq!(report.b_count, 3);
    assert_eq!(log.entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_real_pipelines_show_truncation_gap() {
    init_test_logging();
    let store: Arc<dyn SampleStore> = Arc::new(
        SyntheticSampleStore::with_records(run_history(60)).with_max_records_per_query(40),
    );
    let report = harness(
        Arc::new(SinglePassPipeline::new(Arc::clone(&store))),
        Arc::new(ChunkedPipeline::new(store)),
        Arc::new(InMemoryComparisonLog::new()),
    )
    .compare_implementations(window_days(365), &IngestOptions::only(&[IngestGroup::Workouts]))
    .await
    .unwrap();

    assert_eq!(report.a_count, 40);
    assert_eq!(report.b_count, 60);
    assert!((report.b_has_detail_fraction - 1.0).abs() < f64::EPSILON);
    assert!((report.b_heart_rate_fraction - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_json_lines_log_appends_across_instances() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logs").join("comparisons.jsonl");

    for _ in 0..2 {
        let log: Arc<dyn ComparisonLog> = Arc::new(JsonLinesComparisonLog::new(&path));
        harness(
            Arc::new(FixedPipeline::new("a", 2, true)),
            Arc::new(FixedPipeline::new("b", 2, false)),
            log,
        )
        .compare_implementations(window_days(7), &IngestOptions::default())
        .await
        .unwrap();
    }

    let entries = JsonLinesComparisonLog::new(&path).entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0].id, entries[1].id);
    let raw = fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 2);
}

#[tokio::test]
async fn test_missing_log_file_reads_empty() {
    let dir = TempDir::new().unwrap();
    let log = JsonLinesComparisonLog::new(dir.path().join("absent.jsonl"));
    assert!(log.entries().await.unwrap().is_empty());
}
