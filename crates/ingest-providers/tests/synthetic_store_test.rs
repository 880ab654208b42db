// ABOUTME: Integration tests for the synthetic sample store's fixture loading and span limits
// ABOUTME: Writes JSON fixtures to temp files and checks the store answers like a truncating provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use ingest_core::errors::ErrorCode;
use ingest_core::models::{
    DataKind, FetchWindow, ProviderRecord, Sample, SampleKind, TerminationPolicy, TimeWindow,
    Workout, WorkoutKind,
};
use ingest_providers::{ChunkedFetcher, SampleStore, SyntheticSampleStore};
use tempfile::TempDir;

fn fixture_records() -> Vec<ProviderRecord> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 6, 30, 0).unwrap();
    let mut records = vec![ProviderRecord::Workout(
        Workout::new(
            "tempo-1",
            WorkoutKind::Running,
            start,
            start + Duration::minutes(40),
            "watch",
        )
        .with_total_distance(8.2),
    )];
    records.extend((0..60).map(|day| {
        ProviderRecord::Sample(Sample::instant(
            SampleKind::RestingHeartRate,
            52.0,
            start + Duration::days(day),
            "watch",
        ))
    }));
    records
}

fn window() -> TimeWindow {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    TimeWindow::new(start, start + Duration::days(60)).unwrap()
}

#[tokio::test]
async fn test_fixture_file_loads_every_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    fs::write(&path, serde_json::to_string(&fixture_records()).unwrap()).unwrap();

    let store = SyntheticSampleStore::from_json_file(&path).unwrap();

    assert_eq!(store.record_count().unwrap(), 61);
    let workouts = store.query(DataKind::Workout, window()).await.unwrap();
    assert_eq!(workouts.len(), 1);
    let resting = store
        .query(DataKind::Sample(SampleKind::RestingHeartRate), window())
        .await
        .unwrap();
    assert_eq!(resting.len(), 60);
}

#[test]
fn test_missing_fixture_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    let err = SyntheticSampleStore::from_json_file(&dir.path().join("nope.json")).unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
}

#[test]
fn test_malformed_fixture_is_a_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"[{"type": "workout"}"#).unwrap();

    let err = SyntheticSampleStore::from_json_file(&path).unwrap_err();
    assert_eq!(err.code, ErrorCode::SerializationError);
}

#[tokio::test]
async fn test_span_limit_answers_long_windows_empty() {
    let store = Arc::new(
        SyntheticSampleStore::with_records(fixture_records())
            .with_max_query_span(Duration::days(14)),
    );
    let kind = DataKind::Sample(SampleKind::RestingHeartRate);

    let whole = store.query(kind, window()).await.unwrap();
    assert!(whole.is_empty());

    // Weekly chunks fall under the limit and recover everything
    let fetcher = ChunkedFetcher::new(Arc::clone(&store) as Arc<dyn SampleStore>);
    let plan = FetchWindow::from_days(window(), &[30, 7], TerminationPolicy::FirstSuccess);
    let outcome = fetcher.fetch(kind, &plan).await;
    assert_eq!(outcome.records.len(), 60);
}

#[tokio::test]
async fn test_store_is_reusable_after_clearing_queries() {
    let store = SyntheticSampleStore::new().with_name("healthkit-replay");
    assert_eq!(store.name(), "healthkit-replay");
    assert_eq!(store.record_count().unwrap(), 0);
    let kind = DataKind::Sample(SampleKind::RestingHeartRate);

    assert!(store.query(kind, window()).await.unwrap().is_empty());
    assert_eq!(store.queries().unwrap().len(), 1);

    store.add_records(fixture_records()).unwrap();
    store.clear_queries().unwrap();
    assert!(store.queries().unwrap().is_empty());

    let resting = store.query(kind, window()).await.unwrap();
    assert_eq!(resting.len(), 60);
    assert_eq!(store.record_count().unwrap(), 61);
    let queries = store.queries().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].kind, kind);
    assert_eq!(queries[0].window, window());
}
