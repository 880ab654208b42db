// ABOUTME: Integration tests for flag-driven pipeline selection
// ABOUTME: Validates routing, persist-before-flip semantics, and reload from a flag file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{init_test_logging, window_days, FixedPipeline};
use health_ingest::constants::flags::CHUNKED_PIPELINE;
use health_ingest::errors::ErrorCode;
use health_ingest::flags::{FileFlagStore, FlagStore, InMemoryFlagStore};
use health_ingest::pipeline::{IngestOptions, IngestionPipeline};
use health_ingest::selector::PipelineSelector;
use tempfile::TempDir;

struct Fixture {
    legacy: Arc<FixedPipeline>,
    chunked: Arc<FixedPipeline>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            legacy: Arc::new(FixedPipeline::new("legacy", 1, false)),
            chunked: Arc::new(FixedPipeline::new("chunked", 2, true)),
        }
    }

    async fn selector(&self, store: Arc<dyn FlagStore>) -> PipelineSelector {
        PipelineSelector::load(
            CHUNKED_PIPELINE,
            store,
            Arc::clone(&self.legacy) as Arc<dyn IngestionPipeline>,
            Arc::clone(&self.chunked) as Arc<dyn IngestionPipeline>,
        )
        .await
        .unwrap()
    }
}

#[tokio::test]
async fn test_flag_off_routes_to_legacy() {
    init_test_logging();
    let fixture = Fixture::new();
    let selector = fixture.selector(Arc::new(InMemoryFlagStore::new())).await;

    assert!(!selector.is_enabled());
    let result = selector
        .ingest_range(window_days(7), &IngestOptions::default())
        .await
        .unwrap();

    assert_eq!(result.report.pipeline, "legacy");
    assert_eq!(fixture.legacy.calls(), 1);
    assert_eq!(fixture.chunked.calls(), 0);
}

#[tokio::test]
async fn test_enable_persists_then_routes_to_chunked() {
    init_test_logging();
    let fixture = Fixture::new();
    let store = Arc::new(InMemoryFlagStore::new());
    let selector = fixture.selector(Arc::clone(&store) as Arc<dyn FlagStore>).await;

    selector.enable().await.unwrap();

    assert_eq!(store.load(CHUNKED_PIPELINE).await.unwrap(), Some(true));
    assert_eq!(selector.active().name(), "chunked");
    let result = selector
        .ingest_range(window_days(7), &IngestOptions::default())
        .await
        .unwrap();
    assert_eq!(result.workouts.len(), 2);
    assert_eq!(fixture.chunked.calls(), 1);

    selector.disable().await.unwrap();
    assert_eq!(store.load(CHUNKED_PIPELINE).await.unwrap(), Some(false));
    assert_eq!(selector.active().name(), "legacy");
}

#[tokio::test]
async fn test_failed_persist_leaves_flag_unchanged() {
    init_test_logging();
    let fixture = Fixture::new();
    let store = Arc::new(InMemoryFlagStore::new());
    let selector = fixture.selector(Arc::clone(&store) as Arc<dyn FlagStore>).await;

    store.set_fail_writes(true);
    let err = selector.enable().await.unwrap_err();

    assert_eq!(err.code, ErrorCode::StorageError);
    assert!(!selector.is_enabled());
    assert_eq!(store.load(CHUNKED_PIPELINE).await.unwrap(), None);
    selector
        .ingest_range(window_days(7), &IngestOptions::default())
        .await
        .unwrap();
    assert_eq!(fixture.legacy.calls(), 1);
}

#[tokio::test]
async fn test_flag_survives_restart_through_file_store() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("flags.json");
    let fixture = Fixture::new();

    let first = fixture.selector(Arc::new(FileFlagStore::new(&path))).await;
    first.enable().await.unwrap();
    drop(first);

    let second = fixture.selector(Arc::new(FileFlagStore::new(&path))).await;
    assert!(second.is_enabled());
    let flag = second.flag();
    assert_eq!(flag.name, CHUNKED_PIPELINE);
    assert!(flag.enabled);
}
