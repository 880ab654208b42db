// ABOUTME: Chunked ingestion pipeline that walks each kind at several granularities
// ABOUTME: Recovers records a provider silently truncates on long historical windows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use ingest_providers::SampleStore;

use super::coordinator::{FetchStrategy, IngestionCoordinator};
use super::{IngestOptions, IngestionPipeline, IngestionResult};
use crate::errors::AppResult;
use crate::models::TimeWindow;

/// Pipeline name reported by [`ChunkedPipeline`]
pub const CHUNKED_PIPELINE_NAME: &str = "chunked";

/// Workout, activity and sleep kinds use first-success chunking; biometric
/// kinds are fetched exhaustively at every candidate size
#[derive(Clone)]
pub struct ChunkedPipeline {
    coordinator: IngestionCoordinator,
}

impl ChunkedPipeline {
    /// Create the pipeline over `store`
    #[must_use]
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self {
            coordinator: IngestionCoordinator::new(
                CHUNKED_PIPELINE_NAME,
                store,
                FetchStrategy::Chunked,
            ),
        }
    }
}

#[async_trait]
impl IngestionPipeline for ChunkedPipeline {
    fn name(&self) -> &'static str {
        self.coordinator.name()
    }

    async fn ingest_range(
        &self,
        window: TimeWindow,
        options: &IngestOptions,
    ) -> AppResult<IngestionResult> {
        Ok(self.coordinator.ingest(window, options).await)
    }
}
