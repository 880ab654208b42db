// ABOUTME: Legacy ingestion pipeline that queries each data kind once over the whole window
// ABOUTME: Subject to silent provider truncation on long windows, kept for side-by-side comparison
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

/// Pipeline name reported by [`SinglePassPipeline`]
pub const SINGLE_PASS_PIPELINE_NAME: &str = "single_pass";

/// One query per kind; chunk plans in the options are ignored
#[derive(Clone)]
pub struct SinglePassPipeline {
    coordinator: IngestionCoordinator,
}

impl SinglePassPipeline {
    /// Create the pipeline over `store`
    #[must_use]
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self {
            coordinator: IngestionCoordinator::new(
                SINGLE_PASS_PIPELINE_NAME,
                store,
                FetchStrategy::SinglePass,
            ),
        }
    }
}

#[async_trait]
impl IngestionPipeline for SinglePassPipeline {
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
