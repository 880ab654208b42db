// ABOUTME: Routes ingestion calls to the legacy or chunked pipeline based on a persisted flag
// ABOUTME: Flag changes are persisted before the in-memory switch flips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Pipeline Selector
//!
//! Holds both pipeline implementations and a feature flag. With the flag off
//! calls go to the legacy pipeline, with it on to the chunked one. The flag
//! is read once at the start of each call, so a concurrent toggle never
//! changes the implementation of a call already in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::errors::AppResult;
use crate::flags::{FlagStore, PipelineFlag};
use crate::logging::IngestLogger;
use crate::models::TimeWindow;
use crate::pipeline::{IngestOptions, IngestionPipeline, IngestionResult};

/// Chooses between two pipeline implementations
pub struct PipelineSelector {
    flag_name: String,
    enabled: AtomicBool,
    flag_store: Arc<dyn FlagStore>,
    /// Serializes enable/disable so persisted and in-memory state agree
    toggle_lock: Mutex<()>,
    legacy: Arc<dyn IngestionPipeline>,
    chunked: Arc<dyn IngestionPipeline>,
}

impl PipelineSelector {
    /// Build a selector, reading the flag's persisted value (absent = off)
    ///
    /// # Errors
    ///
    /// Returns an error if the flag store cannot be read
    pub async fn load(
        flag_name: impl Into<String>,
        flag_store: Arc<dyn FlagStore>,
        legacy: Arc<dyn IngestionPipeline>,
        chunked: Arc<dyn IngestionPipeline>,
    ) -> AppResult<Self> {
        let flag_name = flag_name.into();
        let enabled = flag_store.load(&flag_name).await?.unwrap_or(false);
        info!(flag = %flag_name, enabled, "pipeline selector loaded");
        Ok(Self {
            flag_name,
            enabled: AtomicBool::new(enabled),
            flag_store,
            toggle_lock: Mutex::new(()),
            legacy,
            chunked,
        })
    }

    /// Current flag value
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Snapshot of the flag
    #[must_use]
    pub fn flag(&self) -> PipelineFlag {
        PipelineFlag {
            name: self.flag_name.clone(),
            enabled: self.is_enabled(),
        }
    }

    /// Route subsequent calls to the chunked pipeline
    ///
    /// # Errors
    ///
    /// Returns the persistence error; the in-memory flag is left unchanged
    pub async fn enable(&self) -> AppResult<()> {
        self.set(true).await
    }

    /// Route subsequent calls to the legacy pipeline
    ///
    /// # Errors
    ///
    /// Returns the persistence error; the in-memory flag is left unchanged
    pub async fn disable(&self) -> AppResult<()> {
        self.set(false).await
    }

    /// Implementation the next call would use
    #[must_use]
    pub fn active(&self) -> Arc<dyn IngestionPipeline> {
        if self.is_enabled() {
            Arc::clone(&self.chunked)
        } else {
            Arc::clone(&self.legacy)
        }
    }

    async fn set(&self, enabled: bool) -> AppResult<()> {
        let _guard = self.toggle_lock.lock().await;
        if let Err(e) = self.flag_store.save(&self.flag_name, enabled).await {
            IngestLogger::log_flag_change(&self.flag_name, enabled, false);
            return Err(e);
        }
        self.enabled.store(enabled, Ordering::SeqCst);
        IngestLogger::log_flag_change(&self.flag_name, enabled, true);
        Ok(())
    }
}

#[async_trait]
impl IngestionPipeline for PipelineSelector {
    fn name(&self) -> &'static str {
        "selector"
    }

    #[instrument(skip(self, options), fields(flag = %self.flag_name))]
    async fn ingest_range(
        &self,
        window: TimeWindow,
        options: &IngestOptions,
    ) -> AppResult<IngestionResult> {
        let pipeline = self.active();
        info!(pipeline = pipeline.name(), "dispatching ingestion");
        pipeline.ingest_range(window, options).await
    }
}
