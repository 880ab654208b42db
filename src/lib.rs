// ABOUTME: Main library entry point for the historical health-data ingestion engine
// ABOUTME: Ingestion pipelines, flag-based pipeline selection, comparison telemetry, config, and logging
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Health Ingest
//!
//! Retrieves historical health data from a provider that silently truncates
//! long query windows, reconstructs per-distance-unit workout splits, and
//! lets two pipeline implementations run side by side behind a flag.
//!
//! ## Architecture
//!
//! - **ingest-core**: domain models, errors, constants
//! - **ingest-providers**: the sample store boundary and the chunked fetcher
//! - **ingest-analysis**: haversine distance, split computation, statistics
//! - **pipeline** (this crate): the single-pass and chunked ingestion flows
//! - **selector**: routes calls to one implementation based on a persisted flag
//! - **telemetry**: runs both implementations and logs a comparison
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use health_ingest::models::TimeWindow;
//! use health_ingest::pipeline::{ChunkedPipeline, IngestOptions, IngestionPipeline};
//! use health_ingest::providers::SyntheticSampleStore;
//! use chrono::Utc;
//!
//! # async fn example() -> health_ingest::errors::AppResult<()> {
//! let store = Arc::new(SyntheticSampleStore::new());
//! let pipeline = ChunkedPipeline::new(store);
//! let window = TimeWindow::trailing_days(Utc::now(), 365)?;
//! let result = pipeline.ingest_range(window, &IngestOptions::default()).await?;
//! println!("{} workouts", result.workouts.len());
//! # Ok(())
//! # }
//! ```

// Re-export foundation crates so `crate::models`, `crate::errors` etc. resolve
pub use ingest_core::constants;
pub use ingest_core::errors;
pub use ingest_core::models;

/// Split computation, statistics, and great-circle distance
pub use ingest_analysis as analysis;
/// Sample store boundary, synthetic store, and chunked fetcher
pub use ingest_providers as providers;

/// Environment-based configuration
pub mod config;

/// Flag persistence for the pipeline switch
pub mod flags;

/// Structured logging setup
pub mod logging;

/// Ingestion pipelines and their result types
pub mod pipeline;

/// Flag-driven choice between pipeline implementations
pub mod selector;

/// Side-by-side comparison of pipeline implementations
pub mod telemetry;
