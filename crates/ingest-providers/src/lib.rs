// ABOUTME: Sample store boundary and chunked historical retrieval for the ingestion engine
// ABOUTME: Store trait, synthetic fixture-backed store, and the chunked fetcher with dedup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Sample store abstractions and chunked retrieval.
//!
//! The external health-data provider is reached only through [`SampleStore`].
//! Large historical windows are silently truncated by real providers, so the
//! [`ChunkedFetcher`] re-walks a range at several granularities and merges
//! what each sweep returned.

// Re-export ingest-core modules so modules here can keep `use crate::errors::*` etc.
pub use ingest_core::constants;
pub use ingest_core::errors;
pub use ingest_core::models;

/// Chunked multi-granularity fetcher with record deduplication
pub mod chunked_fetcher;
/// The sample store boundary trait
pub mod store;
/// In-memory synthetic store for fixtures, truncation and failure simulation
pub mod synthetic;

pub use chunked_fetcher::{ChunkedFetcher, FetchOutcome, FetchReport, FetchStatus};
pub use ingest_core::errors::provider::{ProviderError, ProviderResult};
pub use store::SampleStore;
pub use synthetic::SyntheticSampleStore;
