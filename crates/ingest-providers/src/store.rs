// ABOUTME: Boundary trait for the external health-data provider's sample queries
// ABOUTME: One query per data kind and time window, answering decoded provider records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;

use crate::errors::provider::ProviderResult;
use crate::models::{DataKind, ProviderRecord, TimeWindow};

/// Raw query capability supplied by the surrounding system
///
/// Implementations decode provider payloads into [`ProviderRecord`] variants
/// once, here. A query may silently return fewer records than exist in the
/// window; callers that need completeness go through the chunked fetcher.
#[async_trait]
pub trait SampleStore: Send + Sync {
    /// Store name used in logs and errors
    fn name(&self) -> &'static str;

    /// Return records of `kind` whose timestamp lies in `window`
    ///
    /// # Errors
    ///
    /// Returns a `ProviderError` when the provider rejects or fails the query
    async fn query(&self, kind: DataKind, window: TimeWindow) -> ProviderResult<Vec<ProviderRecord>>;
}
