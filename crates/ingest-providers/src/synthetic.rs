// ABOUTME: In-memory synthetic sample store for fixtures, development and testing
// ABOUTME: Simulates provider truncation, per-kind and per-window failures, and records queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// RwLock poisoning errors are converted to ProviderError::ConfigurationError
// for proper error propagation through the application

//! # Synthetic Sample Store
//!
//! A [`SampleStore`] backed by pre-loaded [`ProviderRecord`]s. Unlike a real
//! health-data provider it needs no device or permission grant, and it can be
//! told to misbehave the way real providers do:
//!
//! - **Truncation**: `with_max_records_per_query` silently caps every answer,
//!   keeping the oldest records in the window
//! - **Span limit**: `with_max_query_span` answers nothing for windows longer
//!   than the limit
//! - **Failures**: `fail_kind` and `fail_window` make matching queries error
//! - **Latency**: `with_latency` delays every query on the tokio timer
//!
//! Every query is recorded so tests can assert which sub-windows were asked for.
//!
//! ## Thread Safety
//!
//! All data access is protected by `RwLock`; no lock is held across an await.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::errors::provider::{ProviderError, ProviderResult};
use crate::errors::AppResult;
use crate::models::{DataKind, ProviderRecord, TimeWindow};
use crate::store::SampleStore;

/// Default name reported by the synthetic store
pub const SYNTHETIC_STORE_NAME: &str = "synthetic";

/// One query received by the synthetic store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedQuery {
    /// Data kind asked for
    pub kind: DataKind,
    /// Window asked for
    pub window: TimeWindow,
}

/// Synthetic health-data store for development and testing
#[derive(Debug)]
pub struct SyntheticSampleStore {
    /// Pre-loaded records
    records: Arc<RwLock<Vec<ProviderRecord>>>,
    /// Kinds whose queries always fail
    failing_kinds: Arc<RwLock<HashSet<DataKind>>>,
    /// Queries overlapping any of these windows fail
    failing_windows: Arc<RwLock<Vec<TimeWindow>>>,
    /// Every query received, in order
    query_log: Arc<RwLock<Vec<RecordedQuery>>>,
    /// Silent per-query cap, mimicking provider truncation
    max_records_per_query: Option<usize>,
    /// Windows longer than this come back empty
    max_query_span: Option<ChronoDuration>,
    /// Artificial per-query delay
    latency: Option<Duration>,
    store_name: &'static str,
}

impl SyntheticSampleStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Create a store pre-loaded with `records`
    #[must_use]
    pub fn with_records(records: Vec<ProviderRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            failing_kinds: Arc::new(RwLock::new(HashSet::new())),
            failing_windows: Arc::new(RwLock::new(Vec::new())),
            query_log: Arc::new(RwLock::new(Vec::new())),
            max_records_per_query: None,
            max_query_span: None,
            latency: None,
            store_name: SYNTHETIC_STORE_NAME,
        }
    }

    /// Load a JSON array of `ProviderRecord`s
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::SerializationError` if the JSON is not an array of records
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let records: Vec<ProviderRecord> = serde_json::from_str(json)?;
        Ok(Self::with_records(records))
    }

    /// Load a fixture file containing a JSON array of `ProviderRecord`s
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::StorageError` if the file cannot be read, or
    /// `ErrorCode::SerializationError` if its contents do not decode
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path)?;
        let store = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            records = store.record_count().unwrap_or_default(),
            "loaded synthetic fixture"
        );
        Ok(store)
    }

    /// Cap every answer at `limit` records
    #[must_use]
    pub const fn with_max_records_per_query(mut self, limit: usize) -> Self {
        self.max_records_per_query = Some(limit);
        self
    }

    /// Answer nothing for windows longer than `span`
    #[must_use]
    pub const fn with_max_query_span(mut self, span: ChronoDuration) -> Self {
        self.max_query_span = Some(span);
        self
    }

    /// Delay every query by `latency`
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Report a different store name
    #[must_use]
    pub const fn with_name(mut self, name: &'static str) -> Self {
        self.store_name = name;
        self
    }

    fn poisoned(&self, lock: &str) -> ProviderError {
        ProviderError::ConfigurationError {
            store: self.store_name.to_owned(),
            details: format!("RwLock poisoned: {lock} lock"),
        }
    }

    /// Append records
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the internal `RwLock` is poisoned.
    pub fn add_records(&self, records: impl IntoIterator<Item = ProviderRecord>) -> ProviderResult<()> {
        self.records
            .write()
            .map_err(|_| self.poisoned("records"))?
            .extend(records);
        Ok(())
    }

    /// Number of pre-loaded records
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the internal `RwLock` is poisoned.
    pub fn record_count(&self) -> ProviderResult<usize> {
        Ok(self
            .records
            .read()
            .map_err(|_| self.poisoned("records"))?
            .len())
    }

    /// Make every query for `kind` fail
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the internal `RwLock` is poisoned.
    pub fn fail_kind(&self, kind: DataKind) -> ProviderResult<()> {
        self.failing_kinds
            .write()
            .map_err(|_| self.poisoned("failing kinds"))?
            .insert(kind);
        Ok(())
    }

    /// Make every query overlapping `window` fail
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the internal `RwLock` is poisoned.
    pub fn fail_window(&self, window: TimeWindow) -> ProviderResult<()> {
        self.failing_windows
            .write()
            .map_err(|_| self.poisoned("failing windows"))?
            .push(window);
        Ok(())
    }

    /// Every query received so far, in order
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the internal `RwLock` is poisoned.
    pub fn queries(&self) -> ProviderResult<Vec<RecordedQuery>> {
        Ok(self
            .query_log
            .read()
            .map_err(|_| self.poisoned("query log"))?
            .clone())
    }

    /// Forget recorded queries
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::ConfigurationError` if the internal `RwLock` is poisoned.
    pub fn clear_queries(&self) -> ProviderResult<()> {
        self.query_log
            .write()
            .map_err(|_| self.poisoned("query log"))?
            .clear();
        Ok(())
    }

    fn check_failures(&self, kind: DataKind, window: TimeWindow) -> ProviderResult<()> {
        let kind_fails = self
            .failing_kinds
            .read()
            .map_err(|_| self.poisoned("failing kinds"))?
            .contains(&kind);
        if kind_fails {
            return Err(ProviderError::QueryFailed {
                store: self.store_name.to_owned(),
                kind: kind.to_string(),
                message: "simulated failure for data kind".to_owned(),
            });
        }

        let window_fails = self
            .failing_windows
            .read()
            .map_err(|_| self.poisoned("failing windows"))?
            .iter()
            .any(|failing| failing.start < window.end && window.start < failing.end);
        if window_fails {
            return Err(ProviderError::Unavailable {
                store: self.store_name.to_owned(),
                message: format!("simulated outage for {} - {}", window.start, window.end),
            });
        }

        Ok(())
    }
}

impl Default for SyntheticSampleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SampleStore for SyntheticSampleStore {
    fn name(&self) -> &'static str {
        self.store_name
    }

    async fn query(&self, kind: DataKind, window: TimeWindow) -> ProviderResult<Vec<ProviderRecord>> {
        self.query_log
            .write()
            .map_err(|_| self.poisoned("query log"))?
            .push(RecordedQuery { kind, window });

        if let Some(latency) = self.latency {
            sleep(latency).await;
        }

        self.check_failures(kind, window)?;

        if self.max_query_span.is_some_and(|span| window.duration() > span) {
            debug!(kind = %kind, "window exceeds synthetic span limit, answering empty");
            return Ok(Vec::new());
        }

        let mut matching: Vec<ProviderRecord> = {
            let records = self.records.read().map_err(|_| self.poisoned("records"))?;
            records
                .iter()
                .filter(|record| record.kind() == kind && window.contains(record.timestamp()))
                .cloned()
                .collect()
        }; // Drop records lock here

        matching.sort_by_key(ProviderRecord::timestamp);
        if let Some(limit) = self.max_records_per_query {
            if matching.len() > limit {
                debug!(
                    kind = %kind,
                    available = matching.len(),
                    limit,
                    "truncating synthetic answer"
                );
                matching.truncate(limit);
            }
        }

        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sample, SampleKind};
    use chrono::{TimeZone, Utc};

    fn steps_at(hour: u32) -> ProviderRecord {
        let at = Utc.with_ymd_and_hms(2024, 4, 2, hour, 0, 0).unwrap();
        ProviderRecord::Sample(Sample::instant(SampleKind::StepCount, 500.0, at, "phone"))
    }

    fn day() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 3, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_truncation_keeps_oldest_records() {
        let store = SyntheticSampleStore::with_records(vec![steps_at(20), steps_at(8), steps_at(12)])
            .with_max_records_per_query(2);

        let records = store
            .query(DataKind::Sample(SampleKind::StepCount), day())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].timestamp(), steps_at(8).timestamp());
        assert_eq!(records[1].timestamp(), steps_at(12).timestamp());
    }

    #[tokio::test]
    async fn test_failing_kind_is_recorded_and_errors() {
        let store = SyntheticSampleStore::with_records(vec![steps_at(8)]);
        let kind = DataKind::Sample(SampleKind::StepCount);
        store.fail_kind(kind).unwrap();

        let err = store.query(kind, day()).await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(store.queries().unwrap().len(), 1);
    }

    #[test]
    fn test_fixture_json_decodes() {
        let json = r#"[
            {"type": "sample", "kind": "heart_rate", "value": 61.0, "unit": "beats_per_minute",
             "timestamp_start": "2024-04-02T06:00:00Z", "timestamp_end": "2024-04-02T06:00:00Z",
             "source": "watch"},
            {"type": "geo_point", "latitude": 48.85, "longitude": 2.35,
             "timestamp": "2024-04-02T06:00:05Z"}
        ]"#;
        let store = SyntheticSampleStore::from_json_str(json).unwrap();
        assert_eq!(store.record_count().unwrap(), 2);
    }
}
