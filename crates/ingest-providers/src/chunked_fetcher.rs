// ABOUTME: Multi-granularity historical fetcher that works around provider truncation
// ABOUTME: Sweeps a range at each candidate chunk size, merges, and deduplicates records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Chunked Fetcher
//!
//! Providers silently cap how many records a single historical query returns,
//! so a year-long query can come back with only the first few weeks. The
//! fetcher walks the requested range once per candidate chunk size, largest
//! first, querying one sub-window at a time.
//!
//! - [`TerminationPolicy::FirstSuccess`] stops after the first size whose
//!   sweep produced at least one non-empty sub-window.
//! - [`TerminationPolicy::Exhaustive`] sweeps every size and merges them all.
//!
//! Merged records are deduplicated on [`RecordIdentity`], first occurrence
//! wins. Sub-window errors are logged and skipped; the fetcher itself never
//! fails.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::models::{DataKind, FetchWindow, ProviderRecord, RecordIdentity, TerminationPolicy, TimeWindow};
use crate::store::SampleStore;

/// Overall result of a chunked fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// At least one record was retrieved
    Found,
    /// Queries succeeded (or some failed) but nothing was returned
    NoData,
    /// Every sub-window query failed
    AllFailed,
}

/// Counters describing what a chunked fetch did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchReport {
    /// Chunk sizes swept, in seconds, in the order they were tried
    pub chunk_seconds_attempted: Vec<i64>,
    /// Sub-window queries issued
    pub sub_windows_queried: usize,
    /// Sub-window queries that returned an error
    pub sub_windows_failed: usize,
    /// Sub-window queries that returned at least one record
    pub sub_windows_non_empty: usize,
    /// Records dropped as duplicates after merging
    pub duplicates_removed: usize,
}

/// Deduplicated records plus the report of how they were obtained
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    /// Deduplicated records in retrieval order
    pub records: Vec<ProviderRecord>,
    /// Fetch counters
    pub report: FetchReport,
}

impl FetchOutcome {
    /// Classify the outcome
    #[must_use]
    pub fn status(&self) -> FetchStatus {
        if !self.records.is_empty() {
            FetchStatus::Found
        } else if self.report.sub_windows_queried > 0
            && self.report.sub_windows_failed == self.report.sub_windows_queried
        {
            FetchStatus::AllFailed
        } else {
            FetchStatus::NoData
        }
    }
}

/// Records and counters gathered by one sweep at one chunk size
#[derive(Debug, Default)]
struct Sweep {
    records: Vec<ProviderRecord>,
    queried: usize,
    failed: usize,
    non_empty: usize,
}

/// Fetches a range at several granularities through a [`SampleStore`]
#[derive(Clone)]
pub struct ChunkedFetcher {
    store: Arc<dyn SampleStore>,
}

impl ChunkedFetcher {
    /// Create a fetcher over `store`
    #[must_use]
    pub fn new(store: Arc<dyn SampleStore>) -> Self {
        Self { store }
    }

    /// Name of the underlying store
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Retrieve every record of `kind` in `plan.window`
    ///
    /// Never fails: sub-window errors are counted in the report and an
    /// exhausted plan yields an empty outcome.
    #[instrument(skip(self, plan), fields(store = self.store.name(), kind = %kind, policy = ?plan.policy))]
    pub async fn fetch(&self, kind: DataKind, plan: &FetchWindow) -> FetchOutcome {
        let mut merged = Vec::new();
        let mut report = FetchReport::default();

        for &chunk in &plan.chunk_sizes {
            let sweep = self.sweep(kind, plan.window, chunk).await;

            // Merge only once the whole sweep has completed
            report.chunk_seconds_attempted.push(chunk.num_seconds());
            report.sub_windows_queried += sweep.queried;
            report.sub_windows_failed += sweep.failed;
            report.sub_windows_non_empty += sweep.non_empty;
            let yielded = sweep.non_empty > 0;
            merged.extend(sweep.records);

            if yielded && plan.policy == TerminationPolicy::FirstSuccess {
                debug!(
                    chunk_days = chunk.num_days(),
                    "chunk size yielded data, skipping smaller sizes"
                );
                break;
            }
        }

        let (records, duplicates_removed) = dedup_records(merged);
        report.duplicates_removed = duplicates_removed;

        let outcome = FetchOutcome { records, report };
        info!(
            records = outcome.records.len(),
            queried = outcome.report.sub_windows_queried,
            failed = outcome.report.sub_windows_failed,
            duplicates = outcome.report.duplicates_removed,
            status = ?outcome.status(),
            "chunked fetch complete"
        );
        outcome
    }

    /// Walk `window` in consecutive sub-windows of `chunk`, strictly sequentially
    async fn sweep(&self, kind: DataKind, window: TimeWindow, chunk: Duration) -> Sweep {
        let mut sweep = Sweep::default();

        for sub_window in window.chunks(chunk) {
            sweep.queried += 1;
            match self.store.query(kind, sub_window).await {
                Ok(records) if records.is_empty() => {}
                Ok(records) => {
                    debug!(
                        start = %sub_window.start,
                        end = %sub_window.end,
                        count = records.len(),
                        "sub-window returned records"
                    );
                    sweep.non_empty += 1;
                    sweep.records.extend(records);
                }
                Err(e) => {
                    warn!(
                        start = %sub_window.start,
                        end = %sub_window.end,
                        chunk_days = chunk.num_days(),
                        retryable = e.is_retryable(),
                        "sub-window query failed, continuing: {e}"
                    );
                    sweep.failed += 1;
                }
            }
        }

        sweep
    }
}

/// Drop records whose identity was already seen, keeping the first occurrence
///
/// Returns the surviving records and how many were removed.
#[must_use]
pub fn dedup_records(records: Vec<ProviderRecord>) -> (Vec<ProviderRecord>, usize) {
    let before = records.len();
    let mut seen: HashSet<RecordIdentity> = HashSet::with_capacity(before);
    let kept: Vec<ProviderRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.identity()))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sample, SampleKind};
    use chrono::{TimeZone, Utc};

    fn weight(value: f64, source: &str) -> ProviderRecord {
        let at = Utc.with_ymd_and_hms(2024, 2, 10, 6, 30, 0).unwrap();
        ProviderRecord::Sample(Sample::instant(SampleKind::BodyMass, value, at, source))
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let (kept, removed) = dedup_records(vec![
            weight(70.0, "first"),
            weight(70.5, "other-value"),
            weight(70.0, "second"),
        ]);

        assert_eq!(removed, 1);
        assert_eq!(kept.len(), 2);
        let ProviderRecord::Sample(first) = &kept[0] else {
            panic!("expected a sample");
        };
        assert_eq!(first.source, "first");
    }

    #[test]
    fn test_status_classification() {
        let mut outcome = FetchOutcome::default();
        assert_eq!(outcome.status(), FetchStatus::NoData);

        outcome.report.sub_windows_queried = 3;
        outcome.report.sub_windows_failed = 3;
        assert_eq!(outcome.status(), FetchStatus::AllFailed);

        outcome.report.sub_windows_failed = 2;
        assert_eq!(outcome.status(), FetchStatus::NoData);

        outcome.records.push(weight(70.0, "scale"));
        assert_eq!(outcome.status(), FetchStatus::Found);
    }
}
