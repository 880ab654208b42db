// ABOUTME: Time window and fetch window types for bounded provider queries
// ABOUTME: Half-open instant ranges, chunk partitioning, and termination policies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Half-open `[start, end)` range of instants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive start
    pub start: DateTime<Utc>,
    /// Exclusive end
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, rejecting empty or inverted ranges
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidWindow` if `end` is not after `start`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if end <= start {
            return Err(AppError::invalid_window(format!(
                "window end {end} must be after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Window covering the `days` days that end at `end`
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidWindow` when `days` is zero or reaches
    /// past the earliest representable instant
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> AppResult<Self> {
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                AppError::invalid_window(format!("{days} days before {end} is out of range"))
            })?;
        Self::new(start, end)
    }

    /// Length of the window
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` lies inside the half-open range
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Partition into consecutive non-overlapping sub-windows of `chunk`
    ///
    /// The final sub-window is clipped to `end`. A non-positive chunk yields
    /// the whole window as a single sub-window.
    #[must_use]
    pub fn chunks(&self, chunk: Duration) -> Vec<Self> {
        if chunk <= Duration::zero() {
            return vec![*self];
        }

        let mut windows = Vec::new();
        let mut cursor = self.start;
        while cursor < self.end {
            let next = cursor.checked_add_signed(chunk).map_or(self.end, |t| t.min(self.end));
            windows.push(Self {
                start: cursor,
                end: next,
            });
            cursor = next;
        }
        windows
    }
}

/// When the chunked fetcher stops trying smaller chunk sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationPolicy {
    /// Stop after the first chunk size that produced any non-empty sub-window
    FirstSuccess,
    /// Sweep every chunk size and merge the results
    Exhaustive,
}

/// A requested range plus the chunking plan used to retrieve it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    /// Full requested range
    pub window: TimeWindow,
    /// Candidate chunk sizes, strictly descending and positive
    pub chunk_sizes: Vec<Duration>,
    /// Termination policy
    pub policy: TerminationPolicy,
}

impl FetchWindow {
    /// Create a fetch window, normalizing the candidate list
    ///
    /// Candidates are sorted descending with non-positive sizes and duplicates
    /// removed. An empty candidate list falls back to a single chunk spanning
    /// the whole window.
    #[must_use]
    pub fn new(window: TimeWindow, chunk_sizes: Vec<Duration>, policy: TerminationPolicy) -> Self {
        let mut sizes: Vec<Duration> = chunk_sizes
            .into_iter()
            .filter(|size| *size > Duration::zero())
            .collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();
        if sizes.is_empty() {
            sizes.push(window.duration());
        }

        Self {
            window,
            chunk_sizes: sizes,
            policy,
        }
    }

    /// Create a fetch window from chunk sizes expressed in whole days
    #[must_use]
    pub fn from_days(window: TimeWindow, days: &[u32], policy: TerminationPolicy) -> Self {
        let sizes = days
            .iter()
            .map(|d| Duration::days(i64::from(*d)))
            .collect();
        Self::new(window, sizes, policy)
    }

    /// A plan that queries the whole window in one request
    #[must_use]
    pub fn single(window: TimeWindow) -> Self {
        Self::new(window, Vec::new(), TerminationPolicy::FirstSuccess)
    }
}
