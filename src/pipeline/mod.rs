// ABOUTME: Ingestion pipeline trait, options, and the result and report types both pipelines produce
// ABOUTME: Declares the single-pass and chunked implementations and their shared assembly steps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ingestion Pipelines
//!
//! Two implementations of [`IngestionPipeline`] evolve side by side:
//!
//! - [`SinglePassPipeline`] queries each data kind once over the whole
//!   window, which is what suffers silent provider truncation
//! - [`ChunkedPipeline`] retrieves each kind through the chunked fetcher
//!
//! Both produce an [`IngestionResult`] that the storage collaborator persists
//! verbatim. A failing data kind never aborts a run; it is reported in
//! [`IngestionReport`] and the remaining kinds are returned.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::chunking::{
    ACTIVITY_CHUNK_DAYS, BIOMETRIC_CHUNK_DAYS, SLEEP_CHUNK_DAYS, WORKOUT_CHUNK_DAYS,
};
use crate::errors::{AppError, AppResult};
use crate::models::{
    BiometricSeries, DailyActivity, DistanceUnit, SleepNight, TimeWindow, Workout,
};

/// Chunked multi-granularity implementation
pub mod chunked;
/// Calendar-day bucketing for activity and sleep, biometric series assembly
pub mod daily;
/// Workout enrichment with splits and heart rate
pub mod enrich;
/// Single-query-per-kind implementation
pub mod single_pass;

mod coordinator;

pub use chunked::{ChunkedPipeline, CHUNKED_PIPELINE_NAME};
pub use enrich::WorkoutExtras;
pub use single_pass::{SinglePassPipeline, SINGLE_PASS_PIPELINE_NAME};

/// Groups of data kinds an ingestion run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestGroup {
    /// Workout headers with splits and heart rate
    Workouts,
    /// Body composition and resting heart rate
    Biometrics,
    /// Daily activity totals
    Activity,
    /// Nightly sleep stages
    Sleep,
}

impl IngestGroup {
    /// Every group, in ingestion order
    pub const ALL: [Self; 4] = [Self::Workouts, Self::Biometrics, Self::Activity, Self::Sleep];

    /// Stable identifier
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workouts => "workouts",
            Self::Biometrics => "biometrics",
            Self::Activity => "activity",
            Self::Sleep => "sleep",
        }
    }
}

impl fmt::Display for IngestGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chunk size candidates in days, per group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPlan {
    /// Workout headers
    pub workouts: Vec<u32>,
    /// Biometric kinds
    pub biometrics: Vec<u32>,
    /// Daily activity kinds
    pub activity: Vec<u32>,
    /// Sleep kinds
    pub sleep: Vec<u32>,
}

impl ChunkPlan {
    /// Candidates for `group`
    #[must_use]
    pub fn days_for(&self, group: IngestGroup) -> &[u32] {
        match group {
            IngestGroup::Workouts => &self.workouts,
            IngestGroup::Biometrics => &self.biometrics,
            IngestGroup::Activity => &self.activity,
            IngestGroup::Sleep => &self.sleep,
        }
    }
}

impl Default for ChunkPlan {
    fn default() -> Self {
        Self {
            workouts: WORKOUT_CHUNK_DAYS.to_vec(),
            biometrics: BIOMETRIC_CHUNK_DAYS.to_vec(),
            activity: ACTIVITY_CHUNK_DAYS.to_vec(),
            sleep: SLEEP_CHUNK_DAYS.to_vec(),
        }
    }
}

/// Per-run options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// Groups to ingest
    pub groups: Vec<IngestGroup>,
    /// Unit workouts are split by
    pub distance_unit: DistanceUnit,
    /// Chunk candidates, used by the chunked pipeline
    pub chunk_plan: ChunkPlan,
    /// Fixed offset that defines calendar-day boundaries
    pub day_offset: FixedOffset,
    /// Attach a heart rate summary to every split
    pub segment_heart_rate: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            groups: IngestGroup::ALL.to_vec(),
            distance_unit: DistanceUnit::default(),
            chunk_plan: ChunkPlan::default(),
            day_offset: utc_offset(),
            segment_heart_rate: false,
        }
    }
}

impl IngestOptions {
    /// Options covering only `groups`
    #[must_use]
    pub fn only(groups: &[IngestGroup]) -> Self {
        Self {
            groups: groups.to_vec(),
            ..Self::default()
        }
    }

    /// Whether `group` is requested
    #[must_use]
    pub fn includes(&self, group: IngestGroup) -> bool {
        self.groups.contains(&group)
    }

    /// Set the day boundary from an offset east of UTC in minutes
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidInput` if the offset is a day or more
    pub fn with_day_offset_minutes(mut self, minutes: i32) -> AppResult<Self> {
        self.day_offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                AppError::invalid_input(format!("day offset of {minutes} minutes is out of range"))
            })?;
        Ok(self)
    }
}

fn utc_offset() -> FixedOffset {
    Utc.fix()
}

/// Outcome of one group within a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KindStatus {
    /// Not requested in this run
    NotAttempted,
    /// Queried, nothing found
    NoData,
    /// Records retrieved (after deduplication)
    Retrieved {
        /// Record count
        records: usize,
    },
    /// Every query for the group failed
    Failed {
        /// Last failure reason
        reason: String,
    },
}

/// One data kind that could not be retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindFailure {
    /// Group the kind belongs to
    pub group: IngestGroup,
    /// Data kind identifier
    pub kind: String,
    /// Human-readable reason
    pub reason: String,
}

/// What happened during one ingestion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Pipeline that produced the result
    pub pipeline: String,
    /// Requested window
    pub window: TimeWindow,
    /// Status per group
    pub groups: BTreeMap<IngestGroup, KindStatus>,
    /// Individual data kinds that failed
    pub failures: Vec<KindFailure>,
}

impl IngestionReport {
    /// An empty report with every group `NotAttempted`
    #[must_use]
    pub fn new(pipeline: &str, window: TimeWindow) -> Self {
        Self {
            pipeline: pipeline.to_owned(),
            window,
            groups: IngestGroup::ALL
                .into_iter()
                .map(|group| (group, KindStatus::NotAttempted))
                .collect(),
            failures: Vec::new(),
        }
    }

    /// Status of `group`
    #[must_use]
    pub fn status(&self, group: IngestGroup) -> &KindStatus {
        self.groups.get(&group).unwrap_or(&KindStatus::NotAttempted)
    }

    /// Whether any group failed outright
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.groups
            .values()
            .any(|status| matches!(status, KindStatus::Failed { .. }))
    }
}

/// Everything an ingestion run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResult {
    /// Workouts, oldest first, enriched with splits and heart rate
    pub workouts: Vec<Workout>,
    /// One series per biometric kind that had data
    pub biometrics: Vec<BiometricSeries>,
    /// One record per calendar day with activity
    pub activities: Vec<DailyActivity>,
    /// One record per night with sleep data
    pub sleep: Vec<SleepNight>,
    /// Run report
    pub report: IngestionReport,
}

impl IngestionResult {
    /// Fraction of workouts that carry splits, `0.0` without workouts
    #[must_use]
    pub fn detail_fraction(&self) -> f64 {
        fraction(&self.workouts, Workout::has_segments)
    }

    /// Fraction of workouts that carry a heart rate summary, `0.0` without workouts
    #[must_use]
    pub fn heart_rate_fraction(&self) -> f64 {
        fraction(&self.workouts, Workout::has_heart_rate)
    }
}

fn fraction(workouts: &[Workout], predicate: impl Fn(&Workout) -> bool) -> f64 {
    if workouts.is_empty() {
        return 0.0;
    }
    let matching = workouts.iter().filter(|w| predicate(w)).count();
    matching as f64 / workouts.len() as f64
}

/// An implementation of the ingestion flow
#[async_trait]
pub trait IngestionPipeline: Send + Sync {
    /// Implementation name used in reports and logs
    fn name(&self) -> &'static str;

    /// Ingest every requested group over `window`
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that prevent any result at all;
    /// per-kind failures are reported in the result instead
    async fn ingest_range(
        &self,
        window: TimeWindow,
        options: &IngestOptions,
    ) -> AppResult<IngestionResult>;
}
