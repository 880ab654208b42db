// ABOUTME: Tagged provider record variant decoded once at the sample store boundary
// ABOUTME: Data kind identifiers and identity keys used for cross-chunk deduplication
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::sample::{GeoPoint, IntervalEvent, Sample, SampleKind};
use super::workout::Workout;

/// What a sample store query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// Scalar samples of one kind
    Sample(SampleKind),
    /// Workout headers
    Workout,
    /// Discrete interval events (laps)
    WorkoutEvent,
    /// GPS route points
    Route,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sample(kind) => write!(f, "sample:{kind}"),
            Self::Workout => f.write_str("workout"),
            Self::WorkoutEvent => f.write_str("workout_event"),
            Self::Route => f.write_str("route"),
        }
    }
}

/// One record returned by a sample store query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderRecord {
    /// Timestamped scalar sample
    Sample(Sample),
    /// Discrete interval event
    IntervalEvent(IntervalEvent),
    /// GPS route point
    GeoPoint(GeoPoint),
    /// Workout header
    Workout(Workout),
}

/// Deduplication key for a `ProviderRecord`
///
/// Floating-point fields participate through their bit patterns so the key
/// can be hashed; two records are duplicates only when bit-identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordIdentity {
    /// `(kind, timestamp_start, value)`
    Sample {
        /// Sample kind
        kind: SampleKind,
        /// Start timestamp
        start: DateTime<Utc>,
        /// `f64::to_bits` of the value
        value_bits: u64,
    },
    /// `(timestamp_start, timestamp_end)`
    Event {
        /// Event start
        start: DateTime<Utc>,
        /// Event end
        end: DateTime<Utc>,
    },
    /// `(timestamp, latitude, longitude)`
    Point {
        /// Fix time
        timestamp: DateTime<Utc>,
        /// `f64::to_bits` of the latitude
        latitude_bits: u64,
        /// `f64::to_bits` of the longitude
        longitude_bits: u64,
    },
    /// Workouts starting at the same instant are the same workout
    Workout {
        /// Workout start
        start: DateTime<Utc>,
    },
}

impl ProviderRecord {
    /// Data kind this record answers
    #[must_use]
    pub const fn kind(&self) -> DataKind {
        match self {
            Self::Sample(sample) => DataKind::Sample(sample.kind),
            Self::IntervalEvent(_) => DataKind::WorkoutEvent,
            Self::GeoPoint(_) => DataKind::Route,
            Self::Workout(_) => DataKind::Workout,
        }
    }

    /// Instant used to place the record inside a query window
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Sample(sample) => sample.timestamp_start,
            Self::IntervalEvent(event) => event.timestamp_start,
            Self::GeoPoint(point) => point.timestamp,
            Self::Workout(workout) => workout.timestamp_start,
        }
    }

    /// Deduplication key
    #[must_use]
    pub fn identity(&self) -> RecordIdentity {
        match self {
            Self::Sample(sample) => RecordIdentity::Sample {
                kind: sample.kind,
                start: sample.timestamp_start,
                value_bits: sample.value.to_bits(),
            },
            Self::IntervalEvent(event) => RecordIdentity::Event {
                start: event.timestamp_start,
                end: event.timestamp_end,
            },
            Self::GeoPoint(point) => RecordIdentity::Point {
                timestamp: point.timestamp,
                latitude_bits: point.latitude.to_bits(),
                longitude_bits: point.longitude.to_bits(),
            },
            Self::Workout(workout) => RecordIdentity::Workout {
                start: workout.timestamp_start,
            },
        }
    }

    /// Unwrap a sample record
    #[must_use]
    pub fn into_sample(self) -> Option<Sample> {
        match self {
            Self::Sample(sample) => Some(sample),
            _ => None,
        }
    }

    /// Unwrap an interval event record
    #[must_use]
    pub fn into_event(self) -> Option<IntervalEvent> {
        match self {
            Self::IntervalEvent(event) => Some(event),
            _ => None,
        }
    }

    /// Unwrap a route point record
    #[must_use]
    pub fn into_point(self) -> Option<GeoPoint> {
        match self {
            Self::GeoPoint(point) => Some(point),
            _ => None,
        }
    }

    /// Unwrap a workout record
    #[must_use]
    pub fn into_workout(self) -> Option<Workout> {
        match self {
            Self::Workout(workout) => Some(workout),
            _ => None,
        }
    }
}
