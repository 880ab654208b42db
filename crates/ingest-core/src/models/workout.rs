// ABOUTME: Workout headers, per-distance-unit splits, and split distance units
// ABOUTME: Workouts are built from provider records and only gain splits and heart rate summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::statistics::Statistics;
use crate::constants::units::KM_PER_MILE;
use crate::errors::AppError;

/// Workout activity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    /// Outdoor or treadmill running
    Running,
    /// Walking
    Walking,
    /// Hiking
    Hiking,
    /// Cycling
    Cycling,
    /// Swimming
    Swimming,
    /// Rowing
    Rowing,
    /// Strength training
    StrengthTraining,
    /// High intensity interval training
    Hiit,
    /// Yoga
    Yoga,
    /// Anything the provider reports that has no dedicated variant
    #[serde(other)]
    Other,
}

/// Distance unit a workout is split by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    /// Kilometer splits
    #[default]
    Kilometers,
    /// Statute mile splits
    Miles,
}

impl DistanceUnit {
    /// Length of one unit in kilometers
    #[must_use]
    pub const fn km_per_unit(self) -> f64 {
        match self {
            Self::Kilometers => 1.0,
            Self::Miles => KM_PER_MILE,
        }
    }

    /// Convert kilometers to this unit
    #[must_use]
    pub fn from_km(self, km: f64) -> f64 {
        km / self.km_per_unit()
    }

    /// Short label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Kilometers => "km",
            Self::Miles => "mi",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DistanceUnit {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "km" | "kilometer" | "kilometers" => Ok(Self::Kilometers),
            "mi" | "mile" | "miles" => Ok(Self::Miles),
            other => Err(AppError::invalid_input(format!(
                "unknown distance unit '{other}', expected 'km' or 'mi'"
            ))),
        }
    }
}

/// One contiguous portion of a workout covering one distance unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// 1-based position within the workout
    pub index: u32,
    /// Distance covered, in `distance_unit`
    pub distance: f64,
    /// Unit of `distance` and `pace_per_unit`
    pub distance_unit: DistanceUnit,
    /// Split start
    pub timestamp_start: DateTime<Utc>,
    /// Split end
    pub timestamp_end: DateTime<Utc>,
    /// Elapsed seconds
    pub duration_seconds: f64,
    /// Minutes per unit (`5.0` for a 300 s kilometer)
    pub pace_per_unit: f64,
    /// Trailing split shorter than one unit
    pub is_partial: bool,
    /// Heart rate summary for this split, computed on demand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<Statistics>,
}

/// A workout header as reported by the provider, enriched during ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Provider identifier
    pub id: String,
    /// Activity type
    pub kind: WorkoutKind,
    /// Start
    pub timestamp_start: DateTime<Utc>,
    /// End
    pub timestamp_end: DateTime<Utc>,
    /// Total distance in kilometers, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    /// Total active energy in kilocalories, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_energy: Option<f64>,
    /// Originating device or app
    pub source: String,
    /// Heart rate over the workout's own time range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate_summary: Option<Statistics>,
    /// Per-distance-unit splits
    #[serde(default)]
    pub segments: Vec<Split>,
}

impl Workout {
    /// Create a bare workout header
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: WorkoutKind,
        timestamp_start: DateTime<Utc>,
        timestamp_end: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            timestamp_start,
            timestamp_end,
            total_distance: None,
            total_energy: None,
            source: source.into(),
            heart_rate_summary: None,
            segments: Vec::new(),
        }
    }

    /// Set the reported total distance in kilometers
    #[must_use]
    pub fn with_total_distance(mut self, km: f64) -> Self {
        self.total_distance = Some(km);
        self
    }

    /// Set the reported total energy in kilocalories
    #[must_use]
    pub fn with_total_energy(mut self, kcal: f64) -> Self {
        self.total_energy = Some(kcal);
        self
    }

    /// Attach computed splits
    #[must_use]
    pub fn with_segments(mut self, segments: Vec<Split>) -> Self {
        self.segments = segments;
        self
    }

    /// Attach the whole-workout heart rate summary
    #[must_use]
    pub fn with_heart_rate_summary(mut self, summary: Option<Statistics>) -> Self {
        self.heart_rate_summary = summary;
        self
    }

    /// Elapsed time
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.timestamp_end - self.timestamp_start
    }

    /// Whether splits were attached
    #[must_use]
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Whether a non-empty heart rate summary was attached
    #[must_use]
    pub fn has_heart_rate(&self) -> bool {
        self.heart_rate_summary
            .as_ref()
            .is_some_and(|stats| !stats.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_unit_parsing() {
        assert_eq!("KM".parse::<DistanceUnit>().unwrap(), DistanceUnit::Kilometers);
        assert_eq!("miles".parse::<DistanceUnit>().unwrap(), DistanceUnit::Miles);
        assert!("furlong".parse::<DistanceUnit>().is_err());
    }

    #[test]
    fn test_unknown_workout_kind_deserializes_as_other() {
        let kind: WorkoutKind = serde_json::from_str("\"paragliding\"").unwrap();
        assert_eq!(kind, WorkoutKind::Other);
    }

    #[test]
    fn test_reported_totals_serialize_only_when_set() {
        let start = DateTime::<Utc>::UNIX_EPOCH;
        let bare = Workout::new("w1", WorkoutKind::Cycling, start, start + Duration::hours(1), "bike");
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("total_energy").is_none());
        assert!(json.get("total_distance").is_none());

        let reported = bare.with_total_distance(30.5).with_total_energy(640.0);
        assert_eq!(reported.total_energy, Some(640.0));
        let json = serde_json::to_value(&reported).unwrap();
        assert_eq!(json["total_energy"], 640.0);
        assert_eq!(json["total_distance"], 30.5);
        assert_eq!(reported.duration(), Duration::hours(1));
    }

    #[test]
    fn test_mile_conversion() {
        let miles = DistanceUnit::Miles.from_km(KM_PER_MILE * 2.0);
        assert!((miles - 2.0).abs() < 1e-12);
    }
}
