// ABOUTME: Timestamped scalar samples, GPS points, and provider interval events
// ABOUTME: Defines sample kinds, units with distance conversion, and kind grouping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::units::{KM_PER_METER, KM_PER_MILE, SECONDS_PER_MINUTE};

/// Kind of scalar sample the provider can be queried for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Instantaneous heart rate
    HeartRate,
    /// Resting heart rate (one per day)
    RestingHeartRate,
    /// Body weight
    BodyMass,
    /// Body mass index
    BodyMassIndex,
    /// Body fat percentage
    BodyFatPercentage,
    /// Step count over an interval
    StepCount,
    /// Walking/running distance over an interval
    DistanceWalkingRunning,
    /// Active energy burned over an interval
    ActiveEnergyBurned,
    /// Floors climbed over an interval
    FlightsClimbed,
    /// Exercise minutes over an interval
    ExerciseTime,
    /// Time in bed
    SleepInBed,
    /// Time asleep, stage unspecified
    SleepAsleep,
    /// Awake during a sleep session
    SleepAwake,
    /// Core (light) sleep
    SleepCore,
    /// Deep sleep
    SleepDeep,
    /// REM sleep
    SleepRem,
}

/// Which part of an ingestion run a sample kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindGroup {
    /// Workout detail (heart rate, distance series)
    WorkoutDetail,
    /// Body composition and resting vitals
    Biometric,
    /// Daily activity totals
    Activity,
    /// Sleep stages
    Sleep,
}

impl SampleKind {
    /// Body composition and vitals kinds retrieved exhaustively
    pub const BIOMETRICS: [Self; 4] = [
        Self::BodyMass,
        Self::BodyMassIndex,
        Self::BodyFatPercentage,
        Self::RestingHeartRate,
    ];

    /// Kinds summed into one `DailyActivity` per day
    pub const DAILY_ACTIVITY: [Self; 5] = [
        Self::StepCount,
        Self::DistanceWalkingRunning,
        Self::ActiveEnergyBurned,
        Self::FlightsClimbed,
        Self::ExerciseTime,
    ];

    /// Kinds merged into one `SleepNight` per day
    pub const SLEEP: [Self; 6] = [
        Self::SleepInBed,
        Self::SleepAsleep,
        Self::SleepAwake,
        Self::SleepCore,
        Self::SleepDeep,
        Self::SleepRem,
    ];

    /// Stable identifier used in logs and serialized output
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeartRate => "heart_rate",
            Self::RestingHeartRate => "resting_heart_rate",
            Self::BodyMass => "body_mass",
            Self::BodyMassIndex => "body_mass_index",
            Self::BodyFatPercentage => "body_fat_percentage",
            Self::StepCount => "step_count",
            Self::DistanceWalkingRunning => "distance_walking_running",
            Self::ActiveEnergyBurned => "active_energy_burned",
            Self::FlightsClimbed => "flights_climbed",
            Self::ExerciseTime => "exercise_time",
            Self::SleepInBed => "sleep_in_bed",
            Self::SleepAsleep => "sleep_asleep",
            Self::SleepAwake => "sleep_awake",
            Self::SleepCore => "sleep_core",
            Self::SleepDeep => "sleep_deep",
            Self::SleepRem => "sleep_rem",
        }
    }

    /// Group this kind is ingested with
    #[must_use]
    pub const fn group(self) -> KindGroup {
        match self {
            Self::HeartRate => KindGroup::WorkoutDetail,
            Self::RestingHeartRate
            | Self::BodyMass
            | Self::BodyMassIndex
            | Self::BodyFatPercentage => KindGroup::Biometric,
            Self::StepCount
            | Self::DistanceWalkingRunning
            | Self::ActiveEnergyBurned
            | Self::FlightsClimbed
            | Self::ExerciseTime => KindGroup::Activity,
            Self::SleepInBed
            | Self::SleepAsleep
            | Self::SleepAwake
            | Self::SleepCore
            | Self::SleepDeep
            | Self::SleepRem => KindGroup::Sleep,
        }
    }

    /// Unit a provider reports this kind in by default
    #[must_use]
    pub const fn default_unit(self) -> SampleUnit {
        match self {
            Self::HeartRate | Self::RestingHeartRate => SampleUnit::BeatsPerMinute,
            Self::BodyMass => SampleUnit::Kilogram,
            Self::BodyMassIndex => SampleUnit::KilogramPerSquareMeter,
            Self::BodyFatPercentage => SampleUnit::Percent,
            Self::StepCount | Self::FlightsClimbed => SampleUnit::Count,
            Self::DistanceWalkingRunning => SampleUnit::Kilometer,
            Self::ActiveEnergyBurned => SampleUnit::Kilocalorie,
            Self::ExerciseTime
            | Self::SleepInBed
            | Self::SleepAsleep
            | Self::SleepAwake
            | Self::SleepCore
            | Self::SleepDeep
            | Self::SleepRem => SampleUnit::Minute,
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit attached to a sample value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleUnit {
    /// Dimensionless count
    Count,
    /// Beats per minute
    BeatsPerMinute,
    /// Kilograms
    Kilogram,
    /// kg/m²
    KilogramPerSquareMeter,
    /// Percent (0-100)
    Percent,
    /// Meters
    Meter,
    /// Kilometers
    Kilometer,
    /// Statute miles
    Mile,
    /// Kilocalories
    Kilocalorie,
    /// Minutes
    Minute,
    /// Seconds
    Second,
}

impl SampleUnit {
    /// Factor converting a value in this unit to kilometers, if it is a distance
    #[must_use]
    pub const fn km_factor(self) -> Option<f64> {
        match self {
            Self::Meter => Some(KM_PER_METER),
            Self::Kilometer => Some(1.0),
            Self::Mile => Some(KM_PER_MILE),
            _ => None,
        }
    }

    /// Factor converting a value in this unit to minutes, if it is a duration
    #[must_use]
    pub fn minutes_factor(self) -> Option<f64> {
        match self {
            Self::Minute => Some(1.0),
            Self::Second => Some(1.0 / SECONDS_PER_MINUTE),
            _ => None,
        }
    }
}

/// A timestamped scalar sample, immutable once fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample kind
    pub kind: SampleKind,
    /// Measured value in `unit`
    pub value: f64,
    /// Unit of `value`
    pub unit: SampleUnit,
    /// Start of the measured interval (equal to end for instantaneous samples)
    pub timestamp_start: DateTime<Utc>,
    /// End of the measured interval
    pub timestamp_end: DateTime<Utc>,
    /// Originating device or app
    pub source: String,
}

impl Sample {
    /// Create an instantaneous sample in the kind's default unit
    #[must_use]
    pub fn instant(kind: SampleKind, value: f64, at: DateTime<Utc>, source: &str) -> Self {
        Self {
            kind,
            value,
            unit: kind.default_unit(),
            timestamp_start: at,
            timestamp_end: at,
            source: source.to_owned(),
        }
    }

    /// Create an interval sample in the kind's default unit
    #[must_use]
    pub fn interval(
        kind: SampleKind,
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        source: &str,
    ) -> Self {
        Self {
            kind,
            value,
            unit: kind.default_unit(),
            timestamp_start: start,
            timestamp_end: end,
            source: source.to_owned(),
        }
    }

    /// Value converted to kilometers, for distance samples
    #[must_use]
    pub fn value_km(&self) -> Option<f64> {
        self.unit.km_factor().map(|factor| self.value * factor)
    }

    /// Covered interval length
    #[must_use]
    pub fn span(&self) -> Duration {
        self.timestamp_end - self.timestamp_start
    }
}

/// One point of a GPS trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Altitude in meters, when the device reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Fix time
    pub timestamp: DateTime<Utc>,
}

impl GeoPoint {
    /// Create a point without altitude
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            timestamp,
        }
    }
}

/// Provider-supplied discrete segment marker (auto-lap, manual lap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalEvent {
    /// Event start
    pub timestamp_start: DateTime<Utc>,
    /// Event end
    pub timestamp_end: DateTime<Utc>,
    /// Distance covered in kilometers, when the provider reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Free-form provider metadata
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl IntervalEvent {
    /// Metadata key some providers use for the lap distance
    pub const DISTANCE_METADATA_KEY: &'static str = "distance_km";

    /// Distance in kilometers from the field, else from metadata
    #[must_use]
    pub fn distance_km(&self) -> Option<f64> {
        self.distance.or_else(|| {
            self.metadata
                .get(Self::DISTANCE_METADATA_KEY)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
        })
    }
}
