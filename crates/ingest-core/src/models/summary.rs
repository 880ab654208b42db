// ABOUTME: Per-kind output records for biometrics, daily activity, and nightly sleep
// ABOUTME: Current-plus-history biometric series and calendar-day bucketed totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::sample::{Sample, SampleKind};

/// Deduplicated history of one biometric kind with its most recent reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricSeries {
    /// Biometric kind
    pub kind: SampleKind,
    /// Most recent sample, `None` when history is empty
    pub current: Option<Sample>,
    /// Every retained sample, newest first
    pub history: Vec<Sample>,
}

impl BiometricSeries {
    /// Build a series from deduplicated samples of one kind
    #[must_use]
    pub fn from_samples(kind: SampleKind, mut samples: Vec<Sample>) -> Self {
        samples.retain(|sample| sample.kind == kind);
        samples.sort_by(|a, b| b.timestamp_start.cmp(&a.timestamp_start));
        Self {
            kind,
            current: samples.first().cloned(),
            history: samples,
        }
    }
}

/// One calendar day of summed activity totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyActivity {
    /// Calendar day (in the configured day offset)
    pub date: NaiveDate,
    /// Steps
    pub steps: u64,
    /// Walking and running distance in kilometers
    pub distance_km: f64,
    /// Active energy in kilocalories
    pub active_energy_kcal: f64,
    /// Floors climbed
    pub flights_climbed: u64,
    /// Exercise minutes
    pub exercise_minutes: f64,
    /// Samples merged into this record
    pub sample_count: usize,
}

impl DailyActivity {
    /// An all-zero record for `date`
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: 0,
            distance_km: 0.0,
            active_energy_kcal: 0.0,
            flights_climbed: 0,
            exercise_minutes: 0.0,
            sample_count: 0,
        }
    }
}

/// One night of sleep stage totals, keyed by the day the sleep ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepNight {
    /// Calendar day the sleep ended on
    pub date: NaiveDate,
    /// Minutes in bed
    pub in_bed_minutes: f64,
    /// Minutes asleep with no stage detail
    pub asleep_minutes: f64,
    /// Minutes awake
    pub awake_minutes: f64,
    /// Minutes of core sleep
    pub core_minutes: f64,
    /// Minutes of deep sleep
    pub deep_minutes: f64,
    /// Minutes of REM sleep
    pub rem_minutes: f64,
    /// Samples merged into this record
    pub sample_count: usize,
}

impl SleepNight {
    /// An all-zero record for `date`
    #[must_use]
    pub const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            in_bed_minutes: 0.0,
            asleep_minutes: 0.0,
            awake_minutes: 0.0,
            core_minutes: 0.0,
            deep_minutes: 0.0,
            rem_minutes: 0.0,
            sample_count: 0,
        }
    }

    /// Total sleep across every asleep stage
    #[must_use]
    pub fn total_sleep_minutes(&self) -> f64 {
        self.asleep_minutes + self.core_minutes + self.deep_minutes + self.rem_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn test_biometric_series_is_newest_first() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap();
        let samples = vec![
            Sample::instant(SampleKind::BodyMass, 71.8, base, "scale"),
            Sample::instant(SampleKind::BodyMass, 71.2, base + Duration::days(2), "scale"),
            Sample::instant(SampleKind::BodyMass, 71.5, base + Duration::days(1), "scale"),
            Sample::instant(SampleKind::BodyMassIndex, 22.1, base, "scale"),
        ];

        let series = BiometricSeries::from_samples(SampleKind::BodyMass, samples);

        assert_eq!(series.history.len(), 3);
        assert!((series.current.unwrap().value - 71.2).abs() < f64::EPSILON);
        assert!(series
            .history
            .windows(2)
            .all(|pair| pair[0].timestamp_start > pair[1].timestamp_start));
    }

    #[test]
    fn test_empty_series_has_no_current() {
        let series = BiometricSeries::from_samples(SampleKind::RestingHeartRate, Vec::new());
        assert!(series.current.is_none());
        assert!(series.history.is_empty());
    }
}
