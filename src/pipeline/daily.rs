// ABOUTME: Calendar-day bucketing of activity and sleep samples and biometric series assembly
// ABOUTME: Day boundaries follow a fixed UTC offset carried in the ingestion options
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

use crate::constants::units::SECONDS_PER_MINUTE;
use crate::models::{BiometricSeries, DailyActivity, Sample, SampleKind, SleepNight};

/// Calendar date of `instant` under `offset`
#[must_use]
pub fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// Sum activity samples into one record per day, keyed on each sample's start
///
/// Distances in non-distance units and exercise time in non-duration units
/// are skipped. Days without any activity sample are absent.
#[must_use]
pub fn bucket_activity(samples: &[Sample], offset: FixedOffset) -> Vec<DailyActivity> {
    let mut days: BTreeMap<NaiveDate, DailyActivity> = BTreeMap::new();
    let mut step_totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for sample in samples.iter().filter(|s| s.value.is_finite()) {
        let date = local_date(sample.timestamp_start, offset);
        let day = days
            .entry(date)
            .or_insert_with(|| DailyActivity::empty(date));
        let totals = step_totals.entry(date).or_insert((0.0, 0.0));

        match sample.kind {
            SampleKind::StepCount => totals.0 += sample.value,
            SampleKind::FlightsClimbed => totals.1 += sample.value,
            SampleKind::DistanceWalkingRunning => {
                let Some(km) = sample.value_km() else {
                    continue;
                };
                day.distance_km += km;
            }
            SampleKind::ActiveEnergyBurned => day.active_energy_kcal += sample.value,
            SampleKind::ExerciseTime => {
                let Some(factor) = sample.unit.minutes_factor() else {
                    continue;
                };
                day.exercise_minutes += sample.value * factor;
            }
            _ => continue,
        }
        day.sample_count += 1;
    }

    days.into_iter()
        .filter(|(_, day)| day.sample_count > 0)
        .map(|(date, mut day)| {
            if let Some((steps, flights)) = step_totals.get(&date) {
                day.steps = round_count(*steps);
                day.flights_climbed = round_count(*flights);
            }
            day
        })
        .collect()
}

/// Sum sleep stage samples into one record per night, keyed on each sample's end
///
/// A night belongs to the morning it ends on. Stage values in a duration
/// unit are converted to minutes; anything else counts its interval length.
#[must_use]
pub fn bucket_sleep(samples: &[Sample], offset: FixedOffset) -> Vec<SleepNight> {
    let mut nights: BTreeMap<NaiveDate, SleepNight> = BTreeMap::new();

    for sample in samples {
        let Some(minutes) = stage_minutes(sample) else {
            continue;
        };
        let date = local_date(sample.timestamp_end, offset);
        let night = nights.entry(date).or_insert_with(|| SleepNight::empty(date));
        let slot = match sample.kind {
            SampleKind::SleepInBed => &mut night.in_bed_minutes,
            SampleKind::SleepAsleep => &mut night.asleep_minutes,
            SampleKind::SleepAwake => &mut night.awake_minutes,
            SampleKind::SleepCore => &mut night.core_minutes,
            SampleKind::SleepDeep => &mut night.deep_minutes,
            SampleKind::SleepRem => &mut night.rem_minutes,
            _ => continue,
        };
        *slot += minutes;
        night.sample_count += 1;
    }

    nights
        .into_values()
        .filter(|night| night.sample_count > 0)
        .collect()
}

/// One series per biometric kind that has at least one sample
#[must_use]
pub fn biometric_series(samples: &[Sample]) -> Vec<BiometricSeries> {
    SampleKind::BIOMETRICS
        .into_iter()
        .map(|kind| BiometricSeries::from_samples(kind, samples.to_vec()))
        .filter(|series| series.current.is_some())
        .collect()
}

fn stage_minutes(sample: &Sample) -> Option<f64> {
    let minutes = sample.unit.minutes_factor().map_or_else(
        || sample.span().num_milliseconds() as f64 / 1000.0 / SECONDS_PER_MINUTE,
        |factor| sample.value * factor,
    );
    (minutes.is_finite() && minutes >= 0.0).then_some(minutes)
}

/// Round a summed count to the nearest whole number, clamped to `u64`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_count(value: f64) -> u64 {
    value.round().max(0.0).min(u64::MAX as f64) as u64
}
