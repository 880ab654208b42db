// ABOUTME: Single-pass min/avg/max aggregation over scalar samples
// ABOUTME: Total over empty input, which yields a zeroed summary with sample_count 0
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};

use crate::models::{Sample, SampleUnit, Statistics};

/// Summarize the values of `samples`
///
/// The unit is the samples' shared unit, or `None` when they disagree.
/// Non-finite values are ignored.
#[must_use]
pub fn aggregate(samples: &[Sample]) -> Statistics {
    let unit = shared_unit(samples);
    aggregate_values(samples.iter().map(|sample| sample.value), unit)
}

/// Summarize the samples whose start lies in `[start, end)`
#[must_use]
pub fn aggregate_between(samples: &[Sample], start: DateTime<Utc>, end: DateTime<Utc>) -> Statistics {
    let in_range: Vec<Sample> = samples
        .iter()
        .filter(|sample| sample.timestamp_start >= start && sample.timestamp_start < end)
        .cloned()
        .collect();
    aggregate(&in_range)
}

/// Summarize raw values in one pass
#[must_use]
pub fn aggregate_values(values: impl IntoIterator<Item = f64>, unit: Option<SampleUnit>) -> Statistics {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut count: usize = 0;

    for value in values.into_iter().filter(|v| v.is_finite()) {
        min = min.min(value);
        max = max.max(value);
        sum += value;
        count += 1;
    }

    if count == 0 {
        return Statistics::empty(unit);
    }

    Statistics {
        min,
        max,
        avg: sum / count as f64,
        unit,
        sample_count: count,
    }
}

fn shared_unit(samples: &[Sample]) -> Option<SampleUnit> {
    let first = samples.first()?.unit;
    samples
        .iter()
        .all(|sample| sample.unit == first)
        .then_some(first)
}
