// ABOUTME: Attaches splits and heart rate summaries to fetched workout headers
// ABOUTME: Heart rate is scoped to the workout's own time range, inclusive of its end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use ingest_analysis::{aggregate, SegmentCalculator, SplitSource, WorkoutDetail};
use tracing::debug;

use crate::models::{DistanceUnit, Sample, Workout};

/// Everything fetched for one workout besides its header
#[derive(Debug, Clone, Default)]
pub struct WorkoutExtras {
    /// Split sources
    pub detail: WorkoutDetail,
    /// Heart rate samples over the workout
    pub heart_rate: Vec<Sample>,
}

/// Attach splits and heart rate to `workout`
///
/// Splits come from the first available detail source; with none the
/// workout keeps an empty split list. The summary is `None` when no heart
/// rate sample falls inside the workout.
#[must_use]
pub fn enrich_workout(
    workout: Workout,
    extras: &WorkoutExtras,
    unit: DistanceUnit,
    segment_heart_rate: bool,
) -> (Workout, SplitSource) {
    let computation = SegmentCalculator::new().compute_splits(&extras.detail, unit);
    let source = computation.source;
    let mut splits = computation.splits;

    let in_range: Vec<Sample> = extras
        .heart_rate
        .iter()
        .filter(|sample| {
            sample.timestamp_start >= workout.timestamp_start
                && sample.timestamp_start <= workout.timestamp_end
        })
        .cloned()
        .collect();
    let summary = aggregate(&in_range).non_empty();

    if segment_heart_rate {
        SegmentCalculator::attach_heart_rate(&mut splits, &in_range);
    }

    debug!(
        workout_id = %workout.id,
        splits = splits.len(),
        source = ?source,
        heart_rate_samples = in_range.len(),
        "enriched workout"
    );

    let workout = workout
        .with_segments(splits)
        .with_heart_rate_summary(summary);
    (workout, source)
}
