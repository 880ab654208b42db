// ABOUTME: Reconstructs per-distance-unit workout splits from heterogeneous detail data
// ABOUTME: Prefers provider interval events, then GPS routes, then periodic distance samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Segment Calculator
//!
//! A workout's splits come from the first available of:
//!
//! 1. **Interval events**: one split per provider lap, using the lap's own
//!    timestamps and distance (one unit when the lap carries no distance)
//! 2. **GPS route**: cumulative haversine distance, a split closed at every
//!    whole multiple of the unit
//! 3. **Distance samples**: the same crossing logic over the running sum of
//!    per-interval distance samples
//!
//! With none of these the result is empty; computing splits never fails.
//!
//! Crossing times are linearly interpolated inside the hop that reaches a
//! boundary. A point lying exactly on a boundary closes the split at that
//! point. Whatever distance remains after the last boundary becomes a single
//! trailing split flagged `is_partial`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::tolerances::{BOUNDARY_EPSILON_KM, PARTIAL_EVENT_FRACTION};
use crate::constants::units::SECONDS_PER_MINUTE;
use crate::geo::cumulative_distances_km;
use crate::models::{DistanceUnit, GeoPoint, IntervalEvent, Sample, Split};
use crate::statistics::{aggregate, aggregate_between};

/// Which data shape the splits were derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitSource {
    /// Provider interval events
    Events,
    /// GPS route
    Route,
    /// Periodic distance samples
    DistanceSamples,
    /// Nothing usable was available
    None,
}

/// Detail data fetched for one workout's own time range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDetail {
    /// Interval events (laps)
    pub events: Vec<IntervalEvent>,
    /// GPS route points
    pub route: Vec<GeoPoint>,
    /// Walking/running distance samples, each covering one interval
    pub distance_samples: Vec<Sample>,
}

impl WorkoutDetail {
    /// Whether any split source is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.route.is_empty() && self.distance_samples.is_empty()
    }
}

/// Splits plus the source they were computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitComputation {
    /// Splits in time order
    pub splits: Vec<Split>,
    /// Data shape used
    pub source: SplitSource,
}

impl SplitComputation {
    const fn none() -> Self {
        Self {
            splits: Vec::new(),
            source: SplitSource::None,
        }
    }

    /// Sum of split distances, in the splits' unit
    #[must_use]
    pub fn total_distance(&self) -> f64 {
        self.splits.iter().map(|split| split.distance).sum()
    }
}

/// A point on a cumulative distance curve
#[derive(Debug, Clone, Copy, PartialEq)]
struct DistanceMark {
    timestamp: DateTime<Utc>,
    cumulative_km: f64,
}

/// Computes per-distance-unit splits for a workout
#[derive(Debug, Clone, Copy)]
pub struct SegmentCalculator {
    /// Cumulative distance this close to a boundary counts as reaching it
    boundary_epsilon_km: f64,
}

impl Default for SegmentCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentCalculator {
    /// Create a calculator with the default boundary tolerance
    #[must_use]
    pub const fn new() -> Self {
        Self {
            boundary_epsilon_km: BOUNDARY_EPSILON_KM,
        }
    }

    /// Compute splits of one `unit` each from the first available source
    #[must_use]
    pub fn compute_splits(&self, detail: &WorkoutDetail, unit: DistanceUnit) -> SplitComputation {
        let computation = if let Some(splits) = Self::splits_from_events(&detail.events, unit) {
            SplitComputation {
                splits,
                source: SplitSource::Events,
            }
        } else if let Some(marks) = route_marks(&detail.route) {
            SplitComputation {
                splits: self.splits_from_marks(&marks, unit),
                source: SplitSource::Route,
            }
        } else if let Some(marks) = distance_sample_marks(&detail.distance_samples) {
            SplitComputation {
                splits: self.splits_from_marks(&marks, unit),
                source: SplitSource::DistanceSamples,
            }
        } else {
            SplitComputation::none()
        };

        debug!(
            source = ?computation.source,
            splits = computation.splits.len(),
            unit = %unit,
            "computed splits"
        );
        computation
    }

    /// Attach a heart rate summary to every split from `heart_rate`
    ///
    /// Each split takes the samples starting in `[start, end)`; the last
    /// split also takes samples starting exactly at its end. Splits with no
    /// samples keep `heart_rate = None`.
    pub fn attach_heart_rate(splits: &mut [Split], heart_rate: &[Sample]) {
        let last = splits.len().saturating_sub(1);
        for (i, split) in splits.iter_mut().enumerate() {
            let stats = if i == last {
                let in_range: Vec<Sample> = heart_rate
                    .iter()
                    .filter(|s| {
                        s.timestamp_start >= split.timestamp_start
                            && s.timestamp_start <= split.timestamp_end
                    })
                    .cloned()
                    .collect();
                aggregate(&in_range)
            } else {
                aggregate_between(heart_rate, split.timestamp_start, split.timestamp_end)
            };
            split.heart_rate = stats.non_empty();
        }
    }

    /// One split per valid event, in start order; `None` when there are no valid events
    fn splits_from_events(events: &[IntervalEvent], unit: DistanceUnit) -> Option<Vec<Split>> {
        let mut valid: Vec<&IntervalEvent> = events
            .iter()
            .filter(|event| event.timestamp_end >= event.timestamp_start)
            .collect();
        if valid.is_empty() {
            return None;
        }
        valid.sort_by_key(|event| event.timestamp_start);

        let last = valid.len() - 1;
        let splits = valid
            .into_iter()
            .enumerate()
            .map(|(i, event)| {
                let distance = event
                    .distance_km()
                    .filter(|km| km.is_finite() && *km >= 0.0)
                    .map_or(1.0, |km| unit.from_km(km));
                let is_partial = i == last && distance < PARTIAL_EVENT_FRACTION;
                build_split(
                    i,
                    unit,
                    event.timestamp_start,
                    event.timestamp_end,
                    distance,
                    is_partial,
                )
            })
            .collect();
        Some(splits)
    }

    /// Close a split at each whole unit along a cumulative distance curve
    fn splits_from_marks(&self, marks: &[DistanceMark], unit: DistanceUnit) -> Vec<Split> {
        let (Some(first), Some(last)) = (marks.first(), marks.last()) else {
            return Vec::new();
        };
        let unit_km = unit.km_per_unit();
        let epsilon = self.boundary_epsilon_km;

        let mut splits = Vec::new();
        let mut split_start = first.timestamp;
        let mut split_start_km = first.cumulative_km;
        let mut next_boundary_km = split_start_km + unit_km;

        for hop in marks.windows(2) {
            let (from, to) = (hop[0], hop[1]);
            // A single hop may cross several boundaries
            while to.cumulative_km + epsilon >= next_boundary_km {
                let crossing = interpolate_crossing(from, to, next_boundary_km);
                splits.push(build_split(splits.len(), unit, split_start, crossing, 1.0, false));
                split_start = crossing;
                split_start_km = next_boundary_km;
                next_boundary_km += unit_km;
            }
        }

        let leftover_km = last.cumulative_km - split_start_km;
        if leftover_km > epsilon {
            splits.push(build_split(
                splits.len(),
                unit,
                split_start,
                last.timestamp,
                unit.from_km(leftover_km),
                true,
            ));
        }

        splits
    }
}

/// Cumulative haversine curve over a route; `None` when fewer than two
/// usable points
fn route_marks(route: &[GeoPoint]) -> Option<Vec<DistanceMark>> {
    let mut ordered: Vec<GeoPoint> = route
        .iter()
        .filter(|point| point.latitude.is_finite() && point.longitude.is_finite())
        .copied()
        .collect();
    if ordered.len() < 2 {
        return None;
    }
    ordered.sort_by_key(|point| point.timestamp);

    let marks = ordered
        .iter()
        .zip(cumulative_distances_km(&ordered))
        .map(|(point, cumulative_km)| DistanceMark {
            timestamp: point.timestamp,
            cumulative_km,
        })
        .collect();
    Some(marks)
}

/// Running sum of per-interval distance samples; `None` without usable samples
///
/// The curve starts at zero at the first sample's start and gains each
/// sample's distance at that sample's end.
fn distance_sample_marks(samples: &[Sample]) -> Option<Vec<DistanceMark>> {
    let mut usable: Vec<(&Sample, f64)> = samples
        .iter()
        .filter_map(|sample| {
            sample
                .value_km()
                .filter(|km| km.is_finite() && *km >= 0.0)
                .map(|km| (sample, km))
        })
        .collect();
    if usable.is_empty() {
        return None;
    }
    usable.sort_by_key(|(sample, _)| sample.timestamp_start);

    let mut marks = Vec::with_capacity(usable.len() + 1);
    let mut cursor = usable[0].0.timestamp_start;
    let mut cumulative_km = 0.0;
    marks.push(DistanceMark {
        timestamp: cursor,
        cumulative_km,
    });
    for (sample, km) in usable {
        cumulative_km += km;
        // Overlapping samples must not move the curve backwards in time
        cursor = cursor.max(sample.timestamp_end);
        marks.push(DistanceMark {
            timestamp: cursor,
            cumulative_km,
        });
    }
    Some(marks)
}

/// Instant at which the straight line from `from` to `to` reaches `boundary_km`
fn interpolate_crossing(from: DistanceMark, to: DistanceMark, boundary_km: f64) -> DateTime<Utc> {
    let hop_km = to.cumulative_km - from.cumulative_km;
    if hop_km <= 0.0 {
        return to.timestamp;
    }
    let fraction = ((boundary_km - from.cumulative_km) / hop_km).clamp(0.0, 1.0);
    if fraction >= 1.0 {
        return to.timestamp;
    }
    let hop_ms = (to.timestamp - from.timestamp).num_milliseconds() as f64;
    from.timestamp + Duration::milliseconds((hop_ms * fraction).round() as i64)
}

fn build_split(
    position: usize,
    unit: DistanceUnit,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    distance: f64,
    is_partial: bool,
) -> Split {
    let duration_seconds = (end - start).num_milliseconds() as f64 / 1000.0;
    let pace_per_unit = if distance > 0.0 {
        duration_seconds / SECONDS_PER_MINUTE / distance
    } else {
        0.0
    };
    Split {
        index: u32::try_from(position + 1).unwrap_or(u32::MAX),
        distance,
        distance_unit: unit,
        timestamp_start: start,
        timestamp_end: end,
        duration_seconds,
        pace_per_unit,
        is_partial,
        heart_rate: None,
    }
}
