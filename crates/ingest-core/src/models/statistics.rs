// ABOUTME: Min/avg/max summary derived from a sample window
// ABOUTME: Carries an explicit sample count so empty aggregates are distinguishable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::sample::SampleUnit;

/// Scalar summary of a sample set
///
/// Never persisted independently of the window it was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub avg: f64,
    /// Unit shared by the summarized samples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<SampleUnit>,
    /// Number of samples summarized; zero marks an empty aggregate
    pub sample_count: usize,
}

impl Statistics {
    /// The zero-valued aggregate of no samples
    #[must_use]
    pub const fn empty(unit: Option<SampleUnit>) -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            avg: 0.0,
            unit,
            sample_count: 0,
        }
    }

    /// Whether no samples contributed
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// `None` for an empty aggregate, otherwise `Some(self)`
    #[must_use]
    pub const fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::empty(None)
    }
}
