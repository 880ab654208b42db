// ABOUTME: Core data models and types for the ingestion engine
// ABOUTME: Re-exports samples, routes, workouts, splits, statistics, and daily summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! These models provide a provider-agnostic representation of health data as
//! it crosses the sample store boundary and flows through the pipelines.
//!
//! ## Design Principles
//!
//! - **Decoded once**: provider payloads become a `ProviderRecord` variant at
//!   the store boundary and are never re-inspected as loose maps
//! - **Immutable samples**: samples are values; deduplication works on
//!   `RecordIdentity` keys
//! - **Serializable**: all output models round-trip through serde so storage
//!   and upload collaborators can persist them verbatim

mod record;
mod sample;
mod statistics;
mod summary;
mod window;
mod workout;

pub use record::{DataKind, ProviderRecord, RecordIdentity};
pub use sample::{GeoPoint, IntervalEvent, KindGroup, Sample, SampleKind, SampleUnit};
pub use statistics::Statistics;
pub use summary::{BiometricSeries, DailyActivity, SleepNight};
pub use window::{FetchWindow, TerminationPolicy, TimeWindow};
pub use workout::{DistanceUnit, Split, Workout, WorkoutKind};
