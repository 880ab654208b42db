// ABOUTME: Workout segmentation and sample statistics for the ingestion engine
// ABOUTME: Pure, synchronous algorithms over already-fetched samples, routes, and events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Split reconstruction and statistics.
//!
//! Nothing in this crate performs I/O. The pipelines fetch samples, routes
//! and interval events, then hand them here to derive splits and summaries.

pub use ingest_core::constants;
pub use ingest_core::models;

/// Great-circle distance over GPS routes
pub mod geo;
/// Per-distance-unit split computation
pub mod segments;
/// Min/avg/max aggregation over samples
pub mod statistics;

pub use geo::{haversine_km, route_length_km};
pub use segments::{SegmentCalculator, SplitComputation, SplitSource, WorkoutDetail};
pub use statistics::{aggregate, aggregate_between, aggregate_values};
