// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Default chunk sizes, geodesy and unit constants, and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single flat list.

/// Chunked retrieval defaults per data-kind group (in days, descending)
pub mod chunking {
    /// Workouts are sparse; a coarse granularity usually proves sufficient
    pub const WORKOUT_CHUNK_DAYS: [u32; 3] = [90, 30, 7];
    /// Body composition history is truncated unevenly, so every size is swept
    pub const BIOMETRIC_CHUNK_DAYS: [u32; 3] = [90, 30, 7];
    /// Daily activity totals; the first productive size is kept
    pub const ACTIVITY_CHUNK_DAYS: [u32; 3] = [30, 7, 1];
    /// Sleep stage samples; the first productive size is kept
    pub const SLEEP_CHUNK_DAYS: [u32; 3] = [30, 7, 1];
}

/// Geodesy constants
pub mod geo {
    /// Mean Earth radius in kilometers (IUGG)
    pub const EARTH_RADIUS_KM: f64 = 6_371.008_8;
}

/// Unit conversion and measurement constants
pub mod units {
    /// Kilometers per statute mile
    pub const KM_PER_MILE: f64 = 1.609_344;
    /// Kilometers per meter
    pub const KM_PER_METER: f64 = 0.001;
    /// Seconds per minute
    pub const SECONDS_PER_MINUTE: f64 = 60.0;
}

/// Numeric tolerances
pub mod tolerances {
    /// Cumulative distance within this many kilometers of a boundary counts as reaching it
    pub const BOUNDARY_EPSILON_KM: f64 = 1e-9;
    /// Interval events shorter than this fraction of a unit are flagged partial
    pub const PARTIAL_EVENT_FRACTION: f64 = 0.999;
}

/// Feature flag names
pub mod flags {
    /// Routes ingestion through the chunked pipeline when enabled
    pub const CHUNKED_PIPELINE: &str = "chunked_ingestion_pipeline";
}

/// Service identification
pub mod service_names {
    /// Service name used in structured logs
    pub const HEALTH_INGEST: &str = "health-ingest";
}

/// Environment variable names read by the configuration layer
pub mod env_config {
    /// Flag store file path
    pub const FLAG_PATH: &str = "HEALTH_INGEST_FLAG_PATH";
    /// Comparison log file path
    pub const COMPARISON_LOG: &str = "HEALTH_INGEST_COMPARISON_LOG";
    /// Workout chunk candidates, comma-separated days
    pub const WORKOUT_CHUNK_DAYS: &str = "HEALTH_INGEST_WORKOUT_CHUNK_DAYS";
    /// Biometric chunk candidates, comma-separated days
    pub const BIOMETRIC_CHUNK_DAYS: &str = "HEALTH_INGEST_BIOMETRIC_CHUNK_DAYS";
    /// Daily activity chunk candidates, comma-separated days
    pub const ACTIVITY_CHUNK_DAYS: &str = "HEALTH_INGEST_ACTIVITY_CHUNK_DAYS";
    /// Sleep chunk candidates, comma-separated days
    pub const SLEEP_CHUNK_DAYS: &str = "HEALTH_INGEST_SLEEP_CHUNK_DAYS";
    /// Split distance unit (`km` or `mi`)
    pub const DISTANCE_UNIT: &str = "HEALTH_INGEST_DISTANCE_UNIT";
    /// Offset from UTC, in minutes, that defines calendar-day boundaries
    pub const DAY_OFFSET_MINUTES: &str = "HEALTH_INGEST_DAY_OFFSET_MINUTES";
    /// Compute per-split heart rate summaries
    pub const SEGMENT_HEART_RATE: &str = "HEALTH_INGEST_SEGMENT_HEART_RATE";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// File names used under the default data directory
pub mod storage {
    /// Directory created under the platform data dir
    pub const DATA_DIR_NAME: &str = "health-ingest";
    /// Default flag file name
    pub const FLAG_FILE: &str = "pipeline_flags.json";
    /// Default comparison log file name
    pub const COMPARISON_LOG_FILE: &str = "pipeline_comparisons.jsonl";
}
