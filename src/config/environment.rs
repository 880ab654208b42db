// ABOUTME: Environment-variable configuration for the ingestion engine
// ABOUTME: Parses chunk candidates, distance unit, day offset, and storage paths with typed errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, Level};

use crate::constants::chunking::{
    ACTIVITY_CHUNK_DAYS, BIOMETRIC_CHUNK_DAYS, SLEEP_CHUNK_DAYS, WORKOUT_CHUNK_DAYS,
};
use crate::constants::{env_config, flags, storage};
use crate::errors::{AppError, AppResult};
use crate::models::DistanceUnit;
use crate::pipeline::{ChunkPlan, IngestOptions};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational
    #[default]
    Info,
    /// Debug detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is a testing environment
    #[must_use]
    pub const fn is_testing(self) -> bool {
        matches!(self, Self::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Engine configuration loaded from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level from `RUST_LOG`
    pub log_level: LogLevel,
    /// Name of the flag that routes to the chunked pipeline
    pub flag_name: String,
    /// Where pipeline flags are persisted
    pub flag_path: PathBuf,
    /// Append-only comparison log location
    pub comparison_log_path: PathBuf,
    /// Chunk candidates per group
    pub chunk_plan: ChunkPlan,
    /// Split unit
    pub distance_unit: DistanceUnit,
    /// Day boundary offset east of UTC, in minutes
    pub day_offset_minutes: i32,
    /// Compute per-split heart rate
    pub segment_heart_rate: bool,
}

impl IngestConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigInvalid` naming the variable when a value
    /// cannot be parsed
    pub fn from_env() -> AppResult<Self> {
        let data_dir = default_data_dir();

        let config = Self {
            environment: Environment::from_str_or_default(
                &env::var(env_config::ENVIRONMENT).unwrap_or_default(),
            ),
            log_level: LogLevel::from_str_or_default(
                &env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()),
            ),
            flag_name: flags::CHUNKED_PIPELINE.to_owned(),
            flag_path: env::var(env_config::FLAG_PATH)
                .map_or_else(|_| data_dir.join(storage::FLAG_FILE), PathBuf::from),
            comparison_log_path: env::var(env_config::COMPARISON_LOG).map_or_else(
                |_| data_dir.join(storage::COMPARISON_LOG_FILE),
                PathBuf::from,
            ),
            chunk_plan: ChunkPlan {
                workouts: chunk_days_var(env_config::WORKOUT_CHUNK_DAYS, &WORKOUT_CHUNK_DAYS)?,
                biometrics: chunk_days_var(
                    env_config::BIOMETRIC_CHUNK_DAYS,
                    &BIOMETRIC_CHUNK_DAYS,
                )?,
                activity: chunk_days_var(env_config::ACTIVITY_CHUNK_DAYS, &ACTIVITY_CHUNK_DAYS)?,
                sleep: chunk_days_var(env_config::SLEEP_CHUNK_DAYS, &SLEEP_CHUNK_DAYS)?,
            },
            distance_unit: parsed_var(env_config::DISTANCE_UNIT, DistanceUnit::default())?,
            day_offset_minutes: parsed_var(env_config::DAY_OFFSET_MINUTES, 0)?,
            segment_heart_rate: parsed_var(env_config::SEGMENT_HEART_RATE, false)?,
        };

        // Reject offsets the options builder would refuse later
        config.ingest_options()?;

        info!(
            environment = %config.environment,
            flag_path = %config.flag_path.display(),
            "loaded ingestion configuration"
        );
        Ok(config)
    }

    /// Options for an ingestion run covering every group
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::ConfigInvalid` if the day offset is out of range
    pub fn ingest_options(&self) -> AppResult<IngestOptions> {
        let options = IngestOptions {
            distance_unit: self.distance_unit,
            chunk_plan: self.chunk_plan.clone(),
            segment_heart_rate: self.segment_heart_rate,
            ..IngestOptions::default()
        };
        options
            .with_day_offset_minutes(self.day_offset_minutes)
            .map_err(|e| {
                AppError::config_invalid(format!(
                    "{}: {}",
                    env_config::DAY_OFFSET_MINUTES,
                    e.message
                ))
            })
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Health Ingest Configuration:\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Flag: {} ({})\n\
             - Comparison Log: {}\n\
             - Workout Chunks (days): {:?}\n\
             - Biometric Chunks (days): {:?}\n\
             - Activity Chunks (days): {:?}\n\
             - Sleep Chunks (days): {:?}\n\
             - Distance Unit: {}\n\
             - Day Offset (minutes): {}\n\
             - Split Heart Rate: {}",
            self.environment,
            self.log_level,
            self.flag_name,
            self.flag_path.display(),
            self.comparison_log_path.display(),
            self.chunk_plan.workouts,
            self.chunk_plan.biometrics,
            self.chunk_plan.activity,
            self.chunk_plan.sleep,
            self.distance_unit,
            self.day_offset_minutes,
            if self.segment_heart_rate {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join(storage::DATA_DIR_NAME)
}

/// Parse a variable with `FromStr`, falling back to `default` when unset
fn parsed_var<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config_invalid(format!("{key}={raw}: {e}"))),
        _ => Ok(default),
    }
}

/// Parse comma-separated chunk sizes in days
fn chunk_days_var(key: &str, default: &[u32]) -> AppResult<Vec<u32>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_chunk_days(&raw)
            .map_err(|e| AppError::config_invalid(format!("{key}={raw}: {}", e.message))),
        _ => Ok(default.to_vec()),
    }
}

/// Parse `"90, 30,7"` into day counts; zero and non-numeric entries are rejected
///
/// # Errors
///
/// Returns `ErrorCode::InvalidInput` on the first bad entry
pub fn parse_chunk_days(raw: &str) -> AppResult<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<u32>() {
            Ok(0) => Err(AppError::invalid_input("chunk size must be at least one day")),
            Ok(days) => Ok(days),
            Err(e) => Err(AppError::invalid_input(format!("'{part}' is not a day count: {e}"))),
        })
        .collect()
}
