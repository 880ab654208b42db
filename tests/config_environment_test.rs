// ABOUTME: Unit tests for environment-driven ingestion configuration
// ABOUTME: Validates defaults, overrides, and rejection of malformed variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::path::PathBuf;

use health_ingest::config::{Environment, IngestConfig, LogLevel};
use health_ingest::constants::chunking::{BIOMETRIC_CHUNK_DAYS, WORKOUT_CHUNK_DAYS};
use health_ingest::constants::env_config;
use health_ingest::constants::flags::CHUNKED_PIPELINE;
use health_ingest::constants::storage::{COMPARISON_LOG_FILE, FLAG_FILE};
use health_ingest::errors::ErrorCode;
use health_ingest::models::DistanceUnit;
use serial_test::serial;

const ALL_VARS: [&str; 10] = [
    env_config::FLAG_PATH,
    env_config::COMPARISON_LOG,
    env_config::WORKOUT_CHUNK_DAYS,
    env_config::BIOMETRIC_CHUNK_DAYS,
    env_config::ACTIVITY_CHUNK_DAYS,
    env_config::SLEEP_CHUNK_DAYS,
    env_config::DISTANCE_UNIT,
    env_config::DAY_OFFSET_MINUTES,
    env_config::SEGMENT_HEART_RATE,
    env_config::ENVIRONMENT,
];

fn clear_env() {
    for key in ALL_VARS {
        env::remove_var(key);
    }
}

#[test]
fn test_log_level_parsing() {
    assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
    assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
    assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
    assert_eq!(LogLevel::from_str_or_default("loud"), LogLevel::Info);
}

#[test]
#[serial]
fn test_defaults_when_unset() {
    clear_env();

    let config = IngestConfig::from_env().unwrap();

    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.flag_name, CHUNKED_PIPELINE);
    assert!(config.flag_path.ends_with(FLAG_FILE));
    assert!(config.comparison_log_path.ends_with(COMPARISON_LOG_FILE));
    assert_eq!(config.chunk_plan.workouts, WORKOUT_CHUNK_DAYS.to_vec());
    assert_eq!(config.chunk_plan.biometrics, BIOMETRIC_CHUNK_DAYS.to_vec());
    assert_eq!(config.distance_unit, DistanceUnit::Kilometers);
    assert_eq!(config.day_offset_minutes, 0);
    assert!(!config.segment_heart_rate);

    let options = config.ingest_options().unwrap();
    assert_eq!(options.day_offset.local_minus_utc(), 0);
    assert!(config.summary().contains("Split Heart Rate: Disabled"));
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var(env_config::FLAG_PATH, "/var/lib/ingest/flags.json");
    env::set_var(env_config::COMPARISON_LOG, "/var/log/ingest/compare.jsonl");
    env::set_var(env_config::WORKOUT_CHUNK_DAYS, "60, 14");
    env::set_var(env_config::DISTANCE_UNIT, "mi");
    env::set_var(env_config::DAY_OFFSET_MINUTES, "-300");
    env::set_var(env_config::SEGMENT_HEART_RATE, "true");
    env::set_var(env_config::ENVIRONMENT, "production");

    let config = IngestConfig::from_env().unwrap();
    clear_env();

    assert!(config.environment.is_production());
    assert_eq!(config.flag_path, PathBuf::from("/var/lib/ingest/flags.json"));
    assert_eq!(
        config.comparison_log_path,
        PathBuf::from("/var/log/ingest/compare.jsonl")
    );
    assert_eq!(config.chunk_plan.workouts, vec![60, 14]);
    assert_eq!(config.distance_unit, DistanceUnit::Miles);
    assert!(config.segment_heart_rate);

    let options = config.ingest_options().unwrap();
    assert_eq!(options.day_offset.local_minus_utc(), -300 * 60);
    assert_eq!(options.distance_unit, DistanceUnit::Miles);
    assert!(options.segment_heart_rate);
}

#[test]
#[serial]
fn test_zero_chunk_size_is_rejected() {
    clear_env();
    env::set_var(env_config::SLEEP_CHUNK_DAYS, "7,0");

    let err = IngestConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains(env_config::SLEEP_CHUNK_DAYS));
}

#[test]
#[serial]
fn test_unknown_distance_unit_is_rejected() {
    clear_env();
    env::set_var(env_config::DISTANCE_UNIT, "furlongs");

    let err = IngestConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_out_of_range_day_offset_is_rejected() {
    clear_env();
    env::set_var(env_config::DAY_OFFSET_MINUTES, "2000");

    let err = IngestConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigInvalid);
    assert!(err.message.contains(env_config::DAY_OFFSET_MINUTES));
}
