// ABOUTME: Configuration module for the ingestion engine
// ABOUTME: Environment-only configuration with typed log level and deployment environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration for the ingestion engine
//!
//! Everything is read from environment variables; there are no config files.
//! Defaults live in `ingest_core::constants`.

/// Environment variable parsing and the engine configuration
pub mod environment;

pub use environment::{parse_chunk_days, Environment, IngestConfig, LogLevel};
