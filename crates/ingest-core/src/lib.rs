// ABOUTME: Core types and constants for the health-data ingestion engine
// ABOUTME: Foundation crate with error handling, domain models, and default values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Ingest Core
//!
//! Foundation crate providing shared types and constants for the ingestion
//! engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ProviderError`
//! - **constants**: Default chunk sizes, environment variable names, and tolerances
//! - **models**: Samples, routes, workouts, splits, statistics, and daily summaries

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and default values organized by domain
pub mod constants;

/// Core data models (Sample, GeoPoint, Workout, Split, Statistics, etc.)
pub mod models;
