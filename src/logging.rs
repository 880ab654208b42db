// ABOUTME: Logging configuration and structured logging setup for the ingestion engine
// ABOUTME: Builds a tracing-subscriber registry with an env filter and json, pretty, or compact output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup
//!
//! Log output goes to stderr so the CLI's JSON results on stdout stay
//! machine-readable.

use std::env;
use std::io;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::{info, warn, Level};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::constants::service_names;
use crate::pipeline::IngestionReport;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Emit span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Environment (development, testing, production)
    pub environment: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` lines for log shippers
    Json,
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            include_thread: false,
            include_spans: false,
            service_name: service_names::HEALTH_INGEST.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: "development".into(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let is_production = environment == "production";

        Self {
            level,
            format,
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::HEALTH_INGEST.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment,
        }
    }

    /// Filter with the configured level for this crate and quieter workspace crates
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level)
            .unwrap_or_else(|_| EnvFilter::new("info"))
            .add_directive(
                format!("health_ingest={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| Level::INFO.into()),
            )
            .add_directive(
                "ingest_providers=info"
                    .parse()
                    .unwrap_or_else(|_| Level::INFO.into()),
            )
            .add_directive(
                "ingest_analysis=warn"
                    .parse()
                    .unwrap_or_else(|_| Level::WARN.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_thread_names(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events)
                        .json(),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_thread_names(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stderr)
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "health ingest starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "features": {
                    "location": self.include_location,
                    "thread": self.include_thread,
                    "spans": self.include_spans
                }
            }
        });
        info!("Logging configured: {config_summary}");
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Engine-specific structured log events
pub struct IngestLogger;

impl IngestLogger {
    /// Log the outcome of one ingestion run
    pub fn log_ingestion_run(report: &IngestionReport, workouts: usize, duration: Duration) {
        if report.has_failures() {
            warn!(
                ingest.pipeline = %report.pipeline,
                ingest.workouts = workouts,
                ingest.failures = report.failures.len(),
                ingest.duration_ms = duration.as_millis(),
                "Ingestion run finished with failed groups"
            );
        } else {
            info!(
                ingest.pipeline = %report.pipeline,
                ingest.workouts = workouts,
                ingest.failures = report.failures.len(),
                ingest.duration_ms = duration.as_millis(),
                "Ingestion run finished"
            );
        }
    }

    /// Log a pipeline flag change
    pub fn log_flag_change(flag: &str, enabled: bool, success: bool) {
        info!(
            flag.name = %flag,
            flag.enabled = enabled,
            flag.persisted = success,
            "Pipeline flag change"
        );
    }

    /// Log a recorded pipeline comparison
    pub fn log_comparison(
        a: &str,
        b: &str,
        a_duration: Duration,
        b_duration: Duration,
        a_detail: f64,
        b_detail: f64,
    ) {
        info!(
            compare.a = %a,
            compare.b = %b,
            compare.a_ms = a_duration.as_millis(),
            compare.b_ms = b_duration.as_millis(),
            compare.a_detail = a_detail,
            compare.b_detail = b_detail,
            "Pipeline comparison recorded"
        );
    }
}
