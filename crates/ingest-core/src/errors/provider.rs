// ABOUTME: Sample store error types raised at the provider query boundary
// ABOUTME: Classifies failures as retryable or permanent and converts them into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use super::{AppError, ErrorCode};

/// Errors returned by a `SampleStore` query
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The store could not be reached at all
    #[error("{store} is unavailable: {message}")]
    Unavailable {
        /// Store name
        store: String,
        /// Underlying reason
        message: String,
    },

    /// A query was rejected or failed mid-flight
    #[error("{store} query for {kind} failed: {message}")]
    QueryFailed {
        /// Store name
        store: String,
        /// Data kind being queried
        kind: String,
        /// Underlying reason
        message: String,
    },

    /// The store throttled concurrent or repeated historical queries
    #[error("{store} rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Store name
        store: String,
        /// Seconds until the store accepts queries again
        retry_after_secs: u64,
    },

    /// A returned payload could not be decoded into a `ProviderRecord`
    #[error("{store} returned an undecodable record: {details}")]
    Decode {
        /// Store name
        store: String,
        /// What failed to decode
        details: String,
    },

    /// The store itself is misconfigured (poisoned lock, missing fixture)
    #[error("{store} configuration error: {details}")]
    ConfigurationError {
        /// Store name
        store: String,
        /// Configuration problem
        details: String,
    },
}

impl ProviderError {
    /// Whether a later attempt at the same query may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::QueryFailed { .. } | Self::RateLimited { .. }
        )
    }
}

impl From<ProviderError> for AppError {
    fn from(error: ProviderError) -> Self {
        let code = match error {
            ProviderError::Unavailable { .. } | ProviderError::RateLimited { .. } => {
                ErrorCode::ExternalServiceUnavailable
            }
            ProviderError::QueryFailed { .. } => ErrorCode::ExternalServiceError,
            ProviderError::Decode { .. } => ErrorCode::SerializationError,
            ProviderError::ConfigurationError { .. } => ErrorCode::ConfigError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}

/// Result alias for sample store operations
pub type ProviderResult<T> = Result<T, ProviderError>;
