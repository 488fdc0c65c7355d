// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Aletheia crate.

use thiserror::Error;

/// The primary error type used across adapters, controllers, and services.
///
/// Nothing here is fatal to the process: every variant is surfaced to the
/// caller as a notice and control returns to the idle state.
#[derive(Debug, Error)]
pub enum AletheiaError {
    /// Input rejected locally before any network call (blank text, missing title).
    #[error("{0}")]
    Validation(String),

    /// Transport or HTTP failure talking to the completion service.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion service answered, but not with anything we can use.
    #[error("analysis failed: {message}")]
    MalformedResponse { message: String },

    /// A host capability (speech recognition, synthesis, audio) is missing.
    #[error("not supported: {0}")]
    Unsupported(String),

    /// Storage backend errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing API key, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No signed-in identity is available for a user-scoped operation.
    #[error("not signed in")]
    Unauthenticated,

    /// Another operation is already in flight for this session.
    #[error("busy: {0}")]
    Busy(String),

    /// The session this operation belonged to has already ended.
    #[error("session has ended")]
    SessionEnded,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AletheiaError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        AletheiaError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a malformed completion response.
    pub fn malformed(message: impl Into<String>) -> Self {
        AletheiaError::MalformedResponse {
            message: message.into(),
        }
    }

    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        AletheiaError::Storage {
            source: Box::new(err),
        }
    }
}
