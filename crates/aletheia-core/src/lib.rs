// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Aletheia.
//!
//! This crate provides the error type, the domain records, the static
//! emotion table, and the adapter traits behind which the external
//! collaborators (completion service, record store, speech engines,
//! background audio, auth provider) live.

pub mod context;
pub mod emotion;
pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use context::{AuthIdentity, SessionContext};
pub use emotion::Emotion;
pub use error::AletheiaError;
pub use types::{AdapterType, HealthStatus, UserId};

pub use traits::{
    AmbientAudio, AuthAdapter, PluginAdapter, ProviderAdapter, SpeechRecognizer,
    SpeechSynthesizer, StorageAdapter,
};
