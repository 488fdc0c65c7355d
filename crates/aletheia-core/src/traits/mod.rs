// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the external collaborators.
//!
//! Provider and storage adapters extend the [`PluginAdapter`] base trait;
//! speech, audio, and auth adapters are thinner host-capability seams. All
//! async traits use `#[async_trait]` for dynamic dispatch.

pub mod adapter;
pub mod audio;
pub mod auth;
pub mod provider;
pub mod speech;
pub mod storage;

pub use adapter::PluginAdapter;
pub use audio::AmbientAudio;
pub use auth::AuthAdapter;
pub use provider::ProviderAdapter;
pub use speech::{SpeechRecognizer, SpeechSynthesizer};
pub use storage::StorageAdapter;
