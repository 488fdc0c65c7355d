// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech-to-text and text-to-speech capability seams.

use async_trait::async_trait;

use crate::error::AletheiaError;
use crate::types::{SpeechOutcome, Utterance};

/// A host speech-recognition engine.
///
/// Recognition is one-shot: each call captures a single utterance.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the host can recognise speech at all.
    fn is_supported(&self) -> bool;

    /// Captures one utterance. `Ok(None)` means the capture ended without
    /// speech (silence, or an [`abort`](Self::abort)).
    async fn recognize_once(&self) -> Result<Option<String>, AletheiaError>;

    /// Stops any capture in progress; a pending `recognize_once` resolves to `None`.
    async fn abort(&self) -> Result<(), AletheiaError>;
}

/// A host speech-synthesis engine.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speaks `utterance`, resolving once playback has finished or was canceled.
    async fn speak(&self, utterance: &Utterance) -> Result<SpeechOutcome, AletheiaError>;

    /// Suspends playback without discarding the current utterance.
    async fn pause(&self) -> Result<(), AletheiaError>;

    /// Resumes suspended playback.
    async fn resume(&self) -> Result<(), AletheiaError>;

    /// Drops the current utterance; its `speak` resolves to [`SpeechOutcome::Canceled`].
    async fn cancel(&self) -> Result<(), AletheiaError>;
}
