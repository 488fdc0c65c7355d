// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Aletheia.
//!
//! Provides mock adapters and a test harness for deterministic,
//! CI-runnable tests without external API calls, microphones or speakers.

pub mod harness;
pub mod mock_provider;
pub mod mock_speech;

pub use harness::TestHarness;
pub use mock_provider::MockProvider;
pub use mock_speech::{AudioEvent, RecordingAudio, RecordingSynthesizer, ScriptedRecognizer, SynthEvent};

use std::sync::{Mutex, MutexGuard};

/// Locks a std mutex, ignoring poisoning from a panicked test thread.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
