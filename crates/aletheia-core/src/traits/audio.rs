// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Looping background audio used under guided meditations.

use async_trait::async_trait;

use crate::error::AletheiaError;

/// A looping background track.
#[async_trait]
pub trait AmbientAudio: Send + Sync {
    /// Starts (or restarts) looping `track` at `volume` in `[0, 1]`.
    async fn play_loop(&self, track: &str, volume: f32) -> Result<(), AletheiaError>;

    async fn pause(&self) -> Result<(), AletheiaError>;

    async fn resume(&self) -> Result<(), AletheiaError>;

    /// Stops playback and rewinds to the start.
    async fn stop(&self) -> Result<(), AletheiaError>;

    async fn set_volume(&self, volume: f32) -> Result<(), AletheiaError>;
}
