// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guided meditation sessions.
//!
//! ```text
//! TypeSelection -> Loading -> Narrating <-> Paused
//!                               |
//!                               +--(all segments)--> Completed -> TypeSelection
//!                               +--(stop)----------> TypeSelection
//! ```
//!
//! Segments are spoken one at a time with a fixed pause between them.
//! Speech and background audio pause and resume together. A session that
//! runs to the end is persisted; a stopped one is discarded.

use std::sync::Arc;
use std::sync::{Mutex as StdMutex, MutexGuard};
use std::time::Duration;

use aletheia_config::model::MeditationConfig;
use aletheia_core::types::{
    EMOTION_AFTER_MEDITATION, MeditationSession, MeditationType, SpeechOutcome, UserId, new_id,
};
use aletheia_core::{AletheiaError, AmbientAudio, Emotion, SessionContext, StorageAdapter};
use aletheia_gateway::AnalysisGateway;
use aletheia_voice::VoiceIo;
use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// States of the meditation FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MeditationState {
    TypeSelection,
    Loading,
    Narrating,
    Paused,
    Completed,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum MeditationExit {
    /// Every segment was narrated; the persisted record.
    Completed(MeditationSession),
    /// Ended early by the user; nothing was persisted.
    Stopped,
}

/// What the caller gets back once narration has begun.
#[derive(Debug, Clone, PartialEq)]
pub struct MeditationStart {
    pub kind: MeditationType,
    pub segments: Vec<String>,
    pub emotion_before: Option<Emotion>,
}

struct Active {
    kind: MeditationType,
    user_id: UserId,
    emotion_before: Option<Emotion>,
    started: Instant,
    token: CancellationToken,
}

/// Whole minutes elapsed, rounded to nearest, never below one.
pub fn elapsed_minutes(elapsed: Duration) -> u32 {
    let minutes = (elapsed.as_secs_f64() / 60.0).round() as u32;
    minutes.max(1)
}

/// The meditation controller.
pub struct MeditationController {
    session: SessionContext,
    storage: Arc<dyn StorageAdapter>,
    gateway: Arc<AnalysisGateway>,
    voice: Arc<VoiceIo>,
    audio: Arc<dyn AmbientAudio>,
    config: MeditationConfig,
    state: watch::Sender<MeditationState>,
    volume: StdMutex<f32>,
    narration: Mutex<Option<JoinHandle<Result<MeditationExit, AletheiaError>>>>,
    active: StdMutex<Option<Arc<Active>>>,
    /// Cancels the session that is still loading its script.
    loading: StdMutex<Option<CancellationToken>>,
}

fn guard<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|p| p.into_inner())
}

impl MeditationController {
    pub fn new(
        session: SessionContext,
        storage: Arc<dyn StorageAdapter>,
        gateway: Arc<AnalysisGateway>,
        voice: Arc<VoiceIo>,
        audio: Arc<dyn AmbientAudio>,
        config: MeditationConfig,
    ) -> Self {
        let volume = config.default_volume;
        Self {
            session,
            storage,
            gateway,
            voice,
            audio,
            config,
            state: watch::Sender::new(MeditationState::TypeSelection),
            volume: StdMutex::new(volume),
            narration: Mutex::new(None),
            active: StdMutex::new(None),
            loading: StdMutex::new(None),
        }
    }

    pub fn state(&self) -> MeditationState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<MeditationState> {
        self.state.subscribe()
    }

    /// The user-set narration volume.
    pub fn volume(&self) -> f32 {
        *guard(&self.volume)
    }

    fn background_volume(&self, volume: f32) -> f32 {
        volume * self.config.background_volume_ratio
    }

    /// Loads a script for `kind` and starts narrating it.
    ///
    /// On a failed script request the controller returns to
    /// `TypeSelection` and the error is handed back. A [`stop`](Self::stop)
    /// while the script is loading ends the session before any audio plays;
    /// `start` then returns [`AletheiaError::SessionEnded`].
    pub async fn start(self: &Arc<Self>, kind: MeditationType) -> Result<MeditationStart, AletheiaError> {
        let user_id = self.session.user_id()?;
        let token = CancellationToken::new();
        let mut busy_in = None;
        self.state.send_if_modified(|state| match *state {
            MeditationState::TypeSelection | MeditationState::Completed => {
                *state = MeditationState::Loading;
                *guard(&self.loading) = Some(token.clone());
                true
            }
            other => {
                busy_in = Some(other);
                false
            }
        });
        if let Some(other) = busy_in {
            return Err(AletheiaError::Busy(format!("a meditation is already {other}")));
        }
        let started = Instant::now();

        let emotion_before = tokio::select! {
            _ = token.cancelled() => return Err(AletheiaError::SessionEnded),
            records = self.storage.recent_emotion_records(&user_id, 1) => match records {
                Ok(records) => records.first().map(|r| r.emotion),
                Err(e) => {
                    warn!(error = %e, "could not look up emotion before meditation");
                    None
                }
            },
        };

        let script = tokio::select! {
            _ = token.cancelled() => return Err(AletheiaError::SessionEnded),
            script = self.gateway.meditation_script(kind) => script,
        };
        let script = match script {
            Ok(script) => script,
            Err(e) => {
                if !token.is_cancelled() {
                    self.state.send_replace(MeditationState::TypeSelection);
                }
                return Err(e);
            }
        };

        // Held until narration is spawned, so `stop` reaps what this spawns.
        let mut narration = self.narration.lock().await;
        let active = Arc::new(Active {
            kind,
            user_id,
            emotion_before,
            started,
            token: token.clone(),
        });
        {
            let mut current = guard(&self.active);
            if token.is_cancelled() {
                debug!(%kind, "meditation stopped while loading");
                return Err(AletheiaError::SessionEnded);
            }
            *current = Some(Arc::clone(&active));
        }

        let volume = self.volume();
        if let Err(e) = self
            .audio
            .play_loop(&self.config.background_track, self.background_volume(volume))
            .await
        {
            warn!(error = %e, "background audio unavailable");
        }

        self.state.send_replace(MeditationState::Narrating);
        info!(%kind, segments = script.segments.len(), ?emotion_before, "meditation started");

        let this = Arc::clone(self);
        let segments = script.segments.clone();
        *narration = Some(tokio::spawn(async move { this.narrate(active, segments).await }));

        Ok(MeditationStart {
            kind,
            segments: script.segments,
            emotion_before,
        })
    }

    /// Clears the active session if it is still `active`.
    fn release(&self, active: &Active) {
        let mut current = guard(&self.active);
        if current.as_ref().is_some_and(|c| std::ptr::eq(Arc::as_ptr(c), active)) {
            *current = None;
        }
    }

    async fn wait_while_paused(&self, token: &CancellationToken) -> bool {
        let mut rx = self.state.subscribe();
        loop {
            if token.is_cancelled() {
                return false;
            }
            if *rx.borrow_and_update() != MeditationState::Paused {
                return true;
            }
            tokio::select! {
                _ = token.cancelled() => return false,
                changed = rx.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                }
            }
        }
    }

    async fn narrate(
        self: Arc<Self>,
        active: Arc<Active>,
        segments: Vec<String>,
    ) -> Result<MeditationExit, AletheiaError> {
        let exit = self.narrate_segments(&active, segments).await;
        if exit.is_err() && !active.token.is_cancelled() {
            self.release(&active);
            if let Err(e) = self.audio.stop().await {
                warn!(error = %e, "failed to stop background audio");
            }
            self.state.send_replace(MeditationState::TypeSelection);
        }
        exit
    }

    async fn narrate_segments(
        &self,
        active: &Active,
        segments: Vec<String>,
    ) -> Result<MeditationExit, AletheiaError> {
        let pause = Duration::from_millis(self.config.segment_pause_ms);
        let last = segments.len().saturating_sub(1);

        for (index, segment) in segments.into_iter().enumerate() {
            if !self.wait_while_paused(&active.token).await {
                return Ok(MeditationExit::Stopped);
            }
            debug!(index, "narrating segment");
            let utterance = self
                .voice
                .utterance(segment)
                .with_rate(self.config.speech_rate)
                .with_volume(self.volume());
            let outcome = tokio::select! {
                _ = active.token.cancelled() => return Ok(MeditationExit::Stopped),
                outcome = self.voice.speak(utterance) => outcome?,
            };
            if outcome == SpeechOutcome::Canceled || active.token.is_cancelled() {
                return Ok(MeditationExit::Stopped);
            }
            if index < last {
                tokio::select! {
                    _ = active.token.cancelled() => return Ok(MeditationExit::Stopped),
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        if active.token.is_cancelled() {
            return Ok(MeditationExit::Stopped);
        }
        self.complete(active).await.map(MeditationExit::Completed)
    }

    async fn complete(&self, active: &Active) -> Result<MeditationSession, AletheiaError> {
        if let Err(e) = self.audio.stop().await {
            warn!(error = %e, "failed to stop background audio");
        }
        let duration_minutes = elapsed_minutes(active.started.elapsed());

        let ai_summary = match active.emotion_before {
            Some(before) => match self
                .gateway
                .meditation_summary(before, EMOTION_AFTER_MEDITATION)
                .await
            {
                Ok(summary) => Some(summary),
                Err(e) => {
                    warn!(error = %e, "meditation summary unavailable");
                    None
                }
            },
            None => None,
        };

        let record = MeditationSession {
            id: new_id(),
            user_id: active.user_id.clone(),
            meditation_type: active.kind,
            duration_minutes,
            emotion_before: active.emotion_before,
            emotion_after: EMOTION_AFTER_MEDITATION.to_string(),
            ai_summary,
            completed_at: Utc::now(),
        };
        let saved = self.storage.insert_meditation_session(&record).await;
        self.release(active);
        self.state.send_replace(MeditationState::Completed);
        saved?;
        info!(kind = %record.meditation_type, duration_minutes, "meditation completed");
        Ok(record)
    }

    /// Pauses narration and background audio together.
    pub async fn pause(&self) -> Result<(), AletheiaError> {
        if self.state() != MeditationState::Narrating {
            return Ok(());
        }
        self.state.send_replace(MeditationState::Paused);
        self.voice.pause_speech().await?;
        self.audio.pause().await?;
        debug!("meditation paused");
        Ok(())
    }

    /// Resumes narration and background audio together.
    pub async fn resume(&self) -> Result<(), AletheiaError> {
        if self.state() != MeditationState::Paused {
            return Ok(());
        }
        self.voice.resume_speech().await?;
        self.audio.resume().await?;
        self.state.send_replace(MeditationState::Narrating);
        debug!("meditation resumed");
        Ok(())
    }

    /// Sets the narration volume.
    ///
    /// Applies to utterances not yet started and, scaled by the background
    /// ratio, to the looping background track.
    pub async fn set_volume(&self, volume: f32) -> Result<(), AletheiaError> {
        let volume = volume.clamp(0.0, 1.0);
        *guard(&self.volume) = volume;
        if matches!(
            self.state(),
            MeditationState::Narrating | MeditationState::Paused
        ) {
            self.audio.set_volume(self.background_volume(volume)).await?;
        }
        Ok(())
    }

    /// Ends the session early. Nothing is persisted.
    ///
    /// Works from `Loading` too: the pending script is abandoned and no
    /// narration or background audio starts.
    pub async fn stop(&self) -> Result<MeditationExit, AletheiaError> {
        if let Some(loading) = guard(&self.loading).take() {
            loading.cancel();
        }
        let active = guard(&self.active).take();
        let Some(active) = active else {
            self.state.send_replace(MeditationState::TypeSelection);
            return Ok(MeditationExit::Stopped);
        };
        active.token.cancel();
        let speech = self.voice.cancel_speech().await;
        let handle = self.narration.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "narration task ended abnormally");
            }
        }
        self.audio.stop().await?;
        speech?;
        self.state.send_replace(MeditationState::TypeSelection);
        info!(kind = %active.kind, "meditation stopped early");
        Ok(MeditationExit::Stopped)
    }

    /// Waits for the current session to end, however it ends.
    pub async fn finished(&self) -> Result<MeditationExit, AletheiaError> {
        let handle = self.narration.lock().await.take();
        match handle {
            Some(handle) => handle
                .await
                .map_err(|e| AletheiaError::Internal(format!("narration task failed: {e}")))?,
            None => Ok(MeditationExit::Stopped),
        }
    }

    /// Returns to type selection after a completed session.
    pub fn reset(&self) {
        if self.state() == MeditationState::Completed {
            self.state.send_replace(MeditationState::TypeSelection);
        }
    }
}
