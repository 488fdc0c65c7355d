// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spoken conversation with the companion.
//!
//! Turn-taking is strictly serial: listen for one utterance, send it, speak
//! the reply, then listen again. Recognition never runs while the reply is
//! being spoken.
//!
//! ```text
//! Idle -> Listening -> Processing -> Speaking -> Listening -> ...
//!            any active state --end()--> Ended
//! ```
//!
//! Every run carries a generation number. [`VoiceConversation::end`] bumps
//! it before stopping recognition and speech, so a callback that completes
//! after the end sees a stale generation and is dropped.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use aletheia_config::model::ChatConfig;
use aletheia_core::types::{ChatMessage, ConversationSummary, new_id};
use aletheia_core::{AletheiaError, SessionContext, StorageAdapter};
use aletheia_gateway::AnalysisGateway;
use aletheia_voice::VoiceIo;
use chrono::Utc;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::conversation::ConversationSession;

/// States of the voice-mode FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum VoiceState {
    Idle,
    Listening,
    Processing,
    Speaking,
    Ended,
}

impl VoiceState {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            VoiceState::Listening | VoiceState::Processing | VoiceState::Speaking
        )
    }
}

/// Progress reported to the front end while voice mode runs.
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    Heard(String),
    Replied(String),
    /// A non-fatal failure; the loop carries on listening.
    Notice(String),
    /// Recognition became unavailable and the loop stopped on its own.
    InputClosed,
}

struct Run {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// The voice-mode controller.
pub struct VoiceConversation {
    chat: Arc<ConversationSession>,
    voice: Arc<VoiceIo>,
    gateway: Arc<AnalysisGateway>,
    storage: Arc<dyn StorageAdapter>,
    session: SessionContext,
    speech_rate: f32,
    relisten_delay: Duration,
    state: watch::Sender<VoiceState>,
    generation: AtomicU64,
    transcript: Mutex<Vec<ChatMessage>>,
    run: Mutex<Option<Run>>,
}

impl VoiceConversation {
    pub fn new(
        chat: Arc<ConversationSession>,
        voice: Arc<VoiceIo>,
        gateway: Arc<AnalysisGateway>,
        storage: Arc<dyn StorageAdapter>,
        session: SessionContext,
        config: &ChatConfig,
    ) -> Self {
        Self {
            chat,
            voice,
            gateway,
            storage,
            session,
            speech_rate: config.speech_rate,
            relisten_delay: Duration::from_millis(config.relisten_delay_ms),
            state: watch::Sender::new(VoiceState::Idle),
            generation: AtomicU64::new(0),
            transcript: Mutex::new(Vec::new()),
            run: Mutex::new(None),
        }
    }

    pub fn state(&self) -> VoiceState {
        *self.state.borrow()
    }

    /// Watches state transitions.
    pub fn subscribe(&self) -> watch::Receiver<VoiceState> {
        self.state.subscribe()
    }

    /// Number of completed turns in the current (or last) voice session.
    pub async fn turns(&self) -> usize {
        self.transcript.lock().await.len() / 2
    }

    /// Enters voice mode and starts listening.
    ///
    /// Fails with [`AletheiaError::Unsupported`] and leaves the state
    /// untouched when speech recognition is unavailable.
    pub async fn start(self: &Arc<Self>) -> Result<mpsc::UnboundedReceiver<VoiceEvent>, AletheiaError> {
        self.voice.ensure_recognition()?;
        self.session.require()?;

        let mut run = self.run.lock().await;
        if self.state().is_active() {
            return Err(AletheiaError::Busy("voice mode is already active".into()));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.transcript.lock().await.clear();
        self.state.send_replace(VoiceState::Listening);
        info!(generation, "voice mode started");

        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let this = Arc::clone(self);
        let task_token = token.clone();
        let handle = tokio::spawn(async move { this.run_loop(generation, task_token, tx).await });
        *run = Some(Run { token, handle });
        Ok(rx)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Applies a transition only if `generation` is still the live run.
    fn transition(&self, generation: u64, next: VoiceState) -> bool {
        if !self.is_current(generation) {
            debug!(generation, %next, "dropping stale transition");
            return false;
        }
        self.state.send_replace(next);
        true
    }

    async fn pause(&self, token: &CancellationToken, delay: Duration) -> bool {
        tokio::select! {
            _ = token.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    async fn run_loop(
        self: Arc<Self>,
        generation: u64,
        token: CancellationToken,
        events: mpsc::UnboundedSender<VoiceEvent>,
    ) {
        loop {
            if !self.transition(generation, VoiceState::Listening) {
                break;
            }
            let heard = tokio::select! {
                _ = token.cancelled() => break,
                heard = self.voice.listen_once() => heard,
            };
            let text = match heard {
                Ok(Some(text)) => text,
                Ok(None) => {
                    if self.pause(&token, self.relisten_delay).await {
                        continue;
                    }
                    break;
                }
                Err(AletheiaError::Unsupported(reason)) => {
                    warn!(%reason, "recognition unavailable, leaving voice loop");
                    let _ = events.send(VoiceEvent::InputClosed);
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "recognition failed");
                    if self.pause(&token, self.relisten_delay * 2).await {
                        continue;
                    }
                    break;
                }
            };

            if !self.transition(generation, VoiceState::Processing) {
                break;
            }
            let _ = events.send(VoiceEvent::Heard(text.clone()));
            let sent = tokio::select! {
                _ = token.cancelled() => break,
                sent = self.chat.send(&text) => sent,
            };
            let turn = match sent {
                Ok(turn) => turn,
                Err(e) => {
                    warn!(error = %e, "voice turn failed");
                    let _ = events.send(VoiceEvent::Notice(e.to_string()));
                    if self.pause(&token, self.relisten_delay).await {
                        continue;
                    }
                    break;
                }
            };
            if !self.is_current(generation) {
                break;
            }
            {
                let mut transcript = self.transcript.lock().await;
                transcript.push(turn.user);
                transcript.push(turn.assistant.clone());
            }
            let _ = events.send(VoiceEvent::Replied(turn.assistant.content.clone()));

            if !self.transition(generation, VoiceState::Speaking) {
                break;
            }
            let utterance = self
                .voice
                .utterance(turn.assistant.content)
                .with_rate(self.speech_rate);
            let spoken = tokio::select! {
                _ = token.cancelled() => break,
                spoken = self.voice.speak(utterance) => spoken,
            };
            if let Err(e) = spoken {
                warn!(error = %e, "speaking the reply failed");
                let _ = events.send(VoiceEvent::Notice(e.to_string()));
            }
            if !self.pause(&token, self.relisten_delay).await {
                break;
            }
        }
        debug!(generation, "voice loop exited");
    }

    /// Leaves voice mode.
    ///
    /// Recognition and speech are stopped first. If the session produced at
    /// least one turn, a structured summary of its transcript is requested
    /// and persisted; otherwise nothing is written and `None` is returned.
    pub async fn end(&self) -> Result<Option<ConversationSummary>, AletheiaError> {
        let run = self.run.lock().await.take();
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Some(run) = run {
            run.token.cancel();
            if let Err(e) = self.voice.silence().await {
                warn!(error = %e, "failed to silence voice I/O");
            }
            if let Err(e) = run.handle.await {
                warn!(error = %e, "voice loop ended abnormally");
            }
        }
        self.state.send_replace(VoiceState::Ended);

        let transcript = std::mem::take(&mut *self.transcript.lock().await);
        if transcript.is_empty() {
            info!("voice mode ended with no turns");
            return Ok(None);
        }

        let user_id = self.session.user_id()?;
        let digest = self
            .gateway
            .summarize_conversation(&transcript)
            .await
            .inspect_err(|e| warn!(error = %e, "conversation summary failed"))?;
        let summary = ConversationSummary {
            id: new_id(),
            user_id,
            dominant_emotion: digest.dominant_emotion,
            key_topics: digest.key_topics,
            worries: digest.worries,
            reflective_suggestions: digest.reflective_suggestions,
            positive_reinforcement: digest.positive_reinforcement,
            recommended_next_steps: digest.recommended_next_steps,
            created_at: Utc::now(),
        };
        self.storage.insert_conversation_summary(&summary).await?;
        info!(
            turns = transcript.len() / 2,
            dominant_emotion = %summary.dominant_emotion,
            "conversation summary saved"
        );
        Ok(Some(summary))
    }
}
