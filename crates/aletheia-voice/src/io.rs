// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Voice I/O adapter.
//!
//! Recognition comes in two shapes: [`VoiceIo::listen_once`] captures a
//! single utterance, [`VoiceIo::listen_continuous`] keeps restarting
//! recognition until stopped. Synthesis goes through one lane, so
//! utterances play strictly in the order they were queued, and
//! [`VoiceIo::cancel_speech`] drops everything queued behind the current
//! one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use aletheia_config::model::VoiceConfig;
use aletheia_core::types::{SpeechOutcome, Utterance};
use aletheia_core::{AletheiaError, SpeechRecognizer, SpeechSynthesizer};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Capacity of the continuous-listening transcript channel.
const TRANSCRIPT_BUFFER: usize = 8;

/// Speech recognition and synthesis behind one handle.
pub struct VoiceIo {
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    lang: String,
    pitch: f32,
    lane: Mutex<()>,
    cancel_epoch: AtomicU64,
}

impl VoiceIo {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: &VoiceConfig,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            lang: config.lang.clone(),
            pitch: config.pitch,
            lane: Mutex::new(()),
            cancel_epoch: AtomicU64::new(0),
        }
    }

    pub fn recognition_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    /// Fails with [`AletheiaError::Unsupported`] when recognition is unavailable.
    pub fn ensure_recognition(&self) -> Result<(), AletheiaError> {
        if self.recognizer.is_supported() {
            Ok(())
        } else {
            Err(AletheiaError::Unsupported(
                "speech recognition is not available".to_string(),
            ))
        }
    }

    /// Captures a single utterance.
    ///
    /// Returns `None` when nothing was heard or recognition was aborted.
    pub async fn listen_once(&self) -> Result<Option<String>, AletheiaError> {
        self.ensure_recognition()?;
        let heard = self.recognizer.recognize_once().await?;
        Ok(clean_transcript(heard))
    }

    /// Starts continuous recognition.
    ///
    /// Each captured utterance is delivered on the returned listener.
    /// Recognition restarts `relisten` after an empty result, and after
    /// twice that following an error. The listener closes once the
    /// recognizer stops reporting itself supported.
    pub fn listen_continuous(&self, relisten: Duration) -> Result<ContinuousListener, AletheiaError> {
        self.ensure_recognition()?;
        let (tx, rx) = mpsc::channel(TRANSCRIPT_BUFFER);
        let token = CancellationToken::new();
        let recognizer = Arc::clone(&self.recognizer);
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            loop {
                let result = tokio::select! {
                    _ = task_token.cancelled() => break,
                    result = recognizer.recognize_once() => result,
                };
                let delay = match result {
                    Ok(heard) => match clean_transcript(heard) {
                        Some(text) => {
                            if tx.send(text).await.is_err() {
                                break;
                            }
                            continue;
                        }
                        None if !recognizer.is_supported() => break,
                        None => relisten,
                    },
                    Err(e) => {
                        warn!(error = %e, "recognition failed, restarting");
                        relisten * 2
                    }
                };
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
            debug!("continuous listening stopped");
        });

        Ok(ContinuousListener {
            rx,
            token,
            handle,
            recognizer: Arc::clone(&self.recognizer),
        })
    }

    /// Aborts any recognition in progress.
    pub async fn stop_listening(&self) -> Result<(), AletheiaError> {
        self.recognizer.abort().await
    }

    /// An utterance carrying the configured language and pitch.
    pub fn utterance(&self, text: impl Into<String>) -> Utterance {
        Utterance::new(text)
            .with_lang(self.lang.clone())
            .with_pitch(self.pitch)
    }

    /// Queues `utterance` and waits until it has been spoken or canceled.
    pub async fn speak(&self, utterance: Utterance) -> Result<SpeechOutcome, AletheiaError> {
        let epoch = self.cancel_epoch.load(Ordering::SeqCst);
        let _turn = self.lane.lock().await;
        if self.cancel_epoch.load(Ordering::SeqCst) != epoch {
            return Ok(SpeechOutcome::Canceled);
        }
        debug!(chars = utterance.text.len(), rate = utterance.rate, "speaking");
        self.synthesizer.speak(&utterance).await
    }

    pub async fn pause_speech(&self) -> Result<(), AletheiaError> {
        self.synthesizer.pause().await
    }

    pub async fn resume_speech(&self) -> Result<(), AletheiaError> {
        self.synthesizer.resume().await
    }

    /// Stops the current utterance and discards every queued one.
    pub async fn cancel_speech(&self) -> Result<(), AletheiaError> {
        self.cancel_epoch.fetch_add(1, Ordering::SeqCst);
        self.synthesizer.cancel().await
    }

    /// Stops recognition and synthesis together.
    pub async fn silence(&self) -> Result<(), AletheiaError> {
        let listening = self.stop_listening().await;
        let speaking = self.cancel_speech().await;
        listening.and(speaking)
    }
}

fn clean_transcript(heard: Option<String>) -> Option<String> {
    heard
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Handle on a running continuous recognition loop.
pub struct ContinuousListener {
    rx: mpsc::Receiver<String>,
    token: CancellationToken,
    handle: JoinHandle<()>,
    recognizer: Arc<dyn SpeechRecognizer>,
}

impl ContinuousListener {
    /// Waits for the next captured utterance. `None` once stopped.
    pub async fn next(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    /// Stops the loop and aborts the recognition in flight.
    pub async fn stop(self) -> Result<(), AletheiaError> {
        self.token.cancel();
        self.recognizer.abort().await?;
        if let Err(e) = self.handle.await {
            warn!(error = %e, "listener task ended abnormally");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcripts_are_trimmed_and_blank_dropped() {
        assert_eq!(clean_transcript(Some("  hi  ".into())), Some("hi".into()));
        assert_eq!(clean_transcript(Some("   ".into())), None);
        assert_eq!(clean_transcript(None), None);
    }
}
