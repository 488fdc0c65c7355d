// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted speech and audio adapters.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use aletheia_core::types::{SpeechOutcome, Utterance};
use aletheia_core::{AletheiaError, AmbientAudio, SpeechRecognizer, SpeechSynthesizer};
use async_trait::async_trait;
use tokio::sync::{Notify, watch};
use tokio::time::Instant;

use crate::lock;

// --- Recognition ---

/// A recognizer that hears a fixed script.
///
/// Each `recognize_once` pops the next scripted result. Once the script is
/// exhausted, recognition blocks until aborted, like a microphone in a
/// quiet room.
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Result<Option<String>, String>>>,
    supported: AtomicBool,
    listens: AtomicUsize,
    aborts: AtomicUsize,
    abort: Notify,
}

impl ScriptedRecognizer {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = utterances
            .into_iter()
            .map(|u| Ok(Some(u.into())))
            .collect();
        Self {
            script: Mutex::new(script),
            supported: AtomicBool::new(true),
            listens: AtomicUsize::new(0),
            aborts: AtomicUsize::new(0),
            abort: Notify::new(),
        }
    }

    /// A host without speech recognition.
    pub fn unsupported() -> Self {
        let recognizer = Self::new(Vec::<String>::new());
        recognizer.supported.store(false, Ordering::SeqCst);
        recognizer
    }

    pub fn push_utterance(&self, text: impl Into<String>) {
        lock(&self.script).push_back(Ok(Some(text.into())));
    }

    /// Queue a recognition that hears nothing.
    pub fn push_silence(&self) {
        lock(&self.script).push_back(Ok(None));
    }

    /// Queue a recognition error.
    pub fn push_error(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Number of times recognition was started.
    pub fn listens(&self) -> usize {
        self.listens.load(Ordering::SeqCst)
    }

    pub fn aborts(&self) -> usize {
        self.aborts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::SeqCst)
    }

    async fn recognize_once(&self) -> Result<Option<String>, AletheiaError> {
        let aborted = self.abort.notified();
        self.listens.fetch_add(1, Ordering::SeqCst);
        let next = lock(&self.script).pop_front();
        match next {
            Some(Ok(heard)) => Ok(heard),
            Some(Err(message)) => Err(AletheiaError::Internal(message)),
            None => {
                aborted.await;
                Ok(None)
            }
        }
    }

    async fn abort(&self) -> Result<(), AletheiaError> {
        self.aborts.fetch_add(1, Ordering::SeqCst);
        self.abort.notify_waiters();
        Ok(())
    }
}

// --- Synthesis ---

/// Something the recording synthesizer was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthEvent {
    Spoke(String),
    Paused,
    Resumed,
    Canceled,
}

#[derive(Debug, Clone, Copy, Default)]
struct Control {
    paused: bool,
    epoch: u64,
}

/// A synthesizer that records utterances instead of playing them.
///
/// Each utterance "plays" for a fixed duration (zero by default) measured
/// on the tokio clock, so tests can run under paused time.
pub struct RecordingSynthesizer {
    utterances: Mutex<Vec<Utterance>>,
    events: Mutex<Vec<SynthEvent>>,
    duration: Duration,
    control: watch::Sender<Control>,
}

impl RecordingSynthesizer {
    pub fn new() -> Self {
        Self::with_duration(Duration::ZERO)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            utterances: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            duration,
            control: watch::Sender::new(Control::default()),
        }
    }

    pub fn utterances(&self) -> Vec<Utterance> {
        lock(&self.utterances).clone()
    }

    /// Text of every utterance started, in order.
    pub fn spoken(&self) -> Vec<String> {
        lock(&self.utterances).iter().map(|u| u.text.clone()).collect()
    }

    pub fn events(&self) -> Vec<SynthEvent> {
        lock(&self.events).clone()
    }

    pub fn is_paused(&self) -> bool {
        self.control.borrow().paused
    }

    fn record(&self, event: SynthEvent) {
        lock(&self.events).push(event);
    }
}

impl Default for RecordingSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesizer for RecordingSynthesizer {
    async fn speak(&self, utterance: &Utterance) -> Result<SpeechOutcome, AletheiaError> {
        lock(&self.utterances).push(utterance.clone());
        self.record(SynthEvent::Spoke(utterance.text.clone()));

        let mut rx = self.control.subscribe();
        let epoch = rx.borrow().epoch;
        let mut remaining = self.duration;

        loop {
            loop {
                let control = *rx.borrow_and_update();
                if control.epoch != epoch {
                    return Ok(SpeechOutcome::Canceled);
                }
                if !control.paused {
                    break;
                }
                if rx.changed().await.is_err() {
                    return Ok(SpeechOutcome::Canceled);
                }
            }
            if remaining.is_zero() {
                return Ok(SpeechOutcome::Completed);
            }

            let started = Instant::now();
            tokio::select! {
                _ = tokio::time::sleep(remaining) => return Ok(SpeechOutcome::Completed),
                changed = rx.changed() => {
                    if changed.is_err() {
                        return Ok(SpeechOutcome::Canceled);
                    }
                    remaining = remaining.saturating_sub(started.elapsed());
                }
            }
        }
    }

    async fn pause(&self) -> Result<(), AletheiaError> {
        self.control.send_modify(|c| c.paused = true);
        self.record(SynthEvent::Paused);
        Ok(())
    }

    async fn resume(&self) -> Result<(), AletheiaError> {
        self.control.send_modify(|c| c.paused = false);
        self.record(SynthEvent::Resumed);
        Ok(())
    }

    async fn cancel(&self) -> Result<(), AletheiaError> {
        self.control.send_modify(|c| {
            c.epoch += 1;
            c.paused = false;
        });
        self.record(SynthEvent::Canceled);
        Ok(())
    }
}

// --- Background audio ---

/// Something the recording audio player was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Play { track: String, volume: f32 },
    Pause,
    Resume,
    Stop,
    Volume(f32),
}

/// An ambient audio player that records calls.
#[derive(Default)]
pub struct RecordingAudio {
    events: Mutex<Vec<AudioEvent>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        lock(&self.events).clone()
    }

    /// The most recent volume set by `play_loop` or `set_volume`.
    pub fn volume(&self) -> Option<f32> {
        lock(&self.events).iter().rev().find_map(|e| match e {
            AudioEvent::Play { volume, .. } | AudioEvent::Volume(volume) => Some(*volume),
            _ => None,
        })
    }

    fn record(&self, event: AudioEvent) {
        lock(&self.events).push(event);
    }
}

#[async_trait]
impl AmbientAudio for RecordingAudio {
    async fn play_loop(&self, track: &str, volume: f32) -> Result<(), AletheiaError> {
        self.record(AudioEvent::Play {
            track: track.to_string(),
            volume,
        });
        Ok(())
    }

    async fn pause(&self) -> Result<(), AletheiaError> {
        self.record(AudioEvent::Pause);
        Ok(())
    }

    async fn resume(&self) -> Result<(), AletheiaError> {
        self.record(AudioEvent::Resume);
        Ok(())
    }

    async fn stop(&self) -> Result<(), AletheiaError> {
        self.record(AudioEvent::Stop);
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<(), AletheiaError> {
        self.record(AudioEvent::Volume(volume));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn exhausted_script_waits_for_abort() {
        let recognizer = ScriptedRecognizer::new(["hello"]);
        assert_eq!(recognizer.recognize_once().await.unwrap().as_deref(), Some("hello"));

        let listen = recognizer.recognize_once();
        let abort = async {
            tokio::task::yield_now().await;
            recognizer.abort().await.unwrap();
        };
        let (heard, ()) = tokio::join!(listen, abort);
        assert_eq!(heard.unwrap(), None);
        assert_eq!(recognizer.listens(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_extends_playback() {
        let synth = RecordingSynthesizer::with_duration(Duration::from_secs(4));
        let start = Instant::now();
        let u = Utterance::new("one");
        let speak = synth.speak(&u);
        let control = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            synth.pause().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            synth.resume().await.unwrap();
        };
        let (outcome, ()) = tokio::join!(speak, control);
        assert_eq!(outcome.unwrap(), SpeechOutcome::Completed);
        assert_eq!(start.elapsed(), Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_cuts_playback_short() {
        let synth = RecordingSynthesizer::with_duration(Duration::from_secs(4));
        let u = Utterance::new("one");
        let speak = synth.speak(&u);
        let control = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            synth.cancel().await.unwrap();
        };
        let (outcome, ()) = tokio::join!(speak, control);
        assert_eq!(outcome.unwrap(), SpeechOutcome::Canceled);
        assert_eq!(
            synth.events(),
            vec![SynthEvent::Spoke("one".into()), SynthEvent::Canceled]
        );
    }
}
