// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the voice I/O adapter.

use std::sync::Arc;
use std::time::Duration;

use aletheia_config::model::VoiceConfig;
use aletheia_core::AletheiaError;
use aletheia_core::types::SpeechOutcome;
use aletheia_test_utils::{RecordingSynthesizer, ScriptedRecognizer, SynthEvent};
use aletheia_voice::{LineRecognizer, VoiceIo};

fn voice(
    recognizer: Arc<ScriptedRecognizer>,
    synthesizer: Arc<RecordingSynthesizer>,
) -> Arc<VoiceIo> {
    Arc::new(VoiceIo::new(recognizer, synthesizer, &VoiceConfig::default()))
}

#[tokio::test]
async fn unsupported_recognition_is_reported_before_listening() {
    let recognizer = Arc::new(ScriptedRecognizer::unsupported());
    let io = voice(recognizer.clone(), Arc::new(RecordingSynthesizer::new()));

    assert!(!io.recognition_supported());
    assert!(matches!(io.listen_once().await, Err(AletheiaError::Unsupported(_))));
    assert!(matches!(
        io.listen_continuous(Duration::from_millis(10)),
        Err(AletheiaError::Unsupported(_))
    ));
    assert_eq!(recognizer.listens(), 0);
}

#[tokio::test]
async fn listen_once_trims_and_drops_silence() {
    let recognizer = Arc::new(ScriptedRecognizer::new(["  I feel lighter today  "]));
    recognizer.push_silence();
    let io = voice(recognizer, Arc::new(RecordingSynthesizer::new()));

    assert_eq!(io.listen_once().await.unwrap().as_deref(), Some("I feel lighter today"));
    assert_eq!(io.listen_once().await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn continuous_listening_restarts_after_silence_and_errors() {
    let recognizer = Arc::new(ScriptedRecognizer::new(["one"]));
    recognizer.push_silence();
    recognizer.push_error("no-speech");
    recognizer.push_utterance("two");
    let io = voice(recognizer.clone(), Arc::new(RecordingSynthesizer::new()));

    let mut listener = io.listen_continuous(Duration::from_millis(500)).unwrap();
    assert_eq!(listener.next().await.as_deref(), Some("one"));
    assert_eq!(listener.next().await.as_deref(), Some("two"));
    listener.stop().await.unwrap();

    assert!(recognizer.listens() >= 4);
    assert!(recognizer.aborts() >= 1);
}

#[tokio::test(start_paused = true)]
async fn continuous_listening_closes_at_end_of_input() {
    let recognizer = Arc::new(LineRecognizer::new(&b"first line\n\nsecond line\n"[..]));
    let io = VoiceIo::new(
        recognizer,
        Arc::new(RecordingSynthesizer::new()),
        &VoiceConfig::default(),
    );

    let mut listener = io.listen_continuous(Duration::from_millis(100)).unwrap();
    assert_eq!(listener.next().await.as_deref(), Some("first line"));
    assert_eq!(listener.next().await.as_deref(), Some("second line"));
    assert_eq!(listener.next().await, None);
    assert!(!io.recognition_supported());
    listener.stop().await.unwrap();
}

#[tokio::test]
async fn utterances_carry_voice_settings() {
    let config = VoiceConfig {
        lang: "en-GB".into(),
        pitch: 1.2,
        ..VoiceConfig::default()
    };
    let synth = Arc::new(RecordingSynthesizer::new());
    let io = VoiceIo::new(Arc::new(ScriptedRecognizer::new(Vec::<String>::new())), synth.clone(), &config);

    let outcome = io.speak(io.utterance("hello").with_rate(0.9)).await.unwrap();
    assert_eq!(outcome, SpeechOutcome::Completed);

    let spoken = synth.utterances();
    assert_eq!(spoken[0].lang, "en-GB");
    assert_eq!(spoken[0].pitch, 1.2);
    assert_eq!(spoken[0].rate, 0.9);
}

#[tokio::test(start_paused = true)]
async fn speech_is_queued_in_order_and_cancel_drops_the_queue() {
    let synth = Arc::new(RecordingSynthesizer::with_duration(Duration::from_secs(2)));
    let io = voice(Arc::new(ScriptedRecognizer::new(Vec::<String>::new())), synth.clone());

    let first = tokio::spawn({
        let io = io.clone();
        async move { io.speak(io.utterance("first")).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = tokio::spawn({
        let io = io.clone();
        async move { io.speak(io.utterance("second")).await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;

    io.cancel_speech().await.unwrap();

    assert_eq!(first.await.unwrap().unwrap(), SpeechOutcome::Canceled);
    assert_eq!(second.await.unwrap().unwrap(), SpeechOutcome::Canceled);
    assert_eq!(
        synth.events(),
        vec![SynthEvent::Spoke("first".into()), SynthEvent::Canceled]
    );

    // The lane is usable again after a cancel.
    let outcome = io.speak(io.utterance("third")).await.unwrap();
    assert_eq!(outcome, SpeechOutcome::Completed);
}
