// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Speech synthesis backends.

use std::io::Write;
use std::process::Stdio;

use aletheia_config::model::VoiceConfig;
use aletheia_core::types::{SpeechOutcome, Utterance};
use aletheia_core::{AletheiaError, SpeechSynthesizer};
use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{on_path, split_command};

/// Words per minute at rate 1.0, shared by `say` and `espeak`.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Programs probed, in order, when no command is configured.
const CANDIDATES: &[&str] = &["say", "espeak-ng", "espeak"];

/// How utterance parameters translate into command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtsFlavor {
    /// macOS `say`: rate only.
    Say,
    /// `espeak` / `espeak-ng`: rate, pitch, amplitude and voice.
    Espeak,
    /// Anything else: the text is the only argument.
    Plain,
}

impl TtsFlavor {
    fn for_program(program: &str) -> Self {
        let name = std::path::Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program);
        match name {
            "say" => TtsFlavor::Say,
            "espeak" | "espeak-ng" => TtsFlavor::Espeak,
            _ => TtsFlavor::Plain,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Control {
    paused: bool,
    epoch: u64,
}

/// Speaks by running a text-to-speech command once per utterance.
///
/// Pausing kills the running process; the interrupted utterance is spoken
/// again from its start on resume. Cancel ends it for good.
pub struct CommandSynthesizer {
    program: String,
    base_args: Vec<String>,
    flavor: TtsFlavor,
    control: watch::Sender<Control>,
}

impl CommandSynthesizer {
    /// Builds a synthesizer from a command line such as `espeak-ng -v en`.
    pub fn from_command_line(command: &str) -> Result<Self, AletheiaError> {
        let (program, base_args) = split_command(command)
            .ok_or_else(|| AletheiaError::Config("voice.synthesizer_command is blank".into()))?;
        let flavor = TtsFlavor::for_program(&program);
        Ok(Self {
            program,
            base_args,
            flavor,
            control: watch::Sender::new(Control::default()),
        })
    }

    /// Uses the configured command, or the first known TTS program on `PATH`.
    pub fn detect(config: &VoiceConfig) -> Option<Self> {
        if let Some(command) = config.synthesizer_command.as_deref() {
            return Self::from_command_line(command).ok();
        }
        let found = CANDIDATES.iter().find(|program| on_path(program))?;
        info!(program = *found, "using text-to-speech command");
        Self::from_command_line(found).ok()
    }

    pub fn flavor(&self) -> TtsFlavor {
        self.flavor
    }

    /// Arguments for one utterance, after the configured base arguments.
    pub fn args_for(&self, utterance: &Utterance) -> Vec<String> {
        let wpm = ((BASE_WORDS_PER_MINUTE * utterance.rate).round() as u32).max(1);
        let mut args = self.base_args.clone();
        match self.flavor {
            TtsFlavor::Say => {
                args.extend(["-r".to_string(), wpm.to_string()]);
            }
            TtsFlavor::Espeak => {
                let pitch = (utterance.pitch * 50.0).round().clamp(0.0, 99.0) as u32;
                let amplitude = (utterance.volume * 100.0).round() as u32;
                args.extend([
                    "-s".to_string(),
                    wpm.to_string(),
                    "-p".to_string(),
                    pitch.to_string(),
                    "-a".to_string(),
                    amplitude.to_string(),
                    "-v".to_string(),
                    utterance.lang.to_ascii_lowercase(),
                ]);
            }
            TtsFlavor::Plain => {}
        }
        args.push(utterance.text.clone());
        args
    }

    /// Resolves once the control state leaves `epoch` or turns paused.
    async fn interrupted(rx: &mut watch::Receiver<Control>, epoch: u64) {
        loop {
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
            let control = *rx.borrow_and_update();
            if control.epoch != epoch || control.paused {
                return;
            }
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for CommandSynthesizer {
    async fn speak(&self, utterance: &Utterance) -> Result<SpeechOutcome, AletheiaError> {
        let mut rx = self.control.subscribe();
        let epoch = rx.borrow().epoch;

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

            let mut child = Command::new(&self.program)
                .args(self.args_for(utterance))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| {
                    AletheiaError::Unsupported(format!("cannot run `{}`: {e}", self.program))
                })?;

            tokio::select! {
                status = child.wait() => {
                    let status = status.map_err(|e| AletheiaError::Internal(e.to_string()))?;
                    if !status.success() {
                        return Err(AletheiaError::Internal(format!(
                            "`{}` exited with {status}",
                            self.program
                        )));
                    }
                    return Ok(SpeechOutcome::Completed);
                }
                _ = Self::interrupted(&mut rx, epoch) => {}
            }

            let _ = child.kill().await;
            if rx.borrow().epoch != epoch {
                return Ok(SpeechOutcome::Canceled);
            }
            debug!("utterance interrupted by pause, replaying on resume");
        }
    }

    async fn pause(&self) -> Result<(), AletheiaError> {
        self.control.send_modify(|c| c.paused = true);
        Ok(())
    }

    async fn resume(&self) -> Result<(), AletheiaError> {
        self.control.send_modify(|c| c.paused = false);
        Ok(())
    }

    async fn cancel(&self) -> Result<(), AletheiaError> {
        self.control.send_modify(|c| {
            c.epoch += 1;
            c.paused = false;
        });
        Ok(())
    }
}

/// Writes utterances to stdout instead of speaking them.
///
/// The fallback when no text-to-speech command is available.
#[derive(Debug, Default)]
pub struct PrintSynthesizer;

#[async_trait]
impl SpeechSynthesizer for PrintSynthesizer {
    async fn speak(&self, utterance: &Utterance) -> Result<SpeechOutcome, AletheiaError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "  🔊 {}", utterance.text).map_err(|e| AletheiaError::Internal(e.to_string()))?;
        Ok(SpeechOutcome::Completed)
    }

    async fn pause(&self) -> Result<(), AletheiaError> {
        Ok(())
    }

    async fn resume(&self) -> Result<(), AletheiaError> {
        Ok(())
    }

    async fn cancel(&self) -> Result<(), AletheiaError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance() -> Utterance {
        Utterance::new("breathe in")
            .with_rate(0.8)
            .with_pitch(1.0)
            .with_volume(0.5)
    }

    #[test]
    fn flavor_is_chosen_by_program_name() {
        assert_eq!(TtsFlavor::for_program("say"), TtsFlavor::Say);
        assert_eq!(TtsFlavor::for_program("/usr/bin/espeak-ng"), TtsFlavor::Espeak);
        assert_eq!(TtsFlavor::for_program("festival"), TtsFlavor::Plain);
    }

    #[test]
    fn espeak_args_carry_rate_pitch_and_volume() {
        let synth = CommandSynthesizer::from_command_line("espeak-ng -z").unwrap();
        let args = synth.args_for(&utterance());
        assert_eq!(
            args,
            vec!["-z", "-s", "140", "-p", "50", "-a", "50", "-v", "en-us", "breathe in"]
        );
    }

    #[test]
    fn say_args_carry_rate_only() {
        let synth = CommandSynthesizer::from_command_line("say").unwrap();
        assert_eq!(synth.args_for(&utterance()), vec!["-r", "140", "breathe in"]);
    }

    #[test]
    fn blank_command_is_a_config_error() {
        assert!(matches!(
            CommandSynthesizer::from_command_line("  "),
            Err(AletheiaError::Config(_))
        ));
    }

    #[tokio::test]
    async fn canceled_before_start_is_not_spoken() {
        let synth = CommandSynthesizer::from_command_line("definitely-not-a-real-program-4242").unwrap();
        synth.pause().await.unwrap();
        let u = utterance();
        let speak = synth.speak(&u);
        let cancel = async {
            tokio::task::yield_now().await;
            synth.cancel().await.unwrap();
        };
        let (outcome, ()) = tokio::join!(speak, cancel);
        assert_eq!(outcome.unwrap(), SpeechOutcome::Canceled);
    }

    #[tokio::test]
    async fn missing_program_is_unsupported() {
        let synth = CommandSynthesizer::from_command_line("definitely-not-a-real-program-4242").unwrap();
        assert!(matches!(
            synth.speak(&utterance()).await,
            Err(AletheiaError::Unsupported(_))
        ));
    }
}
