// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Looping background audio through an external player command.
//!
//! The player is expected to loop the track itself (for example
//! `mpv --loop=inf --no-video`). A `{volume}` placeholder in the command is
//! replaced by the volume as a 0-100 integer, and the player is restarted
//! when the volume changes. Without a command the player only tracks state.

use std::process::Stdio;

use aletheia_core::{AletheiaError, AmbientAudio};
use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::split_command;

const VOLUME_PLACEHOLDER: &str = "{volume}";

#[derive(Debug, Default)]
struct PlayerState {
    track: Option<String>,
    volume: f32,
    paused: bool,
    child: Option<Child>,
}

pub struct CommandPlayer {
    command: Option<(String, Vec<String>)>,
    state: Mutex<PlayerState>,
}

impl CommandPlayer {
    pub fn new(command: Option<&str>) -> Self {
        Self {
            command: command.and_then(split_command),
            state: Mutex::new(PlayerState::default()),
        }
    }

    /// A player that plays nothing.
    pub fn silent() -> Self {
        Self::new(None)
    }

    pub fn is_silent(&self) -> bool {
        self.command.is_none()
    }

    /// Current track and volume, if a track is loaded.
    pub async fn now_playing(&self) -> Option<(String, f32)> {
        let state = self.state.lock().await;
        state.track.clone().map(|t| (t, state.volume))
    }

    pub async fn is_paused(&self) -> bool {
        self.state.lock().await.paused
    }

    fn args_for(&self, track: &str, volume: f32) -> Vec<String> {
        let level = (volume.clamp(0.0, 1.0) * 100.0).round().to_string();
        let mut args: Vec<String> = self
            .command
            .iter()
            .flat_map(|(_, args)| args.iter())
            .map(|arg| arg.replace(VOLUME_PLACEHOLDER, &level))
            .collect();
        args.push(track.to_string());
        args
    }

    fn volume_sensitive(&self) -> bool {
        self.command
            .as_ref()
            .is_some_and(|(_, args)| args.iter().any(|a| a.contains(VOLUME_PLACEHOLDER)))
    }

    fn spawn(&self, state: &mut PlayerState) -> Result<(), AletheiaError> {
        let (Some((program, _)), Some(track)) = (&self.command, &state.track) else {
            return Ok(());
        };
        let child = Command::new(program)
            .args(self.args_for(track, state.volume))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AletheiaError::Unsupported(format!("cannot run `{program}`: {e}")))?;
        state.child = Some(child);
        Ok(())
    }

    async fn kill(state: &mut PlayerState) {
        if let Some(mut child) = state.child.take() {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to stop audio player");
            }
        }
    }
}

#[async_trait]
impl AmbientAudio for CommandPlayer {
    async fn play_loop(&self, track: &str, volume: f32) -> Result<(), AletheiaError> {
        let mut state = self.state.lock().await;
        Self::kill(&mut state).await;
        state.track = Some(track.to_string());
        state.volume = volume.clamp(0.0, 1.0);
        state.paused = false;
        debug!(track, volume = state.volume, "background audio started");
        self.spawn(&mut state)
    }

    async fn pause(&self) -> Result<(), AletheiaError> {
        let mut state = self.state.lock().await;
        if state.track.is_some() && !state.paused {
            Self::kill(&mut state).await;
            state.paused = true;
        }
        Ok(())
    }

    async fn resume(&self) -> Result<(), AletheiaError> {
        let mut state = self.state.lock().await;
        if state.paused {
            state.paused = false;
            self.spawn(&mut state)?;
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), AletheiaError> {
        let mut state = self.state.lock().await;
        Self::kill(&mut state).await;
        state.track = None;
        state.paused = false;
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<(), AletheiaError> {
        let mut state = self.state.lock().await;
        state.volume = volume.clamp(0.0, 1.0);
        if state.child.is_some() && self.volume_sensitive() {
            Self::kill(&mut state).await;
            self.spawn(&mut state)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_placeholder_is_substituted() {
        let player = CommandPlayer::new(Some("mpv --loop=inf --volume={volume}"));
        assert_eq!(
            player.args_for("rain.mp3", 0.15),
            vec!["--loop=inf", "--volume=15", "rain.mp3"]
        );
        assert!(player.volume_sensitive());
    }

    #[tokio::test]
    async fn silent_player_tracks_state() {
        let player = CommandPlayer::silent();
        player.play_loop("rain.mp3", 0.15).await.unwrap();
        assert_eq!(player.now_playing().await, Some(("rain.mp3".to_string(), 0.15)));

        player.pause().await.unwrap();
        assert!(player.is_paused().await);
        player.resume().await.unwrap();
        assert!(!player.is_paused().await);

        player.set_volume(0.3).await.unwrap();
        assert_eq!(player.now_playing().await.unwrap().1, 0.3);

        player.stop().await.unwrap();
        assert_eq!(player.now_playing().await, None);
    }
}
