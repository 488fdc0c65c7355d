// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aletheia meditate` command: narrated guided meditation with live
//! controls read from stdin.

use aletheia_companion::MeditationExit;
use aletheia_core::AletheiaError;
use aletheia_core::types::MeditationType;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::app::App;

/// A live control typed during narration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Pause,
    Resume,
    Volume(f32),
    Stop,
}

/// Parses `p`, `r`, `s` or `v <0-100>`.
pub fn parse_control(line: &str) -> Option<Control> {
    let mut parts = line.split_whitespace();
    let control = match parts.next()? {
        "p" | "pause" => Control::Pause,
        "r" | "resume" => Control::Resume,
        "s" | "stop" | "end" => Control::Stop,
        "v" | "volume" => {
            let percent: f32 = parts.next()?.parse().ok()?;
            Control::Volume((percent / 100.0).clamp(0.0, 1.0))
        }
        _ => return None,
    };
    Some(control)
}

pub async fn run_meditation(
    app: &App,
    kind: MeditationType,
    cancel: CancellationToken,
) -> Result<(), AletheiaError> {
    let controller = app.meditation();

    println!(
        "{} {} ({} min)",
        kind.emoji(),
        kind.label().bold().magenta(),
        kind.duration_minutes()
    );
    println!("{}", "preparing your meditation...".dimmed());
    let start = controller.start(kind).await?;
    if let Some(before) = start.emotion_before {
        println!("{}", format!("you came in feeling {before}").dimmed());
    }
    println!(
        "{}\n",
        "controls: p pause, r resume, v <0-100> volume, s end session".dimmed()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut interrupted = false;
    let finished = controller.finished();
    tokio::pin!(finished);

    let exit = loop {
        tokio::select! {
            exit = &mut finished => break exit?,
            _ = cancel.cancelled(), if !interrupted => {
                interrupted = true;
                controller.stop().await?;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_control(&line) {
                    Some(Control::Pause) => {
                        controller.pause().await?;
                        println!("{}", "paused".dimmed());
                    }
                    Some(Control::Resume) => {
                        controller.resume().await?;
                        println!("{}", "resumed".dimmed());
                    }
                    Some(Control::Volume(v)) => {
                        controller.set_volume(v).await?;
                        println!("{}", format!("volume {:.0}%", v * 100.0).dimmed());
                    }
                    Some(Control::Stop) => {
                        controller.stop().await?;
                    }
                    None => {
                        if !line.trim().is_empty() {
                            println!("{}", "unknown control".yellow());
                        }
                    }
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!(error = %e, "stdin closed");
                    stdin_open = false;
                }
            },
        }
    };

    match exit {
        MeditationExit::Completed(session) => {
            println!("\n{}", "Session complete".bold().green());
            println!("  {} minutes of {}", session.duration_minutes, kind.label());
            if let Some(summary) = session.ai_summary {
                println!("  {summary}");
            }
        }
        MeditationExit::Stopped => {
            println!("\n{}", "session ended early, nothing was saved".dimmed());
        }
    }
    Ok(())
}
