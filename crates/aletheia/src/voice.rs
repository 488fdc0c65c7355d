// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aletheia voice` command: hands-free turn-taking with the companion.
//!
//! Recognition reads one line of stdin per utterance. Ctrl-D or Ctrl-C ends
//! the session, after which a summary is generated if anything was said.

use aletheia_companion::VoiceEvent;
use aletheia_core::AletheiaError;
use aletheia_core::types::ConversationSummary;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use crate::app::App;

pub async fn run_voice(app: &App, cancel: CancellationToken) -> Result<(), AletheiaError> {
    let voice = app.voice_conversation();
    let persona = app.config.chat.persona_name.clone();

    let mut events = voice.start().await?;
    println!("{}", "Voice mode".bold().magenta());
    println!("{}\n", "Speak one line at a time. Ctrl-D ends the session.".dimmed());

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            event = events.recv() => match event {
                Some(VoiceEvent::Heard(text)) => println!("{} {text}", "you:".green()),
                Some(VoiceEvent::Replied(text)) => {
                    println!("{} {text}", format!("{persona}:").magenta().bold());
                }
                Some(VoiceEvent::Notice(notice)) => eprintln!("{}: {notice}", "notice".yellow()),
                Some(VoiceEvent::InputClosed) | None => break,
            },
        }
    }

    println!("{}", "ending voice session...".dimmed());
    match voice.end().await? {
        Some(summary) => print_summary(&summary),
        None => println!("{}", "nothing was said, no summary saved".dimmed()),
    }
    Ok(())
}

fn print_summary(summary: &ConversationSummary) {
    println!("\n{}", "Session summary".bold());
    println!("  {} {}", "mood:".bold(), summary.dominant_emotion);
    print_list("topics", &summary.key_topics);
    print_list("worries", &summary.worries);
    if !summary.reflective_suggestions.is_empty() {
        println!("  {} {}", "reflect:".bold(), summary.reflective_suggestions);
    }
    if !summary.positive_reinforcement.is_empty() {
        println!("  {}", summary.positive_reinforcement.green());
    }
    print_list("next steps", &summary.recommended_next_steps);
}

fn print_list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {}", format!("{label}:").bold());
    for item in items {
        println!("    - {item}");
    }
}
