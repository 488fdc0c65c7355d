// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aletheia chat` command implementation.
//!
//! An interactive REPL with a colored prompt and readline history. Every
//! turn is persisted through the conversation controller, so the history
//! survives between invocations until `/clear`.

use aletheia_core::AletheiaError;
use aletheia_core::types::Role;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use crate::app::App;

/// How many earlier messages are echoed when the shell opens.
const SCROLLBACK: usize = 6;

pub async fn run_chat(app: &App) -> Result<(), AletheiaError> {
    let chat = app.conversation();
    let persona = chat.persona().to_string();
    let loaded = chat.load_history().await?;
    info!(messages = loaded, "chat history loaded");

    let mut rl = DefaultEditor::new()
        .map_err(|e| AletheiaError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", format!("Talk with {persona}").bold().magenta());
    println!(
        "Type {} to exit, {} to erase the conversation.\n",
        "/quit".yellow(),
        "/clear".yellow()
    );

    let history = chat.history().await;
    for message in history.iter().skip(history.len().saturating_sub(SCROLLBACK)) {
        print_message(&persona, message.role, &message.content);
    }

    let prompt = format!("{}> ", "you".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "" => continue,
                    "/quit" | "/exit" => break,
                    "/clear" => {
                        let removed = chat.clear().await?;
                        println!("{}", format!("cleared {removed} messages").dimmed());
                        continue;
                    }
                    _ => {}
                }
                let _ = rl.add_history_entry(&line);

                match chat.send(trimmed).await {
                    Ok(turn) => print_message(&persona, Role::Assistant, &turn.assistant.content),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    println!("{}", "take care".dimmed());
    Ok(())
}

fn print_message(persona: &str, role: Role, content: &str) {
    match role {
        Role::User => println!("{} {content}", "you:".green()),
        Role::Assistant => println!("{} {content}\n", format!("{persona}:").magenta().bold()),
    }
}
