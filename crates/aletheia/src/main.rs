// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aletheia - a terminal companion for emotional wellness.
//!
//! This is the binary entry point: it loads configuration, wires the
//! adapters and dispatches to one command.

mod app;
mod commands;
mod doctor;
mod meditate;
mod shell;
mod voice;

use std::path::PathBuf;

use aletheia_companion::shutdown;
use aletheia_config::model::AletheiaConfig;
use aletheia_core::types::MeditationType;
use aletheia_core::{AletheiaError, Emotion};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::app::App;

/// Aletheia - a terminal companion for emotional wellness.
#[derive(Parser, Debug)]
#[command(name = "aletheia", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze how a piece of text feels.
    Analyze {
        text: Option<String>,
        /// Capture the text as one spoken utterance instead.
        #[arg(long, conflicts_with = "text")]
        listen: bool,
        /// Also save the analysis to the journal under this title.
        #[arg(long, value_name = "TITLE")]
        save_as: Option<String>,
    },
    /// Chat with the companion.
    Chat,
    /// Hands-free conversation; a summary is saved when it ends.
    Voice,
    /// Write, read and discuss journal entries.
    Journal {
        #[command(subcommand)]
        action: JournalAction,
    },
    /// Start a guided meditation (calm, stress, sleep, gratitude, anxiety).
    Meditate { kind: MeditationType },
    /// Suggest a meditation based on recent moods.
    Recommend,
    /// Totals, weekly activity and recent entries.
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Mood heatmap for the last 30 days.
    Calendar,
    /// Meditation statistics.
    History,
    /// Erase the whole chat history.
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Check configuration, storage and voice backends.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Subcommand, Debug)]
enum JournalAction {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, required_unless_present = "dictate")]
        content: Option<String>,
        /// Speak the content instead; say "done" to finish.
        #[arg(long, conflicts_with = "content")]
        dictate: bool,
        #[arg(long)]
        emotion: Option<Emotion>,
        /// Between 0 and 1; defaults to 0.5.
        #[arg(long)]
        intensity: Option<f64>,
    },
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Delete by id or a unique id prefix.
    Delete { id: String },
    /// Send an entry to the companion to talk it through.
    Discuss { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => aletheia_config::load_and_validate_path(path),
        None => aletheia_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            aletheia_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.app.log_level);

    match run(cli.command, config).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            std::process::exit(1);
        }
    }
}

/// Runs one command. `Ok(false)` means it finished but reported failure.
async fn run(command: Commands, config: AletheiaConfig) -> Result<bool, AletheiaError> {
    if let Commands::Doctor { plain } = command {
        return doctor::run_doctor(&config, plain).await;
    }

    let app = App::init(config).await?;
    let result = dispatch(&app, command).await;
    app.shutdown().await?;
    result.map(|()| true)
}

async fn dispatch(app: &App, command: Commands) -> Result<(), AletheiaError> {
    match command {
        Commands::Analyze {
            text,
            listen,
            save_as,
        } => commands::analyze(app, text, listen, save_as).await,
        Commands::Chat => shell::run_chat(app).await,
        Commands::Voice => voice::run_voice(app, shutdown::install_signal_handler()).await,
        Commands::Journal { action } => match action {
            JournalAction::Add {
                title,
                content,
                dictate,
                emotion,
                intensity,
            } => {
                let content = match content {
                    Some(content) if !dictate => content,
                    _ => commands::dictate(app, shutdown::install_signal_handler()).await?,
                };
                commands::journal_add(app, title, content, emotion, intensity).await
            }
            JournalAction::List { limit } => commands::journal_list(app, limit).await,
            JournalAction::Delete { id } => commands::journal_delete(app, &id).await,
            JournalAction::Discuss { id } => commands::journal_discuss(app, &id).await,
        },
        Commands::Meditate { kind } => {
            meditate::run_meditation(app, kind, shutdown::install_signal_handler()).await
        }
        Commands::Recommend => commands::recommend(app).await,
        Commands::Dashboard { json } => commands::dashboard(app, json).await,
        Commands::Calendar => commands::calendar(app).await,
        Commands::History => commands::history(app).await,
        Commands::Clear { yes } => commands::clear(app, yes).await,
        Commands::Doctor { .. } => Ok(()),
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aletheia={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
