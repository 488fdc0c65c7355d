// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: analysis, journal, recommendation and the read-only
//! views.

use std::time::Duration;

use aletheia_companion::{END_DICTATION, JournalDraft};
use aletheia_core::types::JournalEntry;
use aletheia_core::{AletheiaError, Emotion};
use aletheia_insights::{DashboardStats, MeditationStats, MoodDay};
use chrono::Local;
use colored::Colorize;
use tokio_util::sync::CancellationToken;

use crate::app::App;

pub async fn analyze(
    app: &App,
    text: Option<String>,
    listen: bool,
    save_as: Option<String>,
) -> Result<(), AletheiaError> {
    let service = app.analysis();
    let text = if listen {
        println!("{}", "listening... (type what you would say)".dimmed());
        service
            .capture(&app.voice)
            .await?
            .ok_or_else(|| AletheiaError::Validation("Nothing was heard".into()))?
    } else {
        text.unwrap_or_default()
    };

    let outcome = service.analyze(&text).await?;
    let a = &outcome.analysis;
    println!(
        "\n{} {} {}",
        a.emoji,
        a.emotion.to_string().bold(),
        format!("({:.0}% intensity)", a.intensity * 100.0).dimmed()
    );
    println!("  {}", a.summary);
    println!("  {} \"{}\"", "quote:".bold(), a.quote);
    println!("  {} {}", "song:".bold(), a.song);
    println!("  {}", a.suggestion.green());

    if let Some(title) = save_as {
        let draft = JournalDraft {
            title,
            ..outcome.journal_draft()
        };
        let entry = app.journal().create(draft).await?;
        println!("{}", format!("saved to journal as {}", short_id(&entry.id)).dimmed());
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Takes journal content from continuous listening.
pub async fn dictate(app: &App, cancel: CancellationToken) -> Result<String, AletheiaError> {
    println!(
        "{}",
        format!("dictating... say \"{END_DICTATION}\" on its own to finish").dimmed()
    );
    let relisten = Duration::from_millis(app.config.chat.relisten_delay_ms);
    app.journal().dictate(&app.voice, relisten, &cancel).await
}

pub async fn journal_add(
    app: &App,
    title: String,
    content: String,
    emotion: Option<Emotion>,
    intensity: Option<f64>,
) -> Result<(), AletheiaError> {
    let entry = app
        .journal()
        .create(JournalDraft {
            title,
            content,
            emotion,
            intensity,
        })
        .await?;
    println!("saved {}", short_id(&entry.id).bold());
    Ok(())
}

pub async fn journal_list(app: &App, limit: Option<usize>) -> Result<(), AletheiaError> {
    let entries = app.journal().list(limit).await?;
    if entries.is_empty() {
        println!("{}", "no journal entries yet".dimmed());
    }
    for entry in &entries {
        let emotion = entry
            .emotion
            .map(|e| format!("{} {e}", e.profile().emoji))
            .unwrap_or_default();
        println!(
            "{}  {}  {}  {}",
            short_id(&entry.id).dimmed(),
            entry.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            entry.title.bold(),
            emotion
        );
        println!("    {}", entry.content);
    }
    Ok(())
}

/// Resolves a full id or a unique prefix of one.
async fn find_entry(app: &App, id: &str) -> Result<JournalEntry, AletheiaError> {
    let mut matches = app
        .journal()
        .list(None)
        .await?
        .into_iter()
        .filter(|e| e.id.starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(entry), None) => Ok(entry),
        (None, _) => Err(AletheiaError::Validation(format!(
            "no journal entry matches `{id}`"
        ))),
        (Some(_), Some(_)) => Err(AletheiaError::Validation(format!(
            "`{id}` matches several entries, use more characters"
        ))),
    }
}

pub async fn journal_delete(app: &App, id: &str) -> Result<(), AletheiaError> {
    let entry = find_entry(app, id).await?;
    if app.journal().delete(&entry.id).await? {
        println!("deleted \"{}\"", entry.title);
    }
    Ok(())
}

pub async fn journal_discuss(app: &App, id: &str) -> Result<(), AletheiaError> {
    let entry = find_entry(app, id).await?;
    let chat = app.conversation();
    chat.load_history().await?;
    let turn = app.journal().discuss(&entry, &Local, &chat).await?;
    println!("{} {}", "you:".green(), turn.user.content);
    println!(
        "{} {}",
        format!("{}:", chat.persona()).magenta().bold(),
        turn.assistant.content
    );
    println!("{}", "continue with `aletheia chat`".dimmed());
    Ok(())
}

pub async fn recommend(app: &App) -> Result<(), AletheiaError> {
    let rec = app.recommender().recommend(chrono::Utc::now()).await?;
    if rec.based_on.is_empty() {
        println!("{}", "no recent analyses, recommending from a neutral start".dimmed());
    }
    println!("{}", rec.text);
    if let Some(kind) = rec.suggested {
        println!(
            "{}",
            format!("start it with `aletheia meditate {kind}`").dimmed()
        );
    }
    Ok(())
}

pub async fn clear(app: &App, confirmed: bool) -> Result<(), AletheiaError> {
    if !confirmed {
        println!("this erases the whole conversation; rerun with --yes to confirm");
        return Ok(());
    }
    let removed = app.conversation().clear().await?;
    println!("cleared {removed} messages");
    Ok(())
}

pub async fn dashboard(app: &App, json: bool) -> Result<(), AletheiaError> {
    let stats = app
        .insights()
        .dashboard(Local::now().date_naive(), &Local)
        .await?;
    if json {
        let out = serde_json::to_string_pretty(&stats)
            .map_err(|e| AletheiaError::Internal(e.to_string()))?;
        println!("{out}");
        return Ok(());
    }
    print_dashboard(&stats);
    Ok(())
}

fn print_dashboard(stats: &DashboardStats) {
    println!("{}", "Overview".bold().magenta());
    println!("  total analyses   {}", stats.total_analyses);
    println!("  most common      {}", stats.most_common_label());
    println!("  this week        {} entries", stats.this_week);

    println!("\n{}", "Last 7 days".bold());
    for day in &stats.activity {
        println!(
            "  {}  {:<12} {}",
            day.date.format("%a"),
            "█".repeat(day.count),
            day.count
        );
    }

    if !stats.distribution.is_empty() {
        println!("\n{}", "Distribution".bold());
        for share in &stats.distribution {
            println!(
                "  {} {:<9} {:>3.0}%",
                share.emotion.profile().emoji,
                share.emotion,
                share.proportion * 100.0
            );
        }
    }

    if !stats.recent_summaries.is_empty() {
        println!("\n{}", "Recent conversations".bold());
        for summary in &stats.recent_summaries {
            println!(
                "  {}  {}  {}",
                summary.created_at.with_timezone(&Local).format("%m/%d"),
                summary.dominant_emotion.bold(),
                summary.key_topics.join(", ")
            );
        }
    }

    if !stats.recent_journal.is_empty() {
        println!("\n{}", "Recent journal".bold());
        for entry in &stats.recent_journal {
            println!(
                "  {}  {}",
                entry.created_at.with_timezone(&Local).format("%m/%d"),
                entry.title
            );
        }
    }
}

pub async fn calendar(app: &App) -> Result<(), AletheiaError> {
    let days = app
        .insights()
        .mood_calendar(Local::now().date_naive(), &Local)
        .await?;
    println!("{}", "Mood, last 30 days".bold().magenta());
    for week in days.chunks(7) {
        let row: Vec<String> = week.iter().map(calendar_cell).collect();
        println!("  {}", row.join(" "));
    }
    Ok(())
}

fn calendar_cell(day: &MoodDay) -> String {
    match day.emotion {
        Some(emotion) => emotion.profile().emoji.to_string(),
        None => "··".dimmed().to_string(),
    }
}

pub async fn history(app: &App) -> Result<(), AletheiaError> {
    let stats = app
        .insights()
        .meditation_history(Local::now().date_naive(), &Local)
        .await?;
    print_history(&stats);
    Ok(())
}

fn print_history(stats: &MeditationStats) {
    println!("{}", "Meditation".bold().magenta());
    println!("  sessions  {}", stats.total_sessions);
    println!("  minutes   {}", stats.total_minutes);
    println!("\n{}", "Last 7 days".bold());
    for day in &stats.weekly {
        println!(
            "  {}  {} sessions, {} min",
            day.date.format("%a"),
            day.sessions,
            day.minutes
        );
    }
    if !stats.by_type.is_empty() {
        println!("\n{}", "By program".bold());
        for (kind, count) in &stats.by_type {
            println!("  {} {:<20} {count}", kind.emoji(), kind.label());
        }
    }
}
