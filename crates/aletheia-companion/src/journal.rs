// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user's journal.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use aletheia_core::emotion::{DEFAULT_INTENSITY, clamp_intensity};
use aletheia_core::types::{JournalEntry, new_id};
use aletheia_core::{AletheiaError, Emotion, SessionContext, StorageAdapter};
use aletheia_voice::VoiceIo;
use chrono::{TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::conversation::{ChatTurn, ConversationSession};

/// A journal entry being written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JournalDraft {
    pub title: String,
    pub content: String,
    pub emotion: Option<Emotion>,
    /// Defaults to 0.5 when absent.
    pub intensity: Option<f64>,
}

/// Saying this on its own ends a dictation.
pub const END_DICTATION: &str = "done";

pub struct JournalService {
    session: SessionContext,
    storage: Arc<dyn StorageAdapter>,
}

impl JournalService {
    pub fn new(session: SessionContext, storage: Arc<dyn StorageAdapter>) -> Self {
        Self { session, storage }
    }

    /// Saves a draft. Title and content are both required.
    pub async fn create(&self, draft: JournalDraft) -> Result<JournalEntry, AletheiaError> {
        let title = draft.title.trim();
        let content = draft.content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(AletheiaError::Validation(
                "Please fill in title and content".into(),
            ));
        }
        let entry = JournalEntry {
            id: new_id(),
            user_id: self.session.user_id()?,
            title: title.to_string(),
            content: content.to_string(),
            emotion: draft.emotion,
            intensity: draft
                .intensity
                .map_or(DEFAULT_INTENSITY, |v| clamp_intensity(Some(v))),
            created_at: Utc::now(),
        };
        self.storage.insert_journal_entry(&entry).await?;
        info!(entry_id = %entry.id, "journal entry saved");
        Ok(entry)
    }

    /// Listens continuously and joins what was heard into entry content.
    ///
    /// Ends when [`END_DICTATION`] is heard, when recognition ends, or when
    /// `cancel` fires. Each utterance becomes one line.
    pub async fn dictate(
        &self,
        voice: &VoiceIo,
        relisten: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, AletheiaError> {
        let mut listener = voice.listen_continuous(relisten)?;
        let mut lines = Vec::new();
        loop {
            let heard = tokio::select! {
                _ = cancel.cancelled() => break,
                heard = listener.next() => heard,
            };
            match heard {
                Some(text) if text.eq_ignore_ascii_case(END_DICTATION) => break,
                Some(text) => lines.push(text),
                None => break,
            }
        }
        listener.stop().await?;
        debug!(lines = lines.len(), "dictation finished");
        Ok(lines.join("\n"))
    }

    /// Entries newest first, optionally capped.
    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<JournalEntry>, AletheiaError> {
        let user_id = self.session.user_id()?;
        self.storage.list_journal_entries(&user_id, limit).await
    }

    /// Deletes one of the user's entries. `false` if no such entry exists.
    pub async fn delete(&self, id: &str) -> Result<bool, AletheiaError> {
        let user_id = self.session.user_id()?;
        let removed = self.storage.delete_journal_entry(&user_id, id).await?;
        if removed {
            info!(entry_id = id, "journal entry deleted");
        }
        Ok(removed)
    }

    /// Opens a conversation about `entry`.
    pub async fn discuss<Tz>(
        &self,
        entry: &JournalEntry,
        tz: &Tz,
        chat: &ConversationSession,
    ) -> Result<ChatTurn, AletheiaError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        chat.send(&discuss_message(entry, tz)).await
    }
}

/// The opening message used to talk about a journal entry.
pub fn discuss_message<Tz>(entry: &JournalEntry, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let date = entry.created_at.with_timezone(tz).format("%-m/%-d/%Y");
    let mut message = format!(
        "I'd like to discuss my journal entry from {date}. The entry says: \"{}\"",
        entry.content
    );
    match entry.emotion {
        Some(emotion) => message.push_str(&format!(" and I was feeling {emotion}.")),
        None => message.push('.'),
    }
    message
}
