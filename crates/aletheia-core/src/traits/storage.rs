// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the per-user record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AletheiaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ChatMessage, ConversationSummary, EmotionRecord, JournalEntry, MeditationSession, UserId,
};

/// Adapter for the record store.
///
/// Every query is scoped to one owning user; implementations never return
/// another user's rows. Records are insert-only except for journal deletes
/// and the bulk chat clear.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), AletheiaError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), AletheiaError>;

    // --- Emotion records ---

    async fn insert_emotion_record(&self, record: &EmotionRecord) -> Result<(), AletheiaError>;

    /// Most recent records first, at most `limit`.
    async fn recent_emotion_records(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<EmotionRecord>, AletheiaError>;

    /// Records created at or after `since`, most recent first.
    async fn emotion_records_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<EmotionRecord>, AletheiaError>;

    // --- Chat ---

    async fn insert_chat_message(&self, message: &ChatMessage) -> Result<(), AletheiaError>;

    /// The full history in creation order.
    async fn chat_history(&self, user_id: &UserId) -> Result<Vec<ChatMessage>, AletheiaError>;

    /// Deletes every message for the user. Returns the number removed.
    async fn clear_chat_history(&self, user_id: &UserId) -> Result<usize, AletheiaError>;

    // --- Conversation summaries ---

    async fn insert_conversation_summary(
        &self,
        summary: &ConversationSummary,
    ) -> Result<(), AletheiaError>;

    async fn recent_conversation_summaries(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, AletheiaError>;

    // --- Journal ---

    async fn insert_journal_entry(&self, entry: &JournalEntry) -> Result<(), AletheiaError>;

    /// Entries newest first; `limit` of `None` returns all.
    async fn list_journal_entries(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<JournalEntry>, AletheiaError>;

    /// Deletes one entry owned by the user. Returns whether a row was removed.
    async fn delete_journal_entry(&self, user_id: &UserId, id: &str)
    -> Result<bool, AletheiaError>;

    // --- Meditation ---

    async fn insert_meditation_session(
        &self,
        session: &MeditationSession,
    ) -> Result<(), AletheiaError>;

    /// Sessions newest first.
    async fn list_meditation_sessions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MeditationSession>, AletheiaError>;
}
