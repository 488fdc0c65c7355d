// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`StorageAdapter`].

use aletheia_bus::{ChangeEvent, ChangeFeed, Table};
use aletheia_config::model::StorageConfig;
use aletheia_core::types::{
    AdapterType, ChatMessage, ConversationSummary, EmotionRecord, HealthStatus, JournalEntry,
    MeditationSession, UserId,
};
use aletheia_core::{AletheiaError, PluginAdapter, StorageAdapter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed record store.
///
/// The database is opened by [`StorageAdapter::initialize`]. Every
/// successful write is announced on the attached [`ChangeFeed`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
    feed: ChangeFeed,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self::with_feed(config, ChangeFeed::default())
    }

    /// Publishes change events on `feed` instead of a private one.
    pub fn with_feed(config: StorageConfig, feed: ChangeFeed) -> Self {
        Self {
            config,
            db: OnceCell::new(),
            feed,
        }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    fn db(&self) -> Result<&Database, AletheiaError> {
        self.db.get().ok_or_else(|| AletheiaError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    fn announce(&self, event: ChangeEvent) {
        let delivered = self.feed.publish(event);
        debug!(delivered, "change announced");
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, AletheiaError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("SELECT 1", [], |_| Ok(()))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AletheiaError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), AletheiaError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| AletheiaError::Storage {
            source: "storage already initialized".into(),
        })?;
        info!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), AletheiaError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Emotion records ---

    async fn insert_emotion_record(&self, record: &EmotionRecord) -> Result<(), AletheiaError> {
        queries::emotions::insert(self.db()?, record).await?;
        self.announce(ChangeEvent::insert(
            Table::EmotionRecords,
            record.user_id.clone(),
            &record.id,
        ));
        Ok(())
    }

    async fn recent_emotion_records(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<EmotionRecord>, AletheiaError> {
        queries::emotions::recent(self.db()?, user_id, limit).await
    }

    async fn emotion_records_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<EmotionRecord>, AletheiaError> {
        queries::emotions::since(self.db()?, user_id, since).await
    }

    // --- Chat ---

    async fn insert_chat_message(&self, message: &ChatMessage) -> Result<(), AletheiaError> {
        queries::messages::insert(self.db()?, message).await?;
        self.announce(ChangeEvent::insert(
            Table::ChatMessages,
            message.user_id.clone(),
            &message.id,
        ));
        Ok(())
    }

    async fn chat_history(&self, user_id: &UserId) -> Result<Vec<ChatMessage>, AletheiaError> {
        queries::messages::history(self.db()?, user_id).await
    }

    async fn clear_chat_history(&self, user_id: &UserId) -> Result<usize, AletheiaError> {
        let removed = queries::messages::clear(self.db()?, user_id).await?;
        info!(user_id = %user_id, removed, "chat history cleared");
        self.announce(ChangeEvent::bulk_delete(Table::ChatMessages, user_id.clone()));
        Ok(removed)
    }

    // --- Conversation summaries ---

    async fn insert_conversation_summary(
        &self,
        summary: &ConversationSummary,
    ) -> Result<(), AletheiaError> {
        queries::summaries::insert(self.db()?, summary).await?;
        self.announce(ChangeEvent::insert(
            Table::ConversationSummaries,
            summary.user_id.clone(),
            &summary.id,
        ));
        Ok(())
    }

    async fn recent_conversation_summaries(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, AletheiaError> {
        queries::summaries::recent(self.db()?, user_id, limit).await
    }

    // --- Journal ---

    async fn insert_journal_entry(&self, entry: &JournalEntry) -> Result<(), AletheiaError> {
        queries::journal::insert(self.db()?, entry).await?;
        self.announce(ChangeEvent::insert(
            Table::JournalEntries,
            entry.user_id.clone(),
            &entry.id,
        ));
        Ok(())
    }

    async fn list_journal_entries(
        &self,
        user_id: &UserId,
        limit: Option<usize>,
    ) -> Result<Vec<JournalEntry>, AletheiaError> {
        queries::journal::list(self.db()?, user_id, limit).await
    }

    async fn delete_journal_entry(
        &self,
        user_id: &UserId,
        id: &str,
    ) -> Result<bool, AletheiaError> {
        let removed = queries::journal::delete(self.db()?, user_id, id).await?;
        if removed {
            self.announce(ChangeEvent::delete(
                Table::JournalEntries,
                user_id.clone(),
                id,
            ));
        }
        Ok(removed)
    }

    // --- Meditation ---

    async fn insert_meditation_session(
        &self,
        session: &MeditationSession,
    ) -> Result<(), AletheiaError> {
        queries::meditations::insert(self.db()?, session).await?;
        self.announce(ChangeEvent::insert(
            Table::MeditationSessions,
            session.user_id.clone(),
            &session.id,
        ));
        Ok(())
    }

    async fn list_meditation_sessions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<MeditationSession>, AletheiaError> {
        queries::meditations::list(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn plugin_metadata() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir.path().join("x.db")));
        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir.path().join("x.db")));
        assert!(storage.health_check().await.is_err());
        assert!(storage.chat_history(&UserId("u".into())).await.is_err());
    }

    #[tokio::test]
    async fn initialize_twice_is_an_error() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(config(&dir.path().join("x.db")));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.shutdown().await.unwrap();
    }
}
