// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite storage adapter.

use std::time::Duration;

use aletheia_bus::{ChangeFeed, ChangeKind, Table};
use aletheia_config::model::StorageConfig;
use aletheia_core::types::{
    ChatMessage, ConversationSummary, EmotionRecord, JournalEntry, MeditationSession,
    MeditationType, Role, new_id,
};
use aletheia_core::{Emotion, StorageAdapter, UserId};
use aletheia_storage::SqliteStorage;
use chrono::Utc;
use tempfile::TempDir;

async fn open() -> (SqliteStorage, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("aletheia.db").to_str().unwrap().to_string(),
        wal_mode: true,
    };
    let storage = SqliteStorage::with_feed(config, ChangeFeed::new(16));
    storage.initialize().await.unwrap();
    (storage, dir)
}

fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

fn record(user_id: &UserId, emotion: Emotion) -> EmotionRecord {
    EmotionRecord {
        id: new_id(),
        user_id: user_id.clone(),
        emotion,
        intensity: 0.6,
        text: "today".into(),
        summary: "s".into(),
        quote: "q".into(),
        song: "song".into(),
        suggestion: emotion.suggestion(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn records_are_scoped_to_their_owner() {
    let (storage, _dir) = open().await;
    let alice = user("alice");
    let bob = user("bob");

    storage.insert_emotion_record(&record(&alice, Emotion::Happy)).await.unwrap();
    storage.insert_emotion_record(&record(&bob, Emotion::Sad)).await.unwrap();
    storage
        .insert_chat_message(&ChatMessage::new(alice.clone(), Role::User, "hi"))
        .await
        .unwrap();

    let alice_records = storage.recent_emotion_records(&alice, 10).await.unwrap();
    assert_eq!(alice_records.len(), 1);
    assert_eq!(alice_records[0].emotion, Emotion::Happy);
    assert!(storage.chat_history(&bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn clearing_history_leaves_other_users_alone() {
    let (storage, _dir) = open().await;
    let alice = user("alice");
    let bob = user("bob");
    for content in ["one", "two"] {
        storage
            .insert_chat_message(&ChatMessage::new(alice.clone(), Role::User, content))
            .await
            .unwrap();
    }
    storage
        .insert_chat_message(&ChatMessage::new(bob.clone(), Role::User, "bob's"))
        .await
        .unwrap();

    assert_eq!(storage.clear_chat_history(&alice).await.unwrap(), 2);
    assert!(storage.chat_history(&alice).await.unwrap().is_empty());
    assert_eq!(storage.chat_history(&bob).await.unwrap().len(), 1);
}

#[tokio::test]
async fn journal_delete_requires_matching_owner() {
    let (storage, _dir) = open().await;
    let alice = user("alice");
    let entry = JournalEntry {
        id: new_id(),
        user_id: alice.clone(),
        title: "Morning".into(),
        content: "Slept well".into(),
        emotion: Some(Emotion::Calm),
        intensity: 0.4,
        created_at: Utc::now(),
    };
    storage.insert_journal_entry(&entry).await.unwrap();

    assert!(!storage.delete_journal_entry(&user("mallory"), &entry.id).await.unwrap());
    assert_eq!(storage.list_journal_entries(&alice, None).await.unwrap().len(), 1);
    assert!(storage.delete_journal_entry(&alice, &entry.id).await.unwrap());
    assert!(storage.list_journal_entries(&alice, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn summaries_and_sessions_round_trip() {
    let (storage, _dir) = open().await;
    let alice = user("alice");
    let summary = ConversationSummary {
        id: new_id(),
        user_id: alice.clone(),
        dominant_emotion: "anxious".into(),
        key_topics: vec!["work".into(), "sleep".into()],
        worries: vec!["deadline".into()],
        reflective_suggestions: "Notice the pattern.".into(),
        positive_reinforcement: "You showed up.".into(),
        recommended_next_steps: vec!["walk".into()],
        created_at: Utc::now(),
    };
    storage.insert_conversation_summary(&summary).await.unwrap();
    let loaded = storage.recent_conversation_summaries(&alice, 5).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].key_topics, summary.key_topics);
    assert_eq!(loaded[0].worries, summary.worries);
    assert_eq!(loaded[0].recommended_next_steps, summary.recommended_next_steps);

    let session = MeditationSession {
        id: new_id(),
        user_id: alice.clone(),
        meditation_type: MeditationType::Sleep,
        duration_minutes: 10,
        emotion_before: None,
        emotion_after: "peaceful".into(),
        ai_summary: None,
        completed_at: Utc::now(),
    };
    storage.insert_meditation_session(&session).await.unwrap();
    let sessions = storage.list_meditation_sessions(&alice).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].meditation_type, MeditationType::Sleep);
    assert_eq!(sessions[0].emotion_before, None);
}

#[tokio::test]
async fn writes_are_announced_on_the_feed() {
    let (storage, _dir) = open().await;
    let alice = user("alice");
    let mut sub = storage.feed().subscribe(alice.clone(), &[Table::ChatMessages]);

    // Other tables are filtered out.
    storage.insert_emotion_record(&record(&alice, Emotion::Calm)).await.unwrap();
    storage
        .insert_chat_message(&ChatMessage::new(alice.clone(), Role::User, "hello"))
        .await
        .unwrap();
    storage.clear_chat_history(&alice).await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(1), sub.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.table, Table::ChatMessages);
    assert_eq!(first.kind, ChangeKind::Insert);

    let second = tokio::time::timeout(Duration::from_secs(1), sub.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second.kind, ChangeKind::Delete);
    assert_eq!(second.row_id, None);
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("nested/db.sqlite").to_str().unwrap().to_string(),
        wal_mode: true,
    };
    let alice = user("alice");
    {
        let storage = SqliteStorage::new(config.clone());
        storage.initialize().await.unwrap();
        storage.insert_emotion_record(&record(&alice, Emotion::Excited)).await.unwrap();
        storage.close().await.unwrap();
    }
    let storage = SqliteStorage::new(config);
    storage.initialize().await.unwrap();
    let records = storage.recent_emotion_records(&alice, 1).await.unwrap();
    assert_eq!(records[0].emotion, Emotion::Excited);
}
