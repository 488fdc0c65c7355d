// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change event types.

use aletheia_core::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A persisted collection that emits change events.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Table {
    EmotionRecords,
    ChatMessages,
    ConversationSummaries,
    JournalEntries,
    MeditationSessions,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Insert,
    Delete,
}

/// One row-level (or bulk) change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub id: String,
    pub table: Table,
    pub kind: ChangeKind,
    pub user_id: UserId,
    /// The affected row, or `None` for a bulk delete.
    pub row_id: Option<String>,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    fn new(table: Table, kind: ChangeKind, user_id: UserId, row_id: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            table,
            kind,
            user_id,
            row_id,
            at: Utc::now(),
        }
    }

    pub fn insert(table: Table, user_id: UserId, row_id: impl Into<String>) -> Self {
        Self::new(table, ChangeKind::Insert, user_id, Some(row_id.into()))
    }

    pub fn delete(table: Table, user_id: UserId, row_id: impl Into<String>) -> Self {
        Self::new(table, ChangeKind::Delete, user_id, Some(row_id.into()))
    }

    pub fn bulk_delete(table: Table, user_id: UserId) -> Self {
        Self::new(table, ChangeKind::Delete, user_id, None)
    }
}
