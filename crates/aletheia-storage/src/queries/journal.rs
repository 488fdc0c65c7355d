// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journal entry queries.

use aletheia_core::types::{JournalEntry, UserId, format_timestamp};
use aletheia_core::{AletheiaError, Emotion};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::rows;

fn from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    let emotion: Option<String> = row.get(4)?;
    Ok(JournalEntry {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        title: row.get(2)?,
        content: row.get(3)?,
        emotion: emotion.as_deref().and_then(Emotion::parse),
        intensity: row.get(5)?,
        created_at: rows::timestamp(row, 6)?,
    })
}

pub async fn insert(db: &Database, entry: &JournalEntry) -> Result<(), AletheiaError> {
    let e = entry.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO journal_entries (id, user_id, title, content, emotion, intensity, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    e.id,
                    e.user_id.0,
                    e.title,
                    e.content,
                    e.emotion.map(|em| em.as_str()),
                    e.intensity.clamp(0.0, 1.0),
                    format_timestamp(&e.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Newest first; `None` returns every entry.
pub async fn list(
    db: &Database,
    user_id: &UserId,
    limit: Option<usize>,
) -> Result<Vec<JournalEntry>, AletheiaError> {
    let user = user_id.0.clone();
    // SQLite treats a negative LIMIT as unbounded.
    let limit = limit.map(rows::sql_limit).unwrap_or(-1);
    db.connection()
        .call(move |conn| -> Result<Vec<JournalEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, title, content, emotion, intensity, created_at
                 FROM journal_entries WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let entries = stmt.query_map(params![user, limit], from_row)?;
            entries.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes one entry if `user_id` owns it.
pub async fn delete(db: &Database, user_id: &UserId, id: &str) -> Result<bool, AletheiaError> {
    let user = user_id.0.clone();
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let removed = conn.execute(
                "DELETE FROM journal_entries WHERE id = ?1 AND user_id = ?2",
                params![id, user],
            )?;
            Ok(removed > 0)
        })
        .await
        .map_err(map_tr_err)
}
