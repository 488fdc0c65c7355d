// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message queries.

use aletheia_core::AletheiaError;
use aletheia_core::types::{ChatMessage, UserId, format_timestamp};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::rows;

fn from_row(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        role: rows::parsed(row, 2)?,
        content: row.get(3)?,
        created_at: rows::timestamp(row, 4)?,
    })
}

pub async fn insert(db: &Database, msg: &ChatMessage) -> Result<(), AletheiaError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO chat_messages (id, user_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    msg.id,
                    msg.user_id.0,
                    msg.role.to_string(),
                    msg.content,
                    format_timestamp(&msg.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// The user's whole history, oldest first. Insertion order breaks ties.
pub async fn history(db: &Database, user_id: &UserId) -> Result<Vec<ChatMessage>, AletheiaError> {
    let user = user_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<ChatMessage>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, role, content, created_at
                 FROM chat_messages WHERE user_id = ?1
                 ORDER BY created_at ASC, rowid ASC",
            )?;
            let messages = stmt.query_map(params![user], from_row)?;
            messages.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Deletes every message the user owns. Returns the number removed.
pub async fn clear(db: &Database, user_id: &UserId) -> Result<usize, AletheiaError> {
    let user = user_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM chat_messages WHERE user_id = ?1", params![user])
        })
        .await
        .map_err(map_tr_err)
}
