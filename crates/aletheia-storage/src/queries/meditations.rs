// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meditation session queries.

use aletheia_core::types::{MeditationSession, UserId, format_timestamp};
use aletheia_core::{AletheiaError, Emotion};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::rows;

fn from_row(row: &Row<'_>) -> rusqlite::Result<MeditationSession> {
    let before: Option<String> = row.get(4)?;
    Ok(MeditationSession {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        meditation_type: rows::parsed(row, 2)?,
        duration_minutes: row.get(3)?,
        emotion_before: before.as_deref().and_then(Emotion::parse),
        emotion_after: row.get(5)?,
        ai_summary: row.get(6)?,
        completed_at: rows::timestamp(row, 7)?,
    })
}

pub async fn insert(db: &Database, session: &MeditationSession) -> Result<(), AletheiaError> {
    let s = session.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO meditation_sessions
                 (id, user_id, meditation_type, duration_minutes, emotion_before,
                  emotion_after, ai_summary, completed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    s.id,
                    s.user_id.0,
                    s.meditation_type.to_string(),
                    s.duration_minutes,
                    s.emotion_before.map(|e| e.as_str()),
                    s.emotion_after,
                    s.ai_summary,
                    format_timestamp(&s.completed_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Newest first.
pub async fn list(db: &Database, user_id: &UserId) -> Result<Vec<MeditationSession>, AletheiaError> {
    let user = user_id.0.clone();
    db.connection()
        .call(move |conn| -> Result<Vec<MeditationSession>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, meditation_type, duration_minutes, emotion_before,
                        emotion_after, ai_summary, completed_at
                 FROM meditation_sessions WHERE user_id = ?1
                 ORDER BY completed_at DESC, rowid DESC",
            )?;
            let sessions = stmt.query_map(params![user], from_row)?;
            sessions.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aletheia_core::types::{EMOTION_AFTER_MEDITATION, MeditationType};
    use chrono::Utc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn session_round_trips_optional_fields() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("med.db").to_str().unwrap())
            .await
            .unwrap();
        let user = UserId("u".into());
        let with_summary = MeditationSession {
            id: "a".into(),
            user_id: user.clone(),
            meditation_type: MeditationType::Sleep,
            duration_minutes: 9,
            emotion_before: Some(Emotion::Anxious),
            emotion_after: EMOTION_AFTER_MEDITATION.into(),
            ai_summary: Some("Well done.".into()),
            completed_at: Utc::now(),
        };
        let bare = MeditationSession {
            id: "b".into(),
            emotion_before: None,
            ai_summary: None,
            meditation_type: MeditationType::Gratitude,
            completed_at: Utc::now() + chrono::Duration::seconds(1),
            ..with_summary.clone()
        };
        insert(&db, &with_summary).await.unwrap();
        insert(&db, &bare).await.unwrap();

        let got = list(&db, &user).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].id, "b");
        assert_eq!(got[0].emotion_before, None);
        assert_eq!(got[1].meditation_type, MeditationType::Sleep);
        assert_eq!(got[1].emotion_before, Some(Emotion::Anxious));
        assert_eq!(got[1].emotion_after, "peaceful");
        assert_eq!(got[1].ai_summary.as_deref(), Some("Well done."));
    }
}
