// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Emotion record queries.

use aletheia_core::types::{EmotionRecord, UserId, format_timestamp};
use aletheia_core::{AletheiaError, Emotion};
use chrono::{DateTime, Utc};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::rows;

const COLUMNS: &str =
    "id, user_id, emotion, intensity, text, summary, quote, song, suggestion, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<EmotionRecord> {
    let emotion: String = row.get(2)?;
    Ok(EmotionRecord {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        // Rows from older clients may hold labels outside the vocabulary.
        emotion: Emotion::normalize(Some(&emotion)),
        intensity: row.get(3)?,
        text: row.get(4)?,
        summary: row.get(5)?,
        quote: row.get(6)?,
        song: row.get(7)?,
        suggestion: row.get(8)?,
        created_at: rows::timestamp(row, 9)?,
    })
}

pub async fn insert(db: &Database, record: &EmotionRecord) -> Result<(), AletheiaError> {
    let r = record.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO emotion_records
                 (id, user_id, emotion, intensity, text, summary, quote, song, suggestion, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    r.id,
                    r.user_id.0,
                    r.emotion.as_str(),
                    r.intensity.clamp(0.0, 1.0),
                    r.text,
                    r.summary,
                    r.quote,
                    r.song,
                    r.suggestion,
                    format_timestamp(&r.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Newest first.
pub async fn recent(
    db: &Database,
    user_id: &UserId,
    limit: usize,
) -> Result<Vec<EmotionRecord>, AletheiaError> {
    let user = user_id.0.clone();
    let limit = rows::sql_limit(limit);
    db.connection()
        .call(move |conn| -> Result<Vec<EmotionRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM emotion_records WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
            ))?;
            let records = stmt.query_map(params![user, limit], from_row)?;
            records.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Records at or after `since`, newest first.
pub async fn since(
    db: &Database,
    user_id: &UserId,
    since: DateTime<Utc>,
) -> Result<Vec<EmotionRecord>, AletheiaError> {
    let user = user_id.0.clone();
    let cutoff = format_timestamp(&since);
    db.connection()
        .call(move |conn| -> Result<Vec<EmotionRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM emotion_records
                 WHERE user_id = ?1 AND created_at >= ?2
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let records = stmt.query_map(params![user, cutoff], from_row)?;
            records.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::tempdir;

    fn record(user: &str, emotion: Emotion, intensity: f64, at: DateTime<Utc>) -> EmotionRecord {
        EmotionRecord {
            id: aletheia_core::types::new_id(),
            user_id: UserId(user.into()),
            emotion,
            intensity,
            text: "text".into(),
            summary: "summary".into(),
            quote: emotion.profile().quote.into(),
            song: emotion.profile().song.into(),
            suggestion: emotion.suggestion(),
            created_at: at,
        }
    }

    async fn open() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("e.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn recent_is_newest_first_and_scoped_to_user() {
        let (db, _dir) = open().await;
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        insert(&db, &record("a", Emotion::Sad, 0.4, t0)).await.unwrap();
        insert(&db, &record("a", Emotion::Happy, 0.9, t0 + Duration::hours(1)))
            .await
            .unwrap();
        insert(&db, &record("b", Emotion::Angry, 0.7, t0 + Duration::hours(2)))
            .await
            .unwrap();

        let got = recent(&db, &UserId("a".into()), 10).await.unwrap();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].emotion, Emotion::Happy);
        assert_eq!(got[1].emotion, Emotion::Sad);
        assert_eq!(got[0].created_at, t0 + Duration::hours(1));

        let limited = recent(&db, &UserId("a".into()), 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn since_filters_by_cutoff() {
        let (db, _dir) = open().await;
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        insert(&db, &record("a", Emotion::Calm, 0.5, now - Duration::days(8)))
            .await
            .unwrap();
        insert(&db, &record("a", Emotion::Stressed, 0.6, now - Duration::days(2)))
            .await
            .unwrap();

        let got = since(&db, &UserId("a".into()), now - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].emotion, Emotion::Stressed);
    }

    #[tokio::test]
    async fn unknown_stored_label_reads_back_as_calm() {
        let (db, _dir) = open().await;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO emotion_records (id, user_id, emotion, intensity, text, summary, created_at)
                     VALUES ('x', 'a', 'melancholy', 0.3, 't', 's', '2026-01-01T00:00:00.000000Z')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();
        let got = recent(&db, &UserId("a".into()), 5).await.unwrap();
        assert_eq!(got[0].emotion, Emotion::Calm);
    }
}
