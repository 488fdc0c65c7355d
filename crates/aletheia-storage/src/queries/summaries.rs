// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation summary queries. List columns hold JSON arrays.

use aletheia_core::AletheiaError;
use aletheia_core::types::{ConversationSummary, UserId, format_timestamp};
use rusqlite::{Row, params};

use crate::database::{Database, map_tr_err};
use crate::rows;

fn from_row(row: &Row<'_>) -> rusqlite::Result<ConversationSummary> {
    Ok(ConversationSummary {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        dominant_emotion: row.get(2)?,
        key_topics: rows::string_list(row, 3)?,
        worries: rows::string_list(row, 4)?,
        reflective_suggestions: row.get(5)?,
        positive_reinforcement: row.get(6)?,
        recommended_next_steps: rows::string_list(row, 7)?,
        created_at: rows::timestamp(row, 8)?,
    })
}

pub async fn insert(db: &Database, summary: &ConversationSummary) -> Result<(), AletheiaError> {
    let s = summary.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO conversation_summaries
                 (id, user_id, dominant_emotion, key_topics, worries, reflective_suggestions,
                  positive_reinforcement, recommended_next_steps, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    s.id,
                    s.user_id.0,
                    s.dominant_emotion,
                    rows::encode_list(&s.key_topics),
                    rows::encode_list(&s.worries),
                    s.reflective_suggestions,
                    s.positive_reinforcement,
                    rows::encode_list(&s.recommended_next_steps),
                    format_timestamp(&s.created_at),
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn recent(
    db: &Database,
    user_id: &UserId,
    limit: usize,
) -> Result<Vec<ConversationSummary>, AletheiaError> {
    let user = user_id.0.clone();
    let limit = rows::sql_limit(limit);
    db.connection()
        .call(move |conn| -> Result<Vec<ConversationSummary>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, dominant_emotion, key_topics, worries, reflective_suggestions,
                        positive_reinforcement, recommended_next_steps, created_at
                 FROM conversation_summaries WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC LIMIT ?2",
            )?;
            let summaries = stmt.query_map(params![user, limit], from_row)?;
            summaries.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn lists_survive_the_round_trip() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("s.db").to_str().unwrap())
            .await
            .unwrap();
        let user = UserId("u".into());
        let summary = ConversationSummary {
            id: "s1".into(),
            user_id: user.clone(),
            dominant_emotion: "anxiety".into(),
            key_topics: vec!["work".into(), "sleep \"quality\"".into()],
            worries: vec![],
            reflective_suggestions: "Slow down.".into(),
            positive_reinforcement: "You showed up.".into(),
            recommended_next_steps: vec!["journal".into()],
            created_at: Utc::now(),
        };
        insert(&db, &summary).await.unwrap();

        let got = recent(&db, &user, 5).await.unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].key_topics, summary.key_topics);
        assert!(got[0].worries.is_empty());
        assert_eq!(got[0].recommended_next_steps, vec!["journal"]);
    }
}
