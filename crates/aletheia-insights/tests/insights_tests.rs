// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use aletheia_core::Emotion;
use aletheia_core::types::{
    EMOTION_AFTER_MEDITATION, EmotionRecord, JournalEntry, MeditationSession, MeditationType,
    new_id,
};
use aletheia_insights::Insights;
use aletheia_test_utils::TestHarness;
use chrono::{Duration as ChronoDuration, Utc};

fn insights(harness: &TestHarness) -> Insights {
    Insights::new(
        harness.session.clone(),
        harness.storage.clone(),
        harness.config.insights.clone(),
    )
}

fn emotion_record(harness: &TestHarness, emotion: Emotion, intensity: f64, days_ago: i64) -> EmotionRecord {
    EmotionRecord {
        id: new_id(),
        user_id: harness.user_id(),
        emotion,
        intensity,
        text: "entry".into(),
        summary: String::new(),
        quote: String::new(),
        song: String::new(),
        suggestion: emotion.suggestion(),
        created_at: Utc::now() - ChronoDuration::days(days_ago),
    }
}

fn meditation_session(harness: &TestHarness, kind: MeditationType, minutes: u32) -> MeditationSession {
    MeditationSession {
        id: new_id(),
        user_id: harness.user_id(),
        meditation_type: kind,
        duration_minutes: minutes,
        emotion_before: None,
        emotion_after: EMOTION_AFTER_MEDITATION.to_string(),
        ai_summary: None,
        completed_at: Utc::now(),
    }
}

#[tokio::test]
async fn empty_dashboard_reports_no_data() {
    let harness = TestHarness::new().await.unwrap();
    let stats = insights(&harness)
        .dashboard(Utc::now().date_naive(), &Utc)
        .await
        .unwrap();

    assert_eq!(stats.total_analyses, 0);
    assert_eq!(stats.most_common_label(), "N/A");
    assert_eq!(stats.this_week, 0);
    assert_eq!(stats.activity.len(), 7);
    assert!(stats.distribution.is_empty());
    assert!(stats.recent_journal.is_empty());
}

#[tokio::test]
async fn dashboard_totals_and_recent_lists() {
    let harness = TestHarness::new().await.unwrap();
    for (emotion, days_ago) in [
        (Emotion::Anxious, 0),
        (Emotion::Anxious, 1),
        (Emotion::Happy, 2),
        (Emotion::Sad, 20),
    ] {
        harness
            .storage
            .insert_emotion_record(&emotion_record(&harness, emotion, 0.5, days_ago))
            .await
            .unwrap();
    }
    for i in 0..7 {
        harness
            .storage
            .insert_journal_entry(&JournalEntry {
                id: new_id(),
                user_id: harness.user_id(),
                title: format!("entry {i}"),
                content: "text".into(),
                emotion: None,
                intensity: 0.5,
                created_at: Utc::now() - ChronoDuration::minutes(10 - i),
            })
            .await
            .unwrap();
    }

    let stats = insights(&harness)
        .dashboard(Utc::now().date_naive(), &Utc)
        .await
        .unwrap();
    assert_eq!(stats.total_analyses, 4);
    assert_eq!(stats.most_common, Some(Emotion::Anxious));
    assert_eq!(stats.this_week, 3);
    assert_eq!(stats.distribution[0].count, 2);
    assert_eq!(stats.recent_journal.len(), 5);
    assert_eq!(stats.recent_journal[0].title, "entry 6");
}

#[tokio::test]
async fn mood_calendar_covers_thirty_days() {
    let harness = TestHarness::new().await.unwrap();
    for (emotion, intensity) in [(Emotion::Happy, 0.9), (Emotion::Happy, 0.6), (Emotion::Sad, 0.3)] {
        harness
            .storage
            .insert_emotion_record(&emotion_record(&harness, emotion, intensity, 0))
            .await
            .unwrap();
    }
    harness
        .storage
        .insert_emotion_record(&emotion_record(&harness, Emotion::Angry, 1.0, 45))
        .await
        .unwrap();

    let calendar = insights(&harness)
        .mood_calendar(Utc::now().date_naive(), &Utc)
        .await
        .unwrap();
    assert_eq!(calendar.len(), 30);
    let today = calendar[29];
    assert_eq!(today.emotion, Some(Emotion::Happy));
    assert!((today.intensity - 0.6).abs() < 1e-9);
    assert_eq!(calendar.iter().map(|d| d.count).sum::<usize>(), 3);
}

#[tokio::test]
async fn live_calendar_recomputes_on_new_records() {
    let harness = TestHarness::new().await.unwrap();
    let mut live = insights(&harness)
        .live_mood_calendar(&harness.feed, Utc)
        .await
        .unwrap();
    assert!(live.current().iter().all(|d| !d.has_data()));

    harness
        .storage
        .insert_emotion_record(&emotion_record(&harness, Emotion::Excited, 0.7, 0))
        .await
        .unwrap();

    let updated = tokio::time::timeout(Duration::from_secs(5), live.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated[29].emotion, Some(Emotion::Excited));
    live.stop().await;
}

#[tokio::test]
async fn live_meditation_history_follows_inserts() {
    let harness = TestHarness::new().await.unwrap();
    let mut live = insights(&harness)
        .live_meditation_history(&harness.feed, Utc)
        .await
        .unwrap();
    assert_eq!(live.current().total_sessions, 0);

    harness
        .storage
        .insert_meditation_session(&meditation_session(&harness, MeditationType::Calm, 5))
        .await
        .unwrap();

    let stats = tokio::time::timeout(Duration::from_secs(5), live.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_minutes, 5);
    assert_eq!(stats.weekly[6].sessions, 1);
    live.stop().await;
}
