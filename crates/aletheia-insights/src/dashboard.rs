// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loaders that fetch records for the signed-in user and reduce them.

use std::sync::Arc;

use aletheia_config::model::InsightsConfig;
use aletheia_core::types::{ConversationSummary, JournalEntry};
use aletheia_core::{AletheiaError, Emotion, SessionContext, StorageAdapter, UserId};
use chrono::{Days, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{
    CALENDAR_DAYS, DayCount, MoodDay, Share, activity_series, distribution, majority,
    mood_calendar,
};
use crate::history::{MeditationStats, meditation_stats};

/// Everything the overview page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Analyses considered, bounded by the configured fetch limit.
    pub total_analyses: usize,
    pub most_common: Option<Emotion>,
    pub this_week: usize,
    pub activity: Vec<DayCount>,
    pub distribution: Vec<Share>,
    pub recent_summaries: Vec<ConversationSummary>,
    pub recent_journal: Vec<JournalEntry>,
}

impl DashboardStats {
    /// The most common label for display, or `"N/A"` without data.
    pub fn most_common_label(&self) -> &'static str {
        self.most_common.map_or("N/A", |e| e.as_str())
    }
}

/// Read-only access to the derived views for the current user.
#[derive(Clone)]
pub struct Insights {
    session: SessionContext,
    storage: Arc<dyn StorageAdapter>,
    config: InsightsConfig,
}

impl Insights {
    pub fn new(
        session: SessionContext,
        storage: Arc<dyn StorageAdapter>,
        config: InsightsConfig,
    ) -> Self {
        Self {
            session,
            storage,
            config,
        }
    }

    pub(crate) fn user_id(&self) -> Result<UserId, AletheiaError> {
        self.session.user_id()
    }

    pub async fn dashboard<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<DashboardStats, AletheiaError> {
        let user_id = self.session.user_id()?;
        let records = self
            .storage
            .recent_emotion_records(&user_id, self.config.distribution_limit)
            .await?;
        let recent_summaries = self
            .storage
            .recent_conversation_summaries(&user_id, self.config.recent_limit)
            .await?;
        let recent_journal = self
            .storage
            .list_journal_entries(&user_id, Some(self.config.recent_limit))
            .await?;

        let activity = activity_series(&records, today, tz);
        debug!(records = records.len(), "dashboard recomputed");
        Ok(DashboardStats {
            total_analyses: records.len(),
            most_common: majority(records.iter().map(|r| r.emotion)),
            this_week: activity.iter().map(|d| d.count).sum(),
            activity,
            distribution: distribution(&records),
            recent_summaries,
            recent_journal,
        })
    }

    /// The trailing-month mood calendar.
    pub async fn mood_calendar<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<Vec<MoodDay>, AletheiaError> {
        let user_id = self.session.user_id()?;
        // One spare day so the oldest local date is fully covered in any zone.
        let since = today
            .checked_sub_days(Days::new(CALENDAR_DAYS + 1))
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|d| d.and_utc())
            .unwrap_or(chrono::DateTime::<Utc>::MIN_UTC);
        let records = self.storage.emotion_records_since(&user_id, since).await?;
        Ok(mood_calendar(&records, today, tz))
    }

    pub async fn meditation_history<Tz: TimeZone>(
        &self,
        today: NaiveDate,
        tz: &Tz,
    ) -> Result<MeditationStats, AletheiaError> {
        let user_id = self.session.user_id()?;
        let sessions = self.storage.list_meditation_sessions(&user_id).await?;
        Ok(meditation_stats(&sessions, today, tz))
    }
}
