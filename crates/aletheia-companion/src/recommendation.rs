// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advisory meditation recommendation from recent emotions.

use std::sync::Arc;

use aletheia_config::model::MeditationConfig;
use aletheia_core::types::MeditationType;
use aletheia_core::{AletheiaError, Emotion, SessionContext, StorageAdapter};
use aletheia_gateway::AnalysisGateway;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

/// A recommendation and the emotions it was based on.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub text: String,
    /// Newest first.
    pub based_on: Vec<Emotion>,
    /// The program the text names, when one can be recognised.
    pub suggested: Option<MeditationType>,
}

pub struct Recommender {
    session: SessionContext,
    storage: Arc<dyn StorageAdapter>,
    gateway: Arc<AnalysisGateway>,
    window: Duration,
    sample: usize,
}

impl Recommender {
    pub fn new(
        session: SessionContext,
        storage: Arc<dyn StorageAdapter>,
        gateway: Arc<AnalysisGateway>,
        config: &MeditationConfig,
    ) -> Self {
        Self {
            session,
            storage,
            gateway,
            window: Duration::days(config.recommendation_window_days),
            sample: config.recommendation_sample,
        }
    }

    /// Labels of the user's most recent analyses inside the window.
    pub async fn recent_emotions(&self, now: DateTime<Utc>) -> Result<Vec<Emotion>, AletheiaError> {
        let user_id = self.session.user_id()?;
        let records = self
            .storage
            .emotion_records_since(&user_id, now - self.window)
            .await?;
        Ok(records.iter().take(self.sample).map(|r| r.emotion).collect())
    }

    pub async fn recommend(&self, now: DateTime<Utc>) -> Result<Recommendation, AletheiaError> {
        let based_on = self.recent_emotions(now).await?;
        let text = self.gateway.recommend_meditation(&based_on).await?;
        let suggested = suggested_type(&text);
        info!(emotions = based_on.len(), ?suggested, "meditation recommended");
        Ok(Recommendation {
            text,
            based_on,
            suggested,
        })
    }
}

/// Finds the first catalog program named in free text.
pub fn suggested_type(text: &str) -> Option<MeditationType> {
    const NAMES: &[(&str, MeditationType)] = &[
        ("calming", MeditationType::Calm),
        ("stress relief", MeditationType::Stress),
        ("sleep", MeditationType::Sleep),
        ("gratitude", MeditationType::Gratitude),
        ("anxiety relief", MeditationType::Anxiety),
    ];
    let lower = text.to_lowercase();
    NAMES
        .iter()
        .filter_map(|(name, kind)| lower.find(name).map(|at| (at, *kind)))
        .min_by_key(|(at, _)| *at)
        .map(|(_, kind)| kind)
}
