// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analyze text (typed or spoken) and keep the result.

use std::sync::Arc;

use aletheia_core::types::{EmotionAnalysis, EmotionRecord};
use aletheia_core::{AletheiaError, SessionContext, StorageAdapter};
use aletheia_gateway::AnalysisGateway;
use aletheia_voice::VoiceIo;
use tracing::info;

use crate::journal::JournalDraft;

/// An analysis together with the record it was saved as.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub analysis: EmotionAnalysis,
    pub record: EmotionRecord,
}

impl AnalysisOutcome {
    /// A journal draft pre-filled from this analysis.
    pub fn journal_draft(&self) -> JournalDraft {
        JournalDraft {
            title: String::new(),
            content: self.record.text.clone(),
            emotion: Some(self.analysis.emotion),
            intensity: Some(self.analysis.intensity),
        }
    }
}

pub struct AnalysisService {
    session: SessionContext,
    storage: Arc<dyn StorageAdapter>,
    gateway: Arc<AnalysisGateway>,
}

impl AnalysisService {
    pub fn new(
        session: SessionContext,
        storage: Arc<dyn StorageAdapter>,
        gateway: Arc<AnalysisGateway>,
    ) -> Self {
        Self {
            session,
            storage,
            gateway,
        }
    }

    /// Analyzes `text` and persists an emotion record for the current user.
    ///
    /// Nothing is persisted when the analysis fails.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisOutcome, AletheiaError> {
        let user_id = self.session.user_id()?;
        let analysis = self.gateway.analyze(text).await?;
        let record = EmotionRecord::from_analysis(user_id, text.trim(), &analysis);
        self.storage.insert_emotion_record(&record).await?;
        info!(record_id = %record.id, emotion = %record.emotion, "emotion record saved");
        Ok(AnalysisOutcome { analysis, record })
    }

    /// Captures one spoken utterance to analyze.
    ///
    /// `None` when nothing was heard.
    pub async fn capture(&self, voice: &VoiceIo) -> Result<Option<String>, AletheiaError> {
        voice.listen_once().await
    }
}
