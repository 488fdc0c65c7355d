// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The analysis gateway: every request the controllers make of the model.

use std::sync::Arc;

use aletheia_core::types::{
    ChatMessage, EmotionAnalysis, MeditationType, ProviderMessage, ProviderRequest,
};
use aletheia_core::{AletheiaError, Emotion, ProviderAdapter};
use tracing::{debug, info};

use crate::parse::{self, ConversationDigest};
use crate::prompts;

/// A generated meditation script, already split for narration.
#[derive(Debug, Clone, PartialEq)]
pub struct MeditationScript {
    pub kind: MeditationType,
    pub segments: Vec<String>,
}

/// Typed front door over a [`ProviderAdapter`].
///
/// Holds no per-user state; share one behind an `Arc`.
pub struct AnalysisGateway {
    provider: Arc<dyn ProviderAdapter>,
    persona: String,
    history_window: usize,
}

impl AnalysisGateway {
    pub fn new(provider: Arc<dyn ProviderAdapter>) -> Self {
        Self {
            provider,
            persona: "Sol".to_string(),
            history_window: 10,
        }
    }

    /// Overrides the companion's name (default `Sol`).
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// How many prior turns accompany a chat message (default 10).
    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    async fn ask(
        &self,
        system: String,
        messages: Vec<ProviderMessage>,
    ) -> Result<String, AletheiaError> {
        let request = ProviderRequest {
            system_prompt: Some(system),
            messages,
            ..Default::default()
        };
        let response = self.provider.complete(request).await?;
        if let Some(usage) = response.usage {
            debug!(
                model = %response.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "completion usage"
            );
        }
        Ok(response.content)
    }

    /// Classifies the emotion expressed in `text`.
    ///
    /// Blank input is rejected before any request is made.
    pub async fn analyze(&self, text: &str) -> Result<EmotionAnalysis, AletheiaError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AletheiaError::Validation(
                "Please enter some text to analyze".into(),
            ));
        }
        let reply = self
            .ask(
                prompts::ANALYSIS_SYSTEM.to_string(),
                vec![ProviderMessage::user(text)],
            )
            .await?;
        let analysis = parse::parse_analysis(&reply)?;
        info!(
            emotion = %analysis.emotion,
            intensity = analysis.intensity,
            "text analyzed"
        );
        Ok(analysis)
    }

    /// Produces the companion's next reply.
    ///
    /// Only the trailing window of `history` is sent, followed by `message`.
    pub async fn chat_reply(
        &self,
        message: &str,
        history: &[ChatMessage],
    ) -> Result<String, AletheiaError> {
        let skip = history.len().saturating_sub(self.history_window);
        let mut messages: Vec<ProviderMessage> =
            history[skip..].iter().map(ProviderMessage::from).collect();
        messages.push(ProviderMessage::user(message));
        debug!(context_turns = messages.len() - 1, "requesting companion reply");

        let reply = self
            .ask(prompts::companion_system(&self.persona), messages)
            .await?;
        parse::require_text(&reply, "companion")
    }

    /// Summarizes a whole conversation into a structured digest.
    pub async fn summarize_conversation(
        &self,
        messages: &[ChatMessage],
    ) -> Result<ConversationDigest, AletheiaError> {
        if messages.is_empty() {
            return Err(AletheiaError::Validation(
                "nothing to summarize yet".into(),
            ));
        }
        let transcript = prompts::transcript(messages, &self.persona);
        let reply = self
            .ask(
                prompts::SUMMARY_SYSTEM.to_string(),
                vec![ProviderMessage::user(prompts::summary_request(&transcript))],
            )
            .await?;
        parse::parse_digest(&reply)
    }

    /// Generates and segments a guided meditation script.
    pub async fn meditation_script(
        &self,
        kind: MeditationType,
    ) -> Result<MeditationScript, AletheiaError> {
        let reply = self
            .ask(
                prompts::meditation_guide_system(kind.duration_minutes()),
                vec![ProviderMessage::user(prompts::meditation_script_request(
                    kind,
                ))],
            )
            .await?;
        let segments = parse::split_segments(&reply);
        if segments.is_empty() {
            return Err(AletheiaError::malformed("meditation script was empty"));
        }
        info!(%kind, segments = segments.len(), "meditation script generated");
        Ok(MeditationScript { kind, segments })
    }

    /// A short encouragement after a completed session.
    pub async fn meditation_summary(
        &self,
        before: Emotion,
        after: &str,
    ) -> Result<String, AletheiaError> {
        let reply = self
            .ask(
                prompts::MEDITATION_SUMMARY_SYSTEM.to_string(),
                vec![ProviderMessage::user(prompts::meditation_summary_request(
                    before, after,
                ))],
            )
            .await?;
        parse::require_text(&reply, "meditation summary")
    }

    /// Advisory text naming one meditation type suited to `recent` emotions.
    pub async fn recommend_meditation(&self, recent: &[Emotion]) -> Result<String, AletheiaError> {
        let reply = self
            .ask(
                prompts::RECOMMENDATION_SYSTEM.to_string(),
                vec![ProviderMessage::user(prompts::recommendation_request(
                    recent,
                ))],
            )
            .await?;
        parse::require_text(&reply, "recommendation")
    }
}
