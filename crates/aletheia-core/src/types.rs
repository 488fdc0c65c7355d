// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Aletheia controllers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::emotion::Emotion;

/// Identity of the user that owns a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates a fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Formats a timestamp the way every store column holds it.
///
/// Fixed-width microsecond RFC 3339 in UTC, so lexical order is time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a timestamp written by [`format_timestamp`] (or any RFC 3339 string).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
    Speech,
    Audio,
    Auth,
}

// --- Conversation ---

/// Author of a chat turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One persisted chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: UserId,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    /// Builds a new message stamped with the current time.
    pub fn new(user_id: UserId, role: Role, content: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            user_id,
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// Structured recap of a voice-mode conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub user_id: UserId,
    pub dominant_emotion: String,
    pub key_topics: Vec<String>,
    pub worries: Vec<String>,
    pub reflective_suggestions: String,
    pub positive_reinforcement: String,
    pub recommended_next_steps: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// --- Analysis ---

/// The normalized result of one emotion analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    pub emotion: Emotion,
    pub intensity: f64,
    pub summary: String,
    pub emoji: String,
    pub quote: String,
    pub song: String,
    pub color: String,
    pub suggestion: String,
}

/// A persisted analysis of user-submitted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionRecord {
    pub id: String,
    pub user_id: UserId,
    pub emotion: Emotion,
    pub intensity: f64,
    pub text: String,
    pub summary: String,
    pub quote: String,
    pub song: String,
    pub suggestion: String,
    pub created_at: DateTime<Utc>,
}

impl EmotionRecord {
    /// Builds a record from an analysis of `text`.
    pub fn from_analysis(user_id: UserId, text: impl Into<String>, analysis: &EmotionAnalysis) -> Self {
        Self {
            id: new_id(),
            user_id,
            emotion: analysis.emotion,
            intensity: analysis.intensity,
            text: text.into(),
            summary: analysis.summary.clone(),
            quote: analysis.quote.clone(),
            song: analysis.song.clone(),
            suggestion: analysis.suggestion.clone(),
            created_at: Utc::now(),
        }
    }
}

// --- Journal ---

/// A user-authored journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub user_id: UserId,
    pub title: String,
    pub content: String,
    pub emotion: Option<Emotion>,
    pub intensity: f64,
    pub created_at: DateTime<Utc>,
}

// --- Meditation ---

/// The five guided meditation programs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum MeditationType {
    Calm,
    Stress,
    Sleep,
    Gratitude,
    Anxiety,
}

impl MeditationType {
    pub const ALL: [MeditationType; 5] = [
        MeditationType::Calm,
        MeditationType::Stress,
        MeditationType::Sleep,
        MeditationType::Gratitude,
        MeditationType::Anxiety,
    ];

    /// Target session length in minutes.
    pub fn duration_minutes(&self) -> u32 {
        match self {
            MeditationType::Calm => 5,
            MeditationType::Stress => 7,
            MeditationType::Sleep => 10,
            MeditationType::Gratitude => 5,
            MeditationType::Anxiety => 8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeditationType::Calm => "Calming Meditation",
            MeditationType::Stress => "Stress Relief",
            MeditationType::Sleep => "Sleep Meditation",
            MeditationType::Gratitude => "Gratitude Practice",
            MeditationType::Anxiety => "Anxiety Relief",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MeditationType::Calm => "🧘",
            MeditationType::Stress => "😌",
            MeditationType::Sleep => "😴",
            MeditationType::Gratitude => "🙏",
            MeditationType::Anxiety => "💜",
        }
    }
}

/// Post-session emotion recorded for every completed meditation.
///
/// Not measured; see DESIGN.md.
pub const EMOTION_AFTER_MEDITATION: &str = "peaceful";

/// A completed guided meditation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeditationSession {
    pub id: String,
    pub user_id: UserId,
    pub meditation_type: MeditationType,
    pub duration_minutes: u32,
    pub emotion_before: Option<Emotion>,
    pub emotion_after: String,
    pub ai_summary: Option<String>,
    pub completed_at: DateTime<Utc>,
}

// --- Provider ---

/// One message in a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMessage {
    pub role: String,
    pub content: String,
}

impl ProviderMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for ProviderMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.to_string(),
            content: msg.content.clone(),
        }
    }
}

/// A request to the completion service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderRequest {
    /// Model override; `None` uses the provider's default.
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub messages: Vec<ProviderMessage>,
    pub max_tokens: Option<u32>,
}

/// Token accounting reported by the completion service, when available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A response from the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

// --- Speech ---

/// A piece of text queued for speech synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub lang: String,
}

impl Utterance {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            lang: "en-US".to_string(),
        }
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// How a spoken utterance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Played to the end.
    Completed,
    /// Cut short by a cancel.
    Canceled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_strings() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::from_str("assistant").unwrap(), Role::Assistant);
        assert!(Role::from_str("system").is_err());
    }

    #[test]
    fn meditation_catalog_durations() {
        let total: u32 = MeditationType::ALL.iter().map(|t| t.duration_minutes()).sum();
        assert_eq!(total, 35);
        assert_eq!(MeditationType::Sleep.duration_minutes(), 10);
        assert_eq!(MeditationType::from_str("Gratitude").unwrap(), MeditationType::Gratitude);
    }

    #[test]
    fn timestamps_are_fixed_width_and_sortable() {
        let a = parse_timestamp("2026-01-01T00:00:01Z").unwrap();
        let b = parse_timestamp("2026-01-01T00:00:01.5Z").unwrap();
        let (fa, fb) = (format_timestamp(&a), format_timestamp(&b));
        assert_eq!(fa.len(), fb.len());
        assert!(fa < fb);
        assert_eq!(parse_timestamp(&fa), Some(a));
    }

    #[test]
    fn utterance_volume_is_clamped() {
        let u = Utterance::new("hi").with_volume(3.0).with_rate(0.8);
        assert_eq!(u.volume, 1.0);
        assert_eq!(u.rate, 0.8);
    }

    #[test]
    fn chat_message_converts_to_provider_message() {
        let msg = ChatMessage::new(UserId("u".into()), Role::Assistant, "hello");
        let pm = ProviderMessage::from(&msg);
        assert_eq!(pm, ProviderMessage::assistant("hello"));
    }
}
