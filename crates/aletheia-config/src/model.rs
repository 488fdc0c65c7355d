// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level Aletheia configuration.
///
/// Every section is optional and defaults to working values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AletheiaConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// Chat-completion gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Conversational companion settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Guided meditation settings.
    #[serde(default)]
    pub meditation: MeditationConfig,

    /// Dashboard aggregation settings.
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Speech engine settings.
    #[serde(default)]
    pub voice: VoiceConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Identity used by the local auth provider.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            user_id: default_user_id(),
        }
    }
}

fn default_app_name() -> String {
    "aletheia".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_user_id() -> String {
    "local".to_string()
}

/// Chat-completion gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Bearer token. `None` requires an environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Full URL of the OpenAI-compatible chat completions endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("aletheia").join("aletheia.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("aletheia.db"))
        .display()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Conversational companion configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Name the companion introduces itself with.
    #[serde(default = "default_persona_name")]
    pub persona_name: String,

    /// How many prior turns accompany each new message.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Speech rate for spoken replies in voice mode.
    #[serde(default = "default_chat_speech_rate")]
    pub speech_rate: f32,

    /// Delay before listening again after a reply has been spoken.
    #[serde(default = "default_relisten_delay_ms")]
    pub relisten_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            persona_name: default_persona_name(),
            history_window: default_history_window(),
            speech_rate: default_chat_speech_rate(),
            relisten_delay_ms: default_relisten_delay_ms(),
        }
    }
}

fn default_persona_name() -> String {
    "Sol".to_string()
}

fn default_history_window() -> usize {
    10
}

fn default_chat_speech_rate() -> f32 {
    0.9
}

fn default_relisten_delay_ms() -> u64 {
    500
}

/// Guided meditation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MeditationConfig {
    /// Silence between narrated segments.
    #[serde(default = "default_segment_pause_ms")]
    pub segment_pause_ms: u64,

    #[serde(default = "default_meditation_speech_rate")]
    pub speech_rate: f32,

    /// Narration volume at session start, in `[0, 1]`.
    #[serde(default = "default_volume")]
    pub default_volume: f32,

    /// Background track volume as a fraction of the narration volume.
    #[serde(default = "default_background_volume_ratio")]
    pub background_volume_ratio: f32,

    #[serde(default = "default_background_track")]
    pub background_track: String,

    /// Look-back window for recommendations.
    #[serde(default = "default_recommendation_window_days")]
    pub recommendation_window_days: i64,

    /// Maximum number of recent emotions sent with a recommendation request.
    #[serde(default = "default_recommendation_sample")]
    pub recommendation_sample: usize,
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            segment_pause_ms: default_segment_pause_ms(),
            speech_rate: default_meditation_speech_rate(),
            default_volume: default_volume(),
            background_volume_ratio: default_background_volume_ratio(),
            background_track: default_background_track(),
            recommendation_window_days: default_recommendation_window_days(),
            recommendation_sample: default_recommendation_sample(),
        }
    }
}

fn default_segment_pause_ms() -> u64 {
    2000
}

fn default_meditation_speech_rate() -> f32 {
    0.8
}

fn default_volume() -> f32 {
    0.5
}

fn default_background_volume_ratio() -> f32 {
    0.3
}

fn default_background_track() -> String {
    "https://cdn.pixabay.com/download/audio/2022/03/10/audio_2c4d3f3cd2.mp3".to_string()
}

fn default_recommendation_window_days() -> i64 {
    7
}

fn default_recommendation_sample() -> usize {
    10
}

/// Dashboard aggregation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InsightsConfig {
    /// How many recent analyses feed the distribution and weekly views.
    #[serde(default = "default_distribution_limit")]
    pub distribution_limit: usize,

    /// How many summaries and journal entries the dashboard lists.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            distribution_limit: default_distribution_limit(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_distribution_limit() -> usize {
    100
}

fn default_recent_limit() -> usize {
    5
}

/// Speech engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VoiceConfig {
    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Text-to-speech command; `None` picks a platform default.
    #[serde(default)]
    pub synthesizer_command: Option<String>,

    /// Audio player used for the background track; `None` disables it.
    #[serde(default)]
    pub player_command: Option<String>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            pitch: default_pitch(),
            synthesizer_command: None,
            player_command: None,
        }
    }
}

fn default_lang() -> String {
    "en-US".to_string()
}

fn default_pitch() -> f32 {
    1.0
}
