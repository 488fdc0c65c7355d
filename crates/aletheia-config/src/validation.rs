// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.
//!
//! All problems are collected, not just the first.

use crate::diagnostic::ConfigError;
use crate::model::AletheiaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates a deserialized configuration.
pub fn validate_config(config: &AletheiaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.app.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::invalid(format!(
            "app.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.app.log_level
        )));
    }

    if config.app.user_id.trim().is_empty() {
        errors.push(ConfigError::invalid("app.user_id must not be empty"));
    }

    let base_url = config.gateway.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::invalid(format!(
            "gateway.base_url must be an http(s) URL, got `{base_url}`"
        )));
    }

    if config.gateway.model.trim().is_empty() {
        errors.push(ConfigError::invalid("gateway.model must not be empty"));
    }

    if config.gateway.timeout_secs == 0 {
        errors.push(ConfigError::invalid("gateway.timeout_secs must be positive"));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::invalid("storage.database_path must not be empty"));
    }

    if config.chat.persona_name.trim().is_empty() {
        errors.push(ConfigError::invalid("chat.persona_name must not be empty"));
    }

    if config.chat.history_window == 0 {
        errors.push(ConfigError::invalid("chat.history_window must be at least 1"));
    }

    check_rate(&mut errors, "chat.speech_rate", config.chat.speech_rate);
    check_rate(
        &mut errors,
        "meditation.speech_rate",
        config.meditation.speech_rate,
    );
    check_unit(
        &mut errors,
        "meditation.default_volume",
        config.meditation.default_volume,
    );
    check_unit(
        &mut errors,
        "meditation.background_volume_ratio",
        config.meditation.background_volume_ratio,
    );

    if config.meditation.recommendation_window_days < 1 {
        errors.push(ConfigError::invalid(format!(
            "meditation.recommendation_window_days must be at least 1, got {}",
            config.meditation.recommendation_window_days
        )));
    }

    if config.meditation.recommendation_sample == 0 {
        errors.push(ConfigError::invalid(
            "meditation.recommendation_sample must be at least 1",
        ));
    }

    if config.insights.distribution_limit == 0 || config.insights.recent_limit == 0 {
        errors.push(ConfigError::invalid("insights limits must be at least 1"));
    }

    if !(0.0..=2.0).contains(&config.voice.pitch) {
        errors.push(ConfigError::invalid(format!(
            "voice.pitch must be within 0.0..=2.0, got {}",
            config.voice.pitch
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_rate(errors: &mut Vec<ConfigError>, key: &str, value: f32) {
    if !(value > 0.0 && value <= 10.0) {
        errors.push(ConfigError::invalid(format!(
            "{key} must be within (0, 10], got {value}"
        )));
    }
}

fn check_unit(errors: &mut Vec<ConfigError>, key: &str, value: f32) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(ConfigError::invalid(format!(
            "{key} must be within 0.0..=1.0, got {value}"
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &AletheiaConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&AletheiaConfig::default()).is_ok());
    }

    #[test]
    fn volume_above_one_is_rejected() {
        let mut config = AletheiaConfig::default();
        config.meditation.default_volume = 1.5;
        let msgs = messages(&config);
        assert!(msgs.iter().any(|m| m.contains("meditation.default_volume")));
    }

    #[test]
    fn errors_are_collected_not_short_circuited() {
        let mut config = AletheiaConfig::default();
        config.storage.database_path = " ".into();
        config.chat.history_window = 0;
        config.app.log_level = "loud".into();
        assert_eq!(messages(&config).len(), 3);
    }

    #[test]
    fn gateway_url_must_be_http() {
        let mut config = AletheiaConfig::default();
        config.gateway.base_url = "ftp://example".into();
        assert!(messages(&config)[0].contains("gateway.base_url"));
    }

    #[test]
    fn zero_speech_rate_is_rejected() {
        let mut config = AletheiaConfig::default();
        config.chat.speech_rate = 0.0;
        assert!(messages(&config)[0].contains("chat.speech_rate"));
    }
}
