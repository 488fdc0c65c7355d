// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Aletheia configuration system.

use aletheia_config::diagnostic::ConfigError;
use aletheia_config::model::AletheiaConfig;
use aletheia_config::{load_and_validate_str, load_config_from_path, load_config_from_str};
use figment::Jail;

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[app]
name = "aletheia-dev"
log_level = "debug"
user_id = "alice"

[gateway]
api_key = "key-123"
base_url = "http://localhost:9999/v1/chat/completions"
model = "test-model"
timeout_secs = 5

[storage]
database_path = "/tmp/aletheia-test.db"
wal_mode = false

[chat]
persona_name = "Sol"
history_window = 6
speech_rate = 1.0
relisten_delay_ms = 100

[meditation]
segment_pause_ms = 10
speech_rate = 0.7
default_volume = 0.4
background_volume_ratio = 0.25
background_track = "rain.mp3"
recommendation_window_days = 3
recommendation_sample = 5

[insights]
distribution_limit = 50
recent_limit = 3

[voice]
lang = "en-GB"
pitch = 1.1
synthesizer_command = "espeak"
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.app.user_id, "alice");
    assert_eq!(config.gateway.api_key.as_deref(), Some("key-123"));
    assert_eq!(config.gateway.timeout_secs, 5);
    assert!(!config.storage.wal_mode);
    assert_eq!(config.chat.history_window, 6);
    assert_eq!(config.meditation.background_track, "rain.mp3");
    assert_eq!(config.meditation.recommendation_sample, 5);
    assert_eq!(config.insights.recent_limit, 3);
    assert_eq!(config.voice.synthesizer_command.as_deref(), Some("espeak"));
    assert!(config.voice.player_command.is_none());
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("defaults");
    assert_eq!(config.app.name, "aletheia");
    assert_eq!(config.chat.persona_name, "Sol");
    assert_eq!(config.chat.history_window, 10);
    assert_eq!(config.chat.relisten_delay_ms, 500);
    assert_eq!(config.meditation.segment_pause_ms, 2000);
    assert_eq!(config.meditation.background_volume_ratio, 0.3);
    assert_eq!(config.gateway.model, "google/gemini-2.5-flash");
    assert_eq!(config.insights.distribution_limit, 100);
}

#[test]
fn typo_produces_unknown_key_with_suggestion() {
    let toml = "[chat]\nhistory_windw = 3\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "history_windw");
            assert_eq!(suggestion.as_deref(), Some("history_window"));
            assert!(span.is_some(), "inline source should be located");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[telemetry]\nenabled = true\n").expect_err("unknown");
    assert!(matches!(errors[0], ConfigError::UnknownKey { ref key, .. } if key == "telemetry"));
}

#[test]
fn wrong_type_produces_invalid_type() {
    let errors =
        load_and_validate_str("[meditation]\nsegment_pause_ms = \"long\"\n").expect_err("type");
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => {
            assert_eq!(key, "meditation.segment_pause_ms")
        }
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let errors = load_and_validate_str("[insights]\nrecent_limit = 0\n").expect_err("invalid");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

#[test]
fn config_serializes_back_to_toml() {
    let config = AletheiaConfig::default();
    let text = toml::to_string(&config).expect("serialize");
    assert!(text.contains("[meditation]"));
    let reparsed = load_config_from_str(&text).expect("reparse");
    assert_eq!(reparsed.chat.persona_name, config.chat.persona_name);
}

#[test]
fn environment_overrides_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "aletheia.toml",
            "[chat]\nhistory_window = 20\npersona_name = \"Luna\"\n",
        )?;
        jail.set_env("ALETHEIA_CHAT_HISTORY_WINDOW", "4");
        jail.set_env("ALETHEIA_MEDITATION_SEGMENT_PAUSE_MS", "250");

        let config = load_config_from_path(&jail.directory().join("aletheia.toml"))?;
        assert_eq!(config.chat.history_window, 4);
        assert_eq!(config.chat.persona_name, "Luna");
        assert_eq!(config.meditation.segment_pause_ms, 250);
        Ok(())
    });
}

#[test]
fn api_key_falls_back_to_unprefixed_variable() {
    Jail::expect_with(|jail| {
        jail.create_file("aletheia.toml", "")?;
        jail.set_env("LOVABLE_API_KEY", "sk-from-env");

        let config = load_config_from_path(&jail.directory().join("aletheia.toml"))?;
        assert_eq!(config.gateway.api_key.as_deref(), Some("sk-from-env"));
        Ok(())
    });
}

#[test]
fn explicit_api_key_is_not_replaced() {
    Jail::expect_with(|jail| {
        jail.create_file("aletheia.toml", "[gateway]\napi_key = \"sk-file\"\n")?;
        jail.set_env("LOVABLE_API_KEY", "sk-from-env");

        let config = load_config_from_path(&jail.directory().join("aletheia.toml"))?;
        assert_eq!(config.gateway.api_key.as_deref(), Some("sk-file"));
        Ok(())
    });
}
