// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aletheia doctor` command implementation.
//!
//! Checks the pieces every other command depends on without calling the
//! completion service.

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use aletheia_config::model::AletheiaConfig;
use aletheia_core::{AletheiaError, HealthStatus, PluginAdapter, StorageAdapter};
use aletheia_storage::SqliteStorage;
use aletheia_voice::{CommandPlayer, CommandSynthesizer};
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, message: impl Into<String>, started: Instant) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            duration: started.elapsed(),
        }
    }
}

pub async fn run_doctor(config: &AletheiaConfig, plain: bool) -> Result<bool, AletheiaError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = vec![
        check_database(config).await,
        check_api_key(config),
        check_synthesizer(config),
        check_player(config),
    ];

    println!("\n  aletheia doctor");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render(result, use_color));
    }
    println!();

    let failed = results.iter().filter(|r| r.status == CheckStatus::Fail).count();
    let warned = results.iter().filter(|r| r.status == CheckStatus::Warn).count();
    if failed + warned == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {failed} failed, {warned} warnings.");
    }
    Ok(failed == 0)
}

fn render(result: &CheckResult, use_color: bool) -> String {
    let ms = result.duration.as_millis();
    let (tag, message) = match (result.status, use_color) {
        (CheckStatus::Pass, true) => ("✓".green().to_string(), result.message.normal()),
        (CheckStatus::Warn, true) => ("!".yellow().to_string(), result.message.yellow()),
        (CheckStatus::Fail, true) => ("✗".red().to_string(), result.message.red()),
        (CheckStatus::Pass, false) => ("[OK]  ".to_string(), result.message.normal()),
        (CheckStatus::Warn, false) => ("[WARN]".to_string(), result.message.normal()),
        (CheckStatus::Fail, false) => ("[FAIL]".to_string(), result.message.normal()),
    };
    format!("    {tag} {:<14} {message} ({ms}ms)", result.name)
}

async fn check_database(config: &AletheiaConfig) -> CheckResult {
    let started = Instant::now();
    let storage = SqliteStorage::new(config.storage.clone());
    if let Err(e) = storage.initialize().await {
        return CheckResult::new("database", CheckStatus::Fail, e.to_string(), started);
    }
    let result = match storage.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            "database",
            CheckStatus::Pass,
            config.storage.database_path.clone(),
            started,
        ),
        Ok(HealthStatus::Degraded(reason)) => {
            CheckResult::new("database", CheckStatus::Warn, reason, started)
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            CheckResult::new("database", CheckStatus::Fail, reason, started)
        }
        Err(e) => CheckResult::new("database", CheckStatus::Fail, e.to_string(), started),
    };
    let _ = storage.close().await;
    result
}

fn check_api_key(config: &AletheiaConfig) -> CheckResult {
    let started = Instant::now();
    match config.gateway.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => CheckResult::new(
            "api key",
            CheckStatus::Pass,
            format!("set, model {}", config.gateway.model),
            started,
        ),
        _ => CheckResult::new(
            "api key",
            CheckStatus::Fail,
            "missing; set gateway.api_key or ALETHEIA_API_KEY",
            started,
        ),
    }
}

fn check_synthesizer(config: &AletheiaConfig) -> CheckResult {
    let started = Instant::now();
    match CommandSynthesizer::detect(&config.voice) {
        Some(tts) => CheckResult::new(
            "speech",
            CheckStatus::Pass,
            format!("{:?} synthesizer", tts.flavor()),
            started,
        ),
        None => CheckResult::new(
            "speech",
            CheckStatus::Warn,
            "no say/espeak found, replies will be printed",
            started,
        ),
    }
}

fn check_player(config: &AletheiaConfig) -> CheckResult {
    let started = Instant::now();
    let player = CommandPlayer::new(config.voice.player_command.as_deref());
    if player.is_silent() {
        CheckResult::new(
            "audio",
            CheckStatus::Warn,
            "no voice.player_command, meditations run without background audio",
            started,
        )
    } else {
        CheckResult::new("audio", CheckStatus::Pass, "background player configured", started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_fails() {
        let mut config = AletheiaConfig::default();
        config.gateway.api_key = None;
        assert_eq!(check_api_key(&config).status, CheckStatus::Fail);
        config.gateway.api_key = Some("sk-test".into());
        assert_eq!(check_api_key(&config).status, CheckStatus::Pass);
    }

    #[test]
    fn plain_rendering_has_tags() {
        let result = CheckResult::new("audio", CheckStatus::Warn, "quiet", Instant::now());
        let line = render(&result, false);
        assert!(line.contains("[WARN]"));
        assert!(line.contains("audio"));
    }

    #[tokio::test]
    async fn database_check_passes_on_a_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AletheiaConfig::default();
        config.storage.database_path = dir.path().join("doctor.db").to_string_lossy().to_string();
        assert_eq!(check_database(&config).await.status, CheckStatus::Pass);
    }
}
