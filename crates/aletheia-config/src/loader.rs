// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with figment.
//!
//! Merge order, later wins: compiled defaults, `/etc/aletheia/aletheia.toml`,
//! `~/.config/aletheia/aletheia.toml`, `./aletheia.toml`, then `ALETHEIA_*`
//! environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::AletheiaConfig;

/// Section names recognised in `ALETHEIA_<SECTION>_<KEY>` variables.
const SECTIONS: &[&str] = &[
    "app",
    "gateway",
    "storage",
    "chat",
    "meditation",
    "insights",
    "voice",
];

const SYSTEM_CONFIG: &str = "/etc/aletheia/aletheia.toml";
const LOCAL_CONFIG: &str = "aletheia.toml";

fn user_config() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("aletheia").join("aletheia.toml"))
        .unwrap_or_default()
}

/// Every file the standard hierarchy reads, lowest precedence first.
pub fn standard_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(SYSTEM_CONFIG),
        user_config(),
        PathBuf::from(LOCAL_CONFIG),
    ]
}

/// The figment for the standard hierarchy, before extraction.
pub fn build_figment() -> Figment {
    standard_paths()
        .into_iter()
        .fold(defaults(), |fig, path| fig.merge(Toml::file(path)))
        .merge(env_provider())
}

/// Loads from the standard hierarchy with environment overrides.
pub fn load_config() -> Result<AletheiaConfig, figment::Error> {
    with_api_key_fallback(build_figment().extract()?)
}

/// Loads one explicit file plus environment overrides.
pub fn load_config_from_path(path: &Path) -> Result<AletheiaConfig, figment::Error> {
    let config = defaults()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?;
    with_api_key_fallback(config)
}

/// Loads from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<AletheiaConfig, figment::Error> {
    defaults().merge(Toml::string(toml_content)).extract()
}

fn defaults() -> Figment {
    Figment::new().merge(Serialized::defaults(AletheiaConfig::default()))
}

/// Fills `gateway.api_key` from the conventional unprefixed variables when
/// neither a file nor `ALETHEIA_GATEWAY_API_KEY` provided one.
fn with_api_key_fallback(mut config: AletheiaConfig) -> Result<AletheiaConfig, figment::Error> {
    if config.gateway.api_key.is_none() {
        config.gateway.api_key = ["ALETHEIA_API_KEY", "LOVABLE_API_KEY"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
    }
    Ok(config)
}

/// Maps `ALETHEIA_CHAT_HISTORY_WINDOW` to `chat.history_window`.
///
/// Only the first underscore after a known section becomes a dot, so keys
/// that contain underscores survive intact.
fn env_provider() -> Env {
    Env::prefixed("ALETHEIA_")
        .ignore(&["API_KEY"])
        .map(|key| {
            let raw = key.as_str();
            SECTIONS
                .iter()
                .find_map(|section| {
                    raw.strip_prefix(section)
                        .and_then(|rest| rest.strip_prefix('_'))
                        .map(|field| format!("{section}.{field}"))
                })
                .unwrap_or_else(|| raw.to_string())
                .into()
        })
}
