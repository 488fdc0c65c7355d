// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Aletheia.
//!
//! TOML with strict key checking, an XDG file hierarchy, `ALETHEIA_*`
//! environment overrides, and miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use aletheia_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("companion: {}", config.chat.persona_name);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, TomlSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::AletheiaConfig;

use std::path::Path;

/// Loads the standard hierarchy and validates the result.
pub fn load_and_validate() -> Result<AletheiaConfig, Vec<ConfigError>> {
    finish(loader::load_config(), read_sources(&loader::standard_paths()))
}

/// Loads one explicit file (plus env overrides) and validates the result.
pub fn load_and_validate_path(path: &Path) -> Result<AletheiaConfig, Vec<ConfigError>> {
    finish(
        loader::load_config_from_path(path),
        read_sources(&[path.to_path_buf()]),
    )
}

/// Loads a TOML string and validates the result.
pub fn load_and_validate_str(toml_content: &str) -> Result<AletheiaConfig, Vec<ConfigError>> {
    finish(
        loader::load_config_from_str(toml_content),
        vec![TomlSource::new("<inline>", toml_content)],
    )
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<AletheiaConfig, figment::Error>,
    sources: Vec<TomlSource>,
) -> Result<AletheiaConfig, Vec<ConfigError>> {
    match loaded {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err, &sources)),
    }
}

fn read_sources(paths: &[std::path::PathBuf]) -> Vec<TomlSource> {
    paths
        .iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(path).ok()?;
            let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
            Some(TomlSource::new(absolute.display().to_string(), content))
        })
        .collect()
}
