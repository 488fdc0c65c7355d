// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote analysis gateway for Aletheia.
//!
//! [`GatewayProvider`] speaks the OpenAI-compatible chat completions
//! protocol; [`AnalysisGateway`] layers the fixed prompts and response
//! validation on top of any [`ProviderAdapter`](aletheia_core::ProviderAdapter).

pub mod analysis;
pub mod client;
pub mod parse;
pub mod prompts;
pub mod provider;
pub mod types;

pub use analysis::{AnalysisGateway, MeditationScript};
pub use client::GatewayClient;
pub use parse::ConversationDigest;
pub use provider::GatewayProvider;
