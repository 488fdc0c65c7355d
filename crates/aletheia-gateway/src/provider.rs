// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`ProviderAdapter`] over the chat completions client.

use std::time::Duration;

use aletheia_config::model::GatewayConfig;
use aletheia_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use aletheia_core::{AletheiaError, PluginAdapter, ProviderAdapter};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::GatewayClient;
use crate::types::{ApiMessage, ChatCompletionRequest};

/// Completion provider backed by an OpenAI-compatible HTTP gateway.
pub struct GatewayProvider {
    client: GatewayClient,
}

impl GatewayProvider {
    /// Builds a provider from configuration.
    ///
    /// The key comes from `gateway.api_key`; the config loader has already
    /// folded in `ALETHEIA_API_KEY` or `LOVABLE_API_KEY` when the file left
    /// it unset.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, AletheiaError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = GatewayClient::new(
            api_key,
            config.base_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;
        info!(model = %config.model, url = %config.base_url, "gateway provider initialized");
        Ok(Self { client })
    }

    pub fn with_client(client: GatewayClient) -> Self {
        Self { client }
    }

    fn to_completion_request(&self, request: ProviderRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system_prompt {
            messages.push(ApiMessage::new("system", system));
        }
        messages.extend(
            request
                .messages
                .into_iter()
                .map(|m| ApiMessage::new(m.role, m.content)),
        );
        ChatCompletionRequest {
            model: request
                .model
                .unwrap_or_else(|| self.client.default_model().to_string()),
            messages,
            max_tokens: request.max_tokens,
        }
    }
}

fn resolve_api_key(configured: Option<&str>) -> Result<&str, AletheiaError> {
    match configured.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(AletheiaError::Config(
            "gateway API key not found. Set gateway.api_key in config or the \
             ALETHEIA_API_KEY environment variable."
                .into(),
        )),
    }
}

#[async_trait]
impl PluginAdapter for GatewayProvider {
    fn name(&self) -> &str {
        "gateway"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AletheiaError> {
        // Probing the endpoint would spend credits.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AletheiaError> {
        debug!("gateway provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GatewayProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AletheiaError> {
        let api_request = self.to_completion_request(request);
        let response = self.client.complete(&api_request).await?;

        let content = response
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| AletheiaError::malformed("completion response had no content"))?;
        let stop_reason = response
            .choices
            .first()
            .and_then(|c| c.finish_reason.clone());

        Ok(ProviderResponse {
            id: response.id.unwrap_or_default(),
            content,
            model: response.model.unwrap_or(api_request.model),
            stop_reason,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}
