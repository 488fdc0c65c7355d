// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock completion provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies
//! and records every request it receives.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use aletheia_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use aletheia_core::{AletheiaError, PluginAdapter, ProviderAdapter};
use async_trait::async_trait;

use crate::lock;

enum Reply {
    Text(String),
    Fail(String),
}

/// A mock provider that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockProvider {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ProviderRequest>>,
    latency: Mutex<Duration>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            latency: Mutex::new(Duration::ZERO),
        }
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = Self::new();
        for response in responses {
            provider.add_response(response);
        }
        provider
    }

    /// Queue a successful reply.
    pub fn add_response(&self, text: impl Into<String>) {
        lock(&self.replies).push_back(Reply::Text(text.into()));
    }

    /// Queue a transport failure.
    pub fn add_failure(&self, message: impl Into<String>) {
        lock(&self.replies).push_back(Reply::Fail(message.into()));
    }

    /// Delay every reply by `latency` on the tokio clock.
    pub fn set_latency(&self, latency: Duration) {
        *lock(&self.latency) = latency;
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Replies still queued.
    pub fn pending(&self) -> usize {
        lock(&self.replies).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, AletheiaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), AletheiaError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AletheiaError> {
        let model = request.model.clone().unwrap_or_else(|| "mock-model".to_string());
        lock(&self.requests).push(request);

        let latency = *lock(&self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let reply = lock(&self.replies).pop_front();
        let text = match reply {
            Some(Reply::Text(text)) => text,
            Some(Reply::Fail(message)) => return Err(AletheiaError::provider(message)),
            None => "mock response".to_string(),
        };

        Ok(ProviderResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model,
            stop_reason: Some("stop".to_string()),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            }),
        })
    }
}
