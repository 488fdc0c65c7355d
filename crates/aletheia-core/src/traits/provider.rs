// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for the hosted chat-completion service.

use async_trait::async_trait;

use crate::error::AletheiaError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for a stateless chat-completion endpoint.
///
/// One request, one response. Implementations must not retry: a failed
/// call is reported to the caller exactly once.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, AletheiaError>;
}
