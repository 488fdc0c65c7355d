// SPDX-FileCopyrightText: 2026 Aletheia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for an OpenAI-compatible chat completions endpoint.
//!
//! One attempt per call. Transport failures and non-2xx statuses both come
//! back as [`AletheiaError::Provider`].

use std::time::Duration;

use aletheia_core::AletheiaError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// Authenticated client bound to one completions URL.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: reqwest::Client,
    url: String,
    default_model: String,
}

impl GatewayClient {
    pub fn new(
        api_key: &str,
        url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AletheiaError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| AletheiaError::Config(format!("invalid API key header value: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| AletheiaError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            url: url.into(),
            default_model: model.into(),
        })
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one completion request.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AletheiaError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| AletheiaError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let body = response.text().await.map_err(|e| AletheiaError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            warn!(status = %status, "completion request rejected");
            return Err(AletheiaError::provider(describe_failure(status, &body)));
        }

        serde_json::from_str(&body).map_err(|e| AletheiaError::Provider {
            message: format!("failed to parse completion response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match status.as_u16() {
        429 => "rate limit exceeded, please try again shortly".to_string(),
        402 => "AI credits exhausted for this workspace".to_string(),
        _ => match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(api_err) => match api_err.error.type_ {
                Some(kind) => format!("gateway error ({kind}): {}", api_err.error.message),
                None => format!("gateway error: {}", api_err.error.message),
            },
            Err(_) => format!("gateway returned {status}: {body}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GatewayClient {
        GatewayClient::new(
            "test-key",
            format!("{}/v1/chat/completions", server.uri()),
            "test-model",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "test-model".into(),
            messages: vec![ApiMessage::new("user", "Hello")],
            max_tokens: None,
        }
    }

    #[tokio::test]
    async fn complete_success_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({"model": "test-model"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "cmpl-1",
                "model": "test-model",
                "choices": [{"message": {"role": "assistant", "content": "Hi!"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 3, "completion_tokens": 1}
            })))
            .mount(&server)
            .await;

        let resp = client_for(&server).complete(&request()).await.unwrap();
        assert_eq!(resp.first_content(), Some("Hi!"));
        assert_eq!(resp.usage.unwrap().prompt_tokens, 3);
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"type": "overloaded", "message": "busy"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, AletheiaError::Provider { .. }));
        assert!(err.to_string().contains("overloaded"), "got: {err}");
    }

    #[tokio::test]
    async fn rate_limit_has_friendly_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("rate limit"), "got: {err}");
    }

    #[tokio::test]
    async fn non_json_success_body_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse"), "got: {err}");
    }
}
