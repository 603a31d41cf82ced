//! OpenRouter API client for chat completions.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::AdvisorConfig;

use super::error::{ApiErrorResponse, GatewayError};
use super::{ChatMessage, CompletionGateway, CompletionOptions};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// OpenRouter chat-completions client.
///
/// Cheaply cloneable; the HTTP client and model name live behind an `Arc`.
#[derive(Clone)]
pub struct OpenRouterClient {
    inner: Arc<OpenRouterClientInner>,
}

struct OpenRouterClientInner {
    client: reqwest::Client,
    model: String,
}

impl OpenRouterClient {
    /// Create a new OpenRouter client.
    ///
    /// The request timeout from the config applies to every completion
    /// call, including the per-tool calls that run concurrently.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AdvisorConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_value =
            HeaderValue::from_str(&bearer).expect("Invalid API key for header");
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        if let Ok(referer) = HeaderValue::from_str(&config.referer) {
            headers.insert("HTTP-Referer", referer);
        }
        if let Ok(title) = HeaderValue::from_str(&config.title) {
            headers.insert("X-Title", title);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(OpenRouterClientInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Handle a response, mapping error statuses to typed errors.
    async fn handle_response(&self, response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let completion: ChatCompletionResponse = serde_json::from_str(&body)
                .map_err(|e| GatewayError::Parse(format!("Failed to parse response: {e}")))?;

            completion
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .ok_or(GatewayError::EmptyResponse)
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Map an error status code to a typed error.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GatewayError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GatewayError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return GatewayError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    GatewayError::Api {
                        error_type: api_error.error.error_type,
                        message: api_error.error.message,
                    }
                } else {
                    GatewayError::Api {
                        error_type: "unknown".to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => GatewayError::Http(e),
        }
    }
}

impl CompletionGateway for OpenRouterClient {
    #[instrument(skip(self, messages), fields(model = %self.inner.model, message_count = messages.len()))]
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: self.inner.model.clone(),
            messages,
            temperature: options.temperature,
            stream: false,
        };

        let response = self
            .inner
            .client
            .post(OPENROUTER_API_URL)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

/// OpenRouter chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    stream: bool,
}

/// OpenRouter chat-completions response body.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"আপনার ব্যবসা ভালো চলছে"}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content, "আপনার ব্যবসা ভালো চলছে");
    }

    #[test]
    fn test_empty_choices_parses() {
        let body = r#"{"choices":[]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).expect("parse");
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn test_api_error_parsing() {
        let body = r#"{"error":{"type":"rate_limit","message":"slow down"}}"#;
        let parsed: ApiErrorResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.error.error_type, "rate_limit");
        assert_eq!(parsed.error.message, "slow down");
    }

    #[test]
    fn test_request_serializes_messages() {
        let request = ChatCompletionRequest {
            model: "openai/gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("প্রশ্ন")],
            temperature: 0.7,
            stream: false,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["model"], "openai/gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["stream"], false);
    }
}
