//! Completion gateway abstraction.
//!
//! Every natural-language output in the advisor - per-tool insights and the
//! final unified response - goes through the [`CompletionGateway`] trait:
//! prompt messages in, text out, may fail. The production implementation is
//! [`OpenRouterClient`]; tests substitute a scripted mock.

mod error;
mod openrouter;

pub use error::{ApiErrorResponse, GatewayError};
pub use openrouter::OpenRouterClient;

use std::future::Future;

use serde::{Deserialize, Serialize};

use bazarify_core::ChatRole;

/// A single chat message sent to or received from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Per-request completion options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self { temperature: 0.7 }
    }
}

impl CompletionOptions {
    /// Options with a specific temperature.
    #[must_use]
    pub const fn with_temperature(temperature: f32) -> Self {
        Self { temperature }
    }
}

/// A language-model completion endpoint: prompt in, text out, may fail.
pub trait CompletionGateway: Send + Sync {
    /// Request a completion for the given conversation.
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

impl<G: CompletionGateway> CompletionGateway for &G {
    fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send {
        (**self).complete(messages, options)
    }
}
