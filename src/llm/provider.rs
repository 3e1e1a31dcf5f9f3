//! The provider capability and a scripted mock
//!
//! Anything that can turn a message list into text is a provider. The HTTP
//! client and the mock implement the same trait, so the adapter never knows
//! which one it is talking to.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::{IntentError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Raw text returned by a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub content: String,
}

impl ProviderResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// A language model reachable through one call
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Complete a conversation; the reply is free text that may contain JSON
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ProviderResponse>;
}

/// Deterministic provider for tests and offline use
///
/// Replies are picked by the first script key contained in the last user
/// message, else the fallback. With neither, the call fails.
#[derive(Debug, Default)]
pub struct MockLlmProvider {
    script: Vec<(String, String)>,
    fallback: Option<String>,
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockLlmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `reply` whenever the last user message contains `needle`
    pub fn on(mut self, needle: impl Into<String>, reply: impl Into<String>) -> Self {
        self.script.push((needle.into(), reply.into()));
        self
    }

    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// Fail every call with a transport error
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply_for(&self, messages: &[ChatMessage]) -> Option<&str> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        self.script
            .iter()
            .find(|(needle, _)| last_user.contains(needle.as_str()))
            .map(|(_, reply)| reply.as_str())
            .or(self.fallback.as_deref())
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ProviderResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            return Err(IntentError::ProviderFailure(reason.clone()));
        }

        self.reply_for(messages)
            .map(ProviderResponse::new)
            .ok_or_else(|| IntentError::ProviderFailure("mock has no scripted reply".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_matches_last_user_message() {
        let mock = MockLlmProvider::new()
            .on("delete", "{\"a\":1}")
            .on("pick", "{\"b\":2}");
        let messages = vec![
            ChatMessage::system("you are helpful"),
            ChatMessage::user("delete it"),
            ChatMessage::assistant("ok"),
            ChatMessage::user("now pick a colour"),
        ];
        let reply = mock.complete(&messages).await.unwrap();
        assert_eq!(reply.content, "{\"b\":2}");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_fallback_and_miss() {
        let messages = vec![ChatMessage::user("anything")];

        let with_fallback = MockLlmProvider::new().with_fallback("fallback");
        assert_eq!(with_fallback.complete(&messages).await.unwrap().content, "fallback");

        let bare = MockLlmProvider::new();
        assert!(matches!(
            bare.complete(&messages).await,
            Err(IntentError::ProviderFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockLlmProvider::new().with_fallback("x").failing("connection reset");
        let err = mock.complete(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_role_wire_names() {
        let json = serde_json::to_string(&ChatMessage::assistant("x")).unwrap();
        assert!(json.contains("\"assistant\""));
    }
}
