//! Async HTTP provider
//!
//! Model-agnostic client for Anthropic and OpenAI-compatible chat APIs
//! (DeepSeek and friends). It only moves text; parsing happens elsewhere.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::core::error::{IntentError, Result};
use crate::llm::provider::{ChatMessage, ChatRole, LlmProvider, ProviderResponse};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 2048;

/// API format type
#[derive(Debug, Clone, PartialEq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

/// HTTP implementation of [`LlmProvider`]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmClient {
    /// Create a new LLM client with explicit configuration
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = Self::detect_api_format(&api_url);
        Self {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
        }
    }

    fn detect_api_format(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }

    /// Create a client from environment variables
    ///
    /// Required: LLM_API_KEY
    /// Optional: LLM_API_URL (defaults to Anthropic API)
    /// Optional: LLM_MODEL
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("LLM_API_KEY")
            .map_err(|_| IntentError::ProviderFailure("LLM_API_KEY not set".into()))?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        Ok(Self::new(api_key, api_url, model))
    }

    pub fn api_format(&self) -> &ApiFormat {
        &self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_anthropic(&self, messages: &[ChatMessage]) -> Result<String> {
        // Anthropic takes the system prompt out of band
        let system = messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            system,
            messages: wire_messages(messages.iter().filter(|m| m.role != ChatRole::System)),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| IntentError::ProviderFailure(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(IntentError::ProviderFailure(format!("API error: {}", error_text)));
        }

        let completion: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| IntentError::ProviderFailure(e.to_string()))?;

        completion
            .content
            .first()
            .map(|c| c.text.clone())
            .ok_or_else(|| IntentError::ProviderFailure("Empty response".into()))
    }

    async fn complete_openai(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = OpenAIRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: wire_messages(messages.iter()),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| IntentError::ProviderFailure(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(IntentError::ProviderFailure(format!("API error: {}", error_text)));
        }

        let completion: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| IntentError::ProviderFailure(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| IntentError::ProviderFailure("Empty response".into()))
    }
}

#[async_trait]
impl LlmProvider for LlmClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ProviderResponse> {
        tracing::debug!(
            "Calling {:?} model {} with {} messages",
            self.api_format,
            self.model,
            messages.len()
        );
        let text = match self.api_format {
            ApiFormat::Anthropic => self.complete_anthropic(messages).await?,
            ApiFormat::OpenAI => self.complete_openai(messages).await?,
        };
        Ok(ProviderResponse::new(text))
    }
}

fn wire_messages<'a>(messages: impl Iterator<Item = &'a ChatMessage>) -> Vec<Message> {
    messages
        .map(|m| Message {
            role: m.role.as_str().into(),
            content: m.content.clone(),
        })
        .collect()
}

// Anthropic API format
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

// OpenAI-compatible API format
#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

// Shared
#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_format_detection() {
        let anthropic = LlmClient::new(
            "k".into(),
            "https://api.anthropic.com/v1/messages".into(),
            "m".into(),
        );
        assert_eq!(*anthropic.api_format(), ApiFormat::Anthropic);

        let compatible = LlmClient::new(
            "k".into(),
            "https://api.deepseek.com/chat/completions".into(),
            "deepseek-chat".into(),
        );
        assert_eq!(*compatible.api_format(), ApiFormat::OpenAI);
        assert_eq!(compatible.model(), "deepseek-chat");
    }

    #[test]
    fn test_wire_messages_keep_roles() {
        let messages = vec![ChatMessage::system("s"), ChatMessage::user("u")];
        let wire = wire_messages(messages.iter().filter(|m| m.role != ChatRole::System));
        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].role, "user");
    }

    #[test]
    fn test_from_env_missing_key() {
        let result = LlmClient::from_env();
        if std::env::var("LLM_API_KEY").is_err() {
            assert!(matches!(result, Err(IntentError::ProviderFailure(_))));
        }
    }
}
