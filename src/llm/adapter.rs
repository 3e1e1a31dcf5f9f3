//! LLM adapter: conversation in, validated intention out
//!
//! The provider is the only async piece of the pipeline. The adapter bounds
//! each call with a timeout and can race it against a cancellation signal.
//! There are no retries; every failure comes back typed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::ResolverConfig;
use crate::core::error::{IntentError, Result};
use crate::intention::ParseResult;
use crate::llm::parser::parse_intention_response;
use crate::llm::prompt::ConversationHistory;
use crate::llm::provider::{LlmProvider, ProviderResponse};

pub struct IntentionAdapter {
    provider: Arc<dyn LlmProvider>,
    timeout: Duration,
}

impl IntentionAdapter {
    pub fn new(provider: Arc<dyn LlmProvider>, config: &ResolverConfig) -> Self {
        Self {
            provider,
            timeout: config.llm_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the provider for an intention given the conversation so far
    pub async fn interpret(&self, history: &ConversationHistory) -> ParseResult {
        let response = self.call(history).await?;
        parse_intention_response(&response.content)
    }

    /// Like [`interpret`](Self::interpret), abandoned as soon as `cancel` resolves
    pub async fn interpret_until<F>(&self, history: &ConversationHistory, cancel: F) -> ParseResult
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                tracing::debug!("Provider call cancelled");
                Err(IntentError::Cancelled)
            }
            result = self.interpret(history) => result,
        }
    }

    /// One conversational turn: records the user text and the raw reply
    ///
    /// The reply is kept in history even when it fails validation so a
    /// follow-up turn can ask the model to correct itself. When the provider
    /// fails, times out or the future is dropped, `history` is left unchanged.
    pub async fn converse(
        &self,
        history: &mut ConversationHistory,
        utterance: impl Into<String>,
    ) -> ParseResult {
        let mut turn = history.clone();
        turn.push_user(utterance);
        let response = self.call(&turn).await?;
        turn.push_assistant(response.content.clone());
        *history = turn;
        parse_intention_response(&response.content)
    }

    async fn call(&self, history: &ConversationHistory) -> Result<ProviderResponse> {
        let messages = history.to_messages();
        match tokio::time::timeout(self.timeout, self.provider.complete(&messages)).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => {
                tracing::warn!("Provider call failed: {}", e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!("Provider call timed out after {:?}", self.timeout);
                Err(IntentError::ProviderTimeout(self.timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intention::Action;
    use crate::llm::provider::MockLlmProvider;

    const REVIEW: &str =
        r#"{"action":"review","subject":{"type":"order","label":"Order #42"},"purpose":"inform"}"#;

    fn adapter(mock: MockLlmProvider) -> IntentionAdapter {
        IntentionAdapter::new(Arc::new(mock), &ResolverConfig::default())
    }

    #[tokio::test]
    async fn test_interpret_parses_reply() {
        let adapter = adapter(MockLlmProvider::new().with_fallback(REVIEW));
        let mut history = ConversationHistory::new(4);
        history.push_user("show me the order");

        let intention = adapter.interpret(&history).await.unwrap();
        assert_eq!(intention.action(), Action::Review);
    }

    #[tokio::test]
    async fn test_converse_records_both_turns() {
        let adapter = adapter(MockLlmProvider::new().on("order", REVIEW));
        let mut history = ConversationHistory::new(4);

        adapter.converse(&mut history, "show me the order").await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let mock = MockLlmProvider::new()
            .with_fallback(REVIEW)
            .with_delay(Duration::from_millis(500));
        let adapter = adapter(mock).with_timeout(Duration::from_millis(20));

        let err = adapter.interpret(&ConversationHistory::new(4)).await.unwrap_err();
        assert!(matches!(err, IntentError::ProviderTimeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_timed_out_turn_leaves_history_untouched() {
        let mock = MockLlmProvider::new()
            .with_fallback(REVIEW)
            .with_delay(Duration::from_millis(300));
        let adapter = adapter(mock).with_timeout(Duration::from_millis(10));
        let mut history = ConversationHistory::new(4);
        history.push_user("earlier question");
        history.push_assistant(REVIEW);

        let err = adapter.converse(&mut history, "delete it").await.unwrap_err();
        assert!(matches!(err, IntentError::ProviderTimeout(_)));
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_history_untouched() {
        let broken = adapter(MockLlmProvider::new().failing("connection reset"));
        let mut history = ConversationHistory::new(4);

        let err = broken.converse(&mut history, "delete it").await.unwrap_err();
        assert!(matches!(err, IntentError::ProviderFailure(_)));
        assert!(history.is_empty());

        // A later successful turn starts from the same clean state
        let working = adapter(MockLlmProvider::new().with_fallback(REVIEW));
        working.converse(&mut history, "show the order").await.unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_ready_cancel_wins() {
        let adapter = adapter(MockLlmProvider::new().with_fallback(REVIEW));
        let err = adapter
            .interpret_until(&ConversationHistory::new(4), std::future::ready(()))
            .await
            .unwrap_err();
        assert!(matches!(err, IntentError::Cancelled));
    }
}
