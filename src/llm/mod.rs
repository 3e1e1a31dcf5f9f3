//! LLM integration: ask a model for an intention, never for a widget
//!
//! The model only proposes intentions. Everything it returns is untrusted and
//! goes through schema validation before the resolution engine sees it.

pub mod adapter;
pub mod client;
pub mod parser;
pub mod prompt;
pub mod provider;

pub use adapter::IntentionAdapter;
pub use client::{ApiFormat, LlmClient};
pub use parser::{extract_json, parse_intention_response};
pub use prompt::{system_prompt, ConversationHistory};
pub use provider::{ChatMessage, ChatRole, LlmProvider, MockLlmProvider, ProviderResponse};
