//! Prompt construction and bounded conversation history

use std::collections::VecDeque;

use crate::intention::{intention_schema, Action, Purpose};
use crate::llm::provider::{ChatMessage, ChatRole};

/// Build the system prompt: the action vocabulary plus the intention schema
pub fn system_prompt() -> String {
    let mut s = String::from(
        "You translate what a user needs to do into a UI intention.\n\
         Describe WHAT the user must accomplish, never which widget to show.\n\n",
    );

    s.push_str("AVAILABLE ACTIONS:\n");
    for action in Action::ALL {
        s.push_str(&format!("- {}: {}\n", action.as_str(), action_hint(action)));
    }

    let purposes: Vec<&str> = Purpose::ALL.iter().map(|p| p.as_str()).collect();
    s.push_str(&format!("\nPURPOSES: {}\n", purposes.join(", ")));

    let schema = serde_json::to_string_pretty(intention_schema()).unwrap_or_default();
    s.push_str("\nOUTPUT FORMAT (one JSON object matching this schema, no prose):\n");
    s.push_str(&schema);
    s.push_str(
        "\n\nExample:\n\
         \"ask before deleting the file\" -> {\"action\": \"confirm\", \"subject\": \
         {\"type\": \"file\", \"label\": \"Delete report.pdf?\"}, \"purpose\": \"confirm\"}\n",
    );
    s
}

fn action_hint(action: Action) -> &'static str {
    match action {
        Action::ChooseOne => "pick exactly one option (subject.constraints.options required)",
        Action::ChooseMany => "pick any number of options (subject.constraints.options required)",
        Action::ProvideText => "enter free text",
        Action::ProvideData => "fill in structured data",
        Action::Confirm => "approve or reject a decision",
        Action::Acknowledge => "note that something happened",
        Action::Review => "read information without changing it",
        Action::Navigate => "move somewhere else",
        Action::Wait => "wait for work in progress",
        Action::Alert => "be warned about a condition",
    }
}

/// Messages sent to the provider, oldest turns evicted beyond `limit`
///
/// The system prompt sits outside the window and is never evicted.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    system_prompt: String,
    turns: VecDeque<ChatMessage>,
    limit: usize,
}

impl ConversationHistory {
    pub fn new(limit: usize) -> Self {
        Self::with_system_prompt(system_prompt(), limit)
    }

    pub fn with_system_prompt(system_prompt: impl Into<String>, limit: usize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            turns: VecDeque::new(),
            limit,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Append a turn; system messages are folded into the system prompt
    pub fn push(&mut self, message: ChatMessage) {
        if message.role == ChatRole::System {
            self.system_prompt.push_str("\n\n");
            self.system_prompt.push_str(&message.content);
            return;
        }

        self.turns.push_back(message);
        while self.turns.len() > self.limit {
            self.turns.pop_front();
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    pub fn turns(&self) -> impl Iterator<Item = &ChatMessage> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Full message list for a provider call, system prompt first
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::system(self.system_prompt.clone()))
            .chain(self.turns.iter().cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_lists_every_action() {
        let prompt = system_prompt();
        for action in Action::ALL {
            assert!(prompt.contains(action.as_str()), "{} missing", action.as_str());
        }
        assert!(prompt.contains("draft-07"));
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = ConversationHistory::with_system_prompt("sys", 3);
        for i in 0..5 {
            history.push_user(format!("turn {}", i));
        }
        assert_eq!(history.len(), 3);

        let messages = history.to_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "turn 2");
        assert_eq!(messages[3].content, "turn 4");
    }

    #[test]
    fn test_system_messages_never_evicted() {
        let mut history = ConversationHistory::with_system_prompt("base", 1);
        history.push(ChatMessage::system("extra rule"));
        history.push_user("a");
        history.push_assistant("b");

        assert_eq!(history.len(), 1);
        assert!(history.system_prompt().contains("extra rule"));
        assert!(history.system_prompt().starts_with("base"));
    }
}
