//! Intention value objects
//!
//! An intention says what the user must accomplish. It never names a widget:
//! `action` and `subject.type` are set independently by the author and the
//! resolution engine decides what they mean visually.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constraint::Urgency;
use crate::core::error::{IntentError, Result, Violation, ViolationKind};

/// What the user must do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    ChooseOne,
    ChooseMany,
    ProvideText,
    ProvideData,
    Confirm,
    Acknowledge,
    Review,
    Navigate,
    Wait,
    Alert,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::ChooseOne,
        Action::ChooseMany,
        Action::ProvideText,
        Action::ProvideData,
        Action::Confirm,
        Action::Acknowledge,
        Action::Review,
        Action::Navigate,
        Action::Wait,
        Action::Alert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ChooseOne => "choose-one",
            Action::ChooseMany => "choose-many",
            Action::ProvideText => "provide-text",
            Action::ProvideData => "provide-data",
            Action::Confirm => "confirm",
            Action::Acknowledge => "acknowledge",
            Action::Review => "review",
            Action::Navigate => "navigate",
            Action::Wait => "wait",
            Action::Alert => "alert",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Selection actions need at least one option on the subject
    pub fn requires_options(&self) -> bool {
        matches!(self, Action::ChooseOne | Action::ChooseMany)
    }
}

/// Why the intention exists; governs urgency framing, not layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Request,
    Confirm,
    Inform,
    Alert,
    Progress,
}

impl Purpose {
    pub const ALL: [Purpose; 5] = [
        Purpose::Request,
        Purpose::Confirm,
        Purpose::Inform,
        Purpose::Alert,
        Purpose::Progress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Request => "request",
            Purpose::Confirm => "confirm",
            Purpose::Inform => "inform",
            Purpose::Alert => "alert",
            Purpose::Progress => "progress",
        }
    }
}

/// One selectable option of a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
            disabled: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = Some(true);
        self
    }
}

/// Limits on the value the user provides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Name of a host-side validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
}

/// The thing the intention is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Subject {
    /// Open semantic tag such as `option`, `email` or `record`
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<SubjectConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_hint: Option<String>,
}

impl Subject {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            value: None,
            constraints: None,
            description: None,
            icon_hint: None,
        }
    }

    pub fn options(&self) -> &[SelectOption] {
        self.constraints
            .as_ref()
            .and_then(|c| c.options.as_deref())
            .unwrap_or(&[])
    }
}

/// Sequencing metadata for multi-step resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlowMeta {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub sequence: u32,
    pub total_steps: u32,
    #[serde(default)]
    pub can_go_back: bool,
}

/// Free-form metadata; `urgency` doubles as an author urgency hint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A declarative statement of what the user must accomplish
///
/// Fields are private: an intention is immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Intention {
    action: Action,
    subject: Subject,
    purpose: Purpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flow: Option<FlowMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<IntentionMeta>,
}

impl Intention {
    pub fn new(action: Action, subject: Subject, purpose: Purpose) -> Self {
        Self {
            action,
            subject,
            purpose,
            flow: None,
            meta: None,
        }
    }

    pub fn with_flow(mut self, flow: FlowMeta) -> Self {
        self.flow = Some(flow);
        self
    }

    pub fn with_meta(mut self, meta: IntentionMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn flow(&self) -> Option<&FlowMeta> {
        self.flow.as_ref()
    }

    pub fn meta(&self) -> Option<&IntentionMeta> {
        self.meta.as_ref()
    }

    /// Urgency the author attached to the intention itself
    pub fn urgency_hint(&self) -> Option<Urgency> {
        self.meta.as_ref().and_then(|m| m.urgency)
    }

    /// Semantic checks the JSON shape alone cannot express
    pub fn validate(&self) -> Result<()> {
        let violations = self.semantic_violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(IntentError::SchemaViolation(violations))
        }
    }

    pub(crate) fn semantic_violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.subject.kind.trim().is_empty() {
            violations.push(Violation::new("subject.type", ViolationKind::Empty));
        }
        if self.subject.label.trim().is_empty() {
            violations.push(Violation::new("subject.label", ViolationKind::Empty));
        }

        let options = self.subject.options();
        if self.action.requires_options() && options.is_empty() {
            violations.push(Violation::new(
                "subject.constraints.options",
                ViolationKind::Invalid {
                    reason: format!("'{}' needs at least one option", self.action.as_str()),
                },
            ));
        }
        for (i, option) in options.iter().enumerate() {
            if options[..i].iter().any(|o| o.value == option.value) {
                violations.push(Violation::new(
                    format!("subject.constraints.options[{}].value", i),
                    ViolationKind::Invalid {
                        reason: format!("duplicate option value '{}'", option.value),
                    },
                ));
            }
        }

        if let Some(c) = &self.subject.constraints {
            if let (Some(min), Some(max)) = (c.min, c.max) {
                if min > max {
                    violations.push(Violation::new(
                        "subject.constraints.min",
                        ViolationKind::Invalid {
                            reason: format!("min ({}) exceeds max ({})", min, max),
                        },
                    ));
                }
            }
        }

        if let Some(flow) = &self.flow {
            if flow.sequence == 0 || flow.sequence > flow.total_steps {
                violations.push(Violation::new(
                    "flow.sequence",
                    ViolationKind::Invalid {
                        reason: format!(
                            "step {} is outside 1..={}",
                            flow.sequence, flow.total_steps
                        ),
                    },
                ));
            }
        }

        violations
    }
}
