use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntentError {
    #[error("Schema violation: {}", join_violations(.0))]
    SchemaViolation(Vec<Violation>),

    #[error("Provider failure: {0}")]
    ProviderFailure(String),

    #[error("Provider timed out after {0:?}")]
    ProviderTimeout(Duration),

    #[error("Provider call cancelled")]
    Cancelled,

    #[error("Malformed provider output: {reason}")]
    MalformedProviderOutput { reason: String, raw: String },

    #[error("Invalid rule table: {0}")]
    InvalidRules(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl IntentError {
    /// Violations carried by a schema failure, empty for every other kind
    pub fn violations(&self) -> &[Violation] {
        match self {
            IntentError::SchemaViolation(v) => v,
            _ => &[],
        }
    }

    /// Raw provider text attached to a malformed-output failure
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            IntentError::MalformedProviderOutput { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, IntentError>;

/// A single failed check against an untrusted intention
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted path to the offending field, e.g. `subject.constraints.options[1].label`
    pub path: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViolationKind {
    Missing,
    WrongType { expected: String },
    NotInEnum { found: String, allowed: Vec<String> },
    UnexpectedField,
    Empty,
    Invalid { reason: String },
}

impl Violation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Top-level field the violation belongs to (`subject` for `subject.label`)
    pub fn field(&self) -> &str {
        self.path
            .split(['.', '['])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: required field is missing", self.path),
            ViolationKind::WrongType { expected } => {
                write!(f, "{}: expected {}", self.path, expected)
            }
            ViolationKind::NotInEnum { found, allowed } => write!(
                f,
                "{}: '{}' is not one of [{}]",
                self.path,
                found,
                allowed.join(", ")
            ),
            ViolationKind::UnexpectedField => write!(f, "{}: unexpected field", self.path),
            ViolationKind::Empty => write!(f, "{}: must not be empty", self.path),
            ViolationKind::Invalid { reason } => write!(f, "{}: {}", self.path, reason),
        }
    }
}
