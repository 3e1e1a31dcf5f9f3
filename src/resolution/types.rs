//! Resolution output types

use serde::{Deserialize, Serialize};

use crate::affinity::traits::ManifestationTraits;
use crate::constraint::{ConstraintDimension, ConstraintSet};
use crate::core::types::{ResolutionId, Timestamp};
use crate::intention::Intention;
use crate::render::instructions::RenderInstructions;
use crate::resolution::pattern::ResolutionPattern;

/// A concrete trait-and-render description for one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifestation {
    pub pattern: ResolutionPattern,
    pub traits: ManifestationTraits,
    pub render: RenderInstructions,
    pub confidence: f32,
}

/// Why the engine chose what it chose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reasoning {
    /// Dimensions referenced by at least one matching rule
    pub dominant_constraints: Vec<ConstraintDimension>,
    /// Every candidate pattern, selected or not
    pub considered_patterns: Vec<ResolutionPattern>,
    /// Matching rule ids, highest precedence first
    pub matched_rules: Vec<String>,
    pub confidence: f32,
    pub explanation: String,
    /// Unrecognised action string the resolution degraded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_from: Option<String>,
}

/// Full, provenance-carrying output of one resolve call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub id: ResolutionId,
    pub timestamp: Timestamp,
    pub manifestation: Manifestation,
    pub reasoning: Reasoning,
    pub alternatives: Vec<Manifestation>,
    pub source_intention: Intention,
    pub applied_constraints: ConstraintSet,
}

impl Resolution {
    pub fn pattern(&self) -> ResolutionPattern {
        self.manifestation.pattern
    }

    pub fn traits(&self) -> &ManifestationTraits {
        &self.manifestation.traits
    }

    pub fn confidence(&self) -> f32 {
        self.reasoning.confidence
    }

    pub fn is_degraded(&self) -> bool {
        self.reasoning.degraded_from.is_some()
    }
}
