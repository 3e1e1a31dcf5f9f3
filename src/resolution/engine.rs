//! Resolution engine - turns an intention plus constraints into a resolution
//!
//! The engine holds nothing mutable. One instance can be shared across threads
//! and every call is a pure function of its inputs and the injected rule table
//! (apart from the fresh id and timestamp).

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde_json::Value;

use crate::affinity::rule::AffinityRule;
use crate::affinity::table::{default_rule_table, RuleTable};
use crate::affinity::traits::{action_to_traits, enhance_traits_for_constraints, ManifestationTraits};
use crate::constraint::{calculate_constraint_specificity, weight_of, ConstraintDimension, ConstraintSet};
use crate::core::config::ResolverConfig;
use crate::core::error::{IntentError, Result, Violation, ViolationKind};
use crate::core::types::ResolutionId;
use crate::intention::{validate_intention, Action, Intention};
use crate::render::instructions::build_render_instructions;
use crate::resolution::pattern::{action_to_pattern, ResolutionPattern};
use crate::resolution::types::{Manifestation, Reasoning, Resolution};

/// Action substituted for an unrecognised one; its default pattern is `display`
const DEGRADED_ACTION: Action = Action::Review;

/// One item of a batch resolve
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub intention: Intention,
    pub constraints: ConstraintSet,
}

impl ResolveRequest {
    pub fn new(intention: Intention, constraints: ConstraintSet) -> Self {
        Self {
            intention,
            constraints,
        }
    }
}

/// A scored candidate pattern and the rules backing it
struct Candidate<'r> {
    pattern: ResolutionPattern,
    rules: Vec<&'r AffinityRule>,
    confidence: f32,
    traits: ManifestationTraits,
}

/// Resolves intentions against an injected rule table
pub struct ResolutionEngine {
    rules: Arc<RuleTable>,
    config: ResolverConfig,
}

impl ResolutionEngine {
    /// Engine over `rules`; fails with `InvalidConfig` when the tunables are inconsistent
    pub fn new(rules: Arc<RuleTable>, config: ResolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { rules, config })
    }

    /// Engine over the built-in rule table with default tunables
    pub fn with_default_rules() -> Self {
        Self {
            rules: default_rule_table(),
            config: ResolverConfig::default(),
        }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a trusted intention
    pub fn resolve(&self, intention: &Intention, constraints: &ConstraintSet) -> Result<Resolution> {
        intention.validate()?;
        Ok(self.resolve_validated(intention, constraints, None))
    }

    /// Resolve raw JSON from an untrusted source
    ///
    /// An unrecognised action is the one failure that degrades instead of
    /// failing: the intention is resolved as a `review` (display pattern) and
    /// the original action string is recorded in the reasoning.
    pub fn resolve_untrusted(&self, raw: &Value, constraints: &ConstraintSet) -> Result<Resolution> {
        let violations = match validate_intention(raw) {
            Ok(intention) => return Ok(self.resolve_validated(&intention, constraints, None)),
            Err(IntentError::SchemaViolation(violations)) => violations,
            Err(e) => return Err(e),
        };

        let Some(found) = unknown_action_only(&violations) else {
            return Err(IntentError::SchemaViolation(violations));
        };

        let mut substituted = raw.clone();
        if let Some(obj) = substituted.as_object_mut() {
            obj.insert("action".into(), Value::String(DEGRADED_ACTION.as_str().into()));
        }
        let intention = validate_intention(&substituted)?;

        tracing::warn!(
            "Unrecognised action '{}', degrading to {}",
            found,
            action_to_pattern(DEGRADED_ACTION).as_str()
        );
        Ok(self.resolve_validated(&intention, constraints, Some(found)))
    }

    /// Resolve a batch in parallel; results keep request order
    pub fn resolve_all(&self, requests: &[ResolveRequest]) -> Vec<Result<Resolution>> {
        requests
            .par_iter()
            .map(|req| self.resolve(&req.intention, &req.constraints))
            .collect()
    }

    fn resolve_validated(
        &self,
        intention: &Intention,
        constraints: &ConstraintSet,
        degraded_from: Option<String>,
    ) -> Resolution {
        let id = ResolutionId::new();
        let action = intention.action();
        let applied = effective_constraints(intention, constraints);
        let total = calculate_constraint_specificity(&applied);

        let matched = self.rules.find_matching_rules(action, &applied);
        let default_pattern = action_to_pattern(action);

        let mut patterns: Vec<ResolutionPattern> = std::iter::once(default_pattern)
            .chain(matched.iter().filter_map(|r| r.pattern))
            .collect();
        patterns.sort();
        patterns.dedup();

        let mut candidates: Vec<Candidate> = patterns
            .iter()
            .map(|&pattern| self.score(action, default_pattern, pattern, &matched, total))
            .collect();
        // Confidence desc, declaration order on ties
        candidates.sort_by_key(|c| (Reverse(OrderedFloat(c.confidence)), c.pattern));

        let winner = &candidates[0];
        let alternatives: Vec<Manifestation> = candidates[1..]
            .iter()
            .filter(|c| winner.confidence - c.confidence <= self.config.alternative_margin)
            .take(self.config.max_alternatives)
            .map(|c| manifest(c, id))
            .collect();

        let mut dominant: Vec<ConstraintDimension> =
            matched.iter().flat_map(|r| r.dimensions()).collect();
        dominant.sort();
        dominant.dedup();

        let explanation = explain(action, default_pattern, winner, total, degraded_from.as_deref());

        tracing::debug!(
            "Resolved {} -> {} (confidence {:.2}, {} rules, {} alternatives)",
            action.as_str(),
            winner.pattern.as_str(),
            winner.confidence,
            matched.len(),
            alternatives.len()
        );

        Resolution {
            id,
            timestamp: Utc::now(),
            manifestation: manifest(winner, id),
            reasoning: Reasoning {
                dominant_constraints: dominant,
                considered_patterns: patterns,
                matched_rules: matched.iter().map(|r| r.id.clone()).collect(),
                confidence: winner.confidence,
                explanation,
                degraded_from,
            },
            alternatives,
            source_intention: intention.clone(),
            applied_constraints: applied,
        }
    }

    fn score<'r>(
        &self,
        action: Action,
        default_pattern: ResolutionPattern,
        pattern: ResolutionPattern,
        matched: &[&'r AffinityRule],
        total: u32,
    ) -> Candidate<'r> {
        let rules: Vec<&AffinityRule> = matched
            .iter()
            .copied()
            .filter(|r| r.supports(pattern))
            .collect();

        let explained: Vec<ConstraintDimension> = rules.iter().flat_map(|r| r.dimensions()).collect();
        let start = if pattern == default_pattern {
            self.config.base_confidence
        } else {
            self.config.alternative_base
        };
        let confidence = confidence(start, weight_of(&explained), total);

        let baseline = if pattern == default_pattern {
            action_to_traits(action)
        } else {
            pattern.baseline_traits()
        };
        // Lowest precedence first so the strongest rule has the last word
        let traits = rules
            .iter()
            .rev()
            .fold(baseline, |t, r| enhance_traits_for_constraints(&t, &r.required_traits));

        Candidate {
            pattern,
            rules,
            confidence,
            traits,
        }
    }
}

/// `start` moved toward 1.0 by the share of constraint weight the rules explain
///
/// Written as `start * (1 - r) + r` so both ends are exact.
fn confidence(start: f32, explained: u32, total: u32) -> f32 {
    if total == 0 {
        return start.clamp(0.0, 1.0);
    }
    let ratio = (f64::from(explained) / f64::from(total)).min(1.0);
    let value = f64::from(start) * (1.0 - ratio) + ratio;
    (value as f32).clamp(0.0, 1.0)
}

/// Constraints as applied: the intention's urgency hint fills an unset context urgency
fn effective_constraints(intention: &Intention, constraints: &ConstraintSet) -> ConstraintSet {
    let mut applied = constraints.clone();
    if applied.context.urgency.is_none() {
        applied.context.urgency = intention.urgency_hint();
    }
    applied
}

/// The unrecognised action string, if that is the only thing wrong
fn unknown_action_only(violations: &[Violation]) -> Option<String> {
    match violations {
        [Violation {
            path,
            kind: ViolationKind::NotInEnum { found, .. },
        }] if path == "action" => Some(found.clone()),
        _ => None,
    }
}

fn manifest(candidate: &Candidate, id: ResolutionId) -> Manifestation {
    Manifestation {
        pattern: candidate.pattern,
        traits: candidate.traits,
        render: build_render_instructions(candidate.pattern, &candidate.traits, id),
        confidence: candidate.confidence,
    }
}

fn explain(
    action: Action,
    default_pattern: ResolutionPattern,
    winner: &Candidate,
    total: u32,
    degraded_from: Option<&str>,
) -> String {
    let mut parts = Vec::new();

    if let Some(found) = degraded_from {
        parts.push(format!(
            "Action '{}' is not recognised; degraded to the {} pattern.",
            found,
            winner.pattern.as_str()
        ));
    }

    if winner.rules.is_empty() {
        parts.push(format!(
            "No affinity rule matched '{}'; using its default {} pattern.",
            action.as_str(),
            default_pattern.as_str()
        ));
    } else {
        let ids: Vec<&str> = winner.rules.iter().map(|r| r.id.as_str()).collect();
        let explained: Vec<ConstraintDimension> =
            winner.rules.iter().flat_map(|r| r.dimensions()).collect();
        parts.push(format!(
            "'{}' resolved to {} via {} (explains {} of {} constraint weight).",
            action.as_str(),
            winner.pattern.as_str(),
            ids.join(", "),
            weight_of(&explained),
            total
        ));
        if winner.pattern != default_pattern {
            parts.push(format!(
                "Overrides the default {} pattern.",
                default_pattern.as_str()
            ));
        }
    }

    parts.join(" ")
}
