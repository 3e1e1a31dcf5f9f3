//! Affinity rule definitions

use serde::{Deserialize, Serialize};

use crate::affinity::traits::TraitOverrides;
use crate::constraint::{
    weight_of, ColorScheme, ConstraintDimension, ConstraintSet, Density, InputMethod,
    PointerType, Urgency, ViewportClass,
};
use crate::intention::Action;
use crate::resolution::pattern::ResolutionPattern;

/// A predicate over one constraint dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "kebab-case")]
pub enum ConstraintCondition {
    Viewport(ViewportClass),
    Pointer(PointerType),
    InputMethod(InputMethod),
    ScreenReader,
    HighContrast,
    ReducedMotion,
    TokenSet(String),
    ColorScheme(ColorScheme),
    /// Exact urgency
    Urgency(Urgency),
    UrgencyAtLeast(Urgency),
    Density(Density),
}

impl ConstraintCondition {
    pub fn dimension(&self) -> ConstraintDimension {
        match self {
            ConstraintCondition::Viewport(_) => ConstraintDimension::Viewport,
            ConstraintCondition::Pointer(_) => ConstraintDimension::Pointer,
            ConstraintCondition::InputMethod(_) => ConstraintDimension::InputMethod,
            ConstraintCondition::ScreenReader => ConstraintDimension::ScreenReader,
            ConstraintCondition::HighContrast => ConstraintDimension::HighContrast,
            ConstraintCondition::ReducedMotion => ConstraintDimension::ReducedMotion,
            ConstraintCondition::TokenSet(_) => ConstraintDimension::TokenSet,
            ConstraintCondition::ColorScheme(_) => ConstraintDimension::ColorScheme,
            ConstraintCondition::Urgency(_) | ConstraintCondition::UrgencyAtLeast(_) => {
                ConstraintDimension::Urgency
            }
            ConstraintCondition::Density(_) => ConstraintDimension::Density,
        }
    }

    /// Unset dimensions never satisfy a condition
    pub fn holds(&self, constraints: &ConstraintSet) -> bool {
        match self {
            ConstraintCondition::Viewport(v) => constraints.device.viewport == Some(*v),
            ConstraintCondition::Pointer(p) => constraints.device.pointer == Some(*p),
            ConstraintCondition::InputMethod(m) => constraints.device.input_method == Some(*m),
            ConstraintCondition::ScreenReader => constraints.accessibility.screen_reader,
            ConstraintCondition::HighContrast => constraints.accessibility.high_contrast,
            ConstraintCondition::ReducedMotion => constraints.accessibility.reduced_motion,
            ConstraintCondition::TokenSet(name) => {
                constraints.design_system.token_set.as_deref() == Some(name.as_str())
            }
            ConstraintCondition::ColorScheme(s) => constraints.design_system.color_scheme == Some(*s),
            ConstraintCondition::Urgency(u) => constraints.context.urgency == Some(*u),
            ConstraintCondition::UrgencyAtLeast(u) => {
                constraints.context.urgency.is_some_and(|current| current >= *u)
            }
            ConstraintCondition::Density(d) => constraints.context.density == Some(*d),
        }
    }
}

/// Maps (action, constraint predicate) to required behaviour traits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AffinityRule {
    pub id: String,
    /// Actions the rule applies to; empty means every action
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Conditions that must all hold
    pub when: Vec<ConstraintCondition>,
    /// Pattern the rule proposes; `None` keeps the rule pattern-agnostic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<ResolutionPattern>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default, rename = "traits")]
    pub required_traits: TraitOverrides,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl AffinityRule {
    pub fn new(id: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            actions: Vec::new(),
            when: Vec::new(),
            pattern: None,
            priority,
            required_traits: TraitOverrides::default(),
            description: String::new(),
        }
    }

    pub fn for_actions(mut self, actions: &[Action]) -> Self {
        self.actions = actions.to_vec();
        self
    }

    pub fn when(mut self, condition: ConstraintCondition) -> Self {
        self.when.push(condition);
        self
    }

    pub fn proposing(mut self, pattern: ResolutionPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn requiring(mut self, traits: TraitOverrides) -> Self {
        self.required_traits = traits;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn applies_to(&self, action: Action, constraints: &ConstraintSet) -> bool {
        (self.actions.is_empty() || self.actions.contains(&action))
            && self.when.iter().all(|c| c.holds(constraints))
    }

    /// Dimensions referenced by the rule's conditions, in declaration order
    pub fn dimensions(&self) -> Vec<ConstraintDimension> {
        let mut dims: Vec<_> = self.when.iter().map(|c| c.dimension()).collect();
        dims.sort();
        dims.dedup();
        dims
    }

    /// How specific a constraint set the rule targets
    pub fn specificity(&self) -> u32 {
        weight_of(&self.dimensions())
    }

    /// Whether the rule counts toward a candidate pattern
    pub fn supports(&self, candidate: ResolutionPattern) -> bool {
        self.pattern.map_or(true, |p| p == candidate)
    }
}
