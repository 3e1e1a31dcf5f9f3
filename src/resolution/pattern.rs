//! High-level presentation archetypes

use serde::{Deserialize, Serialize};

use crate::affinity::traits::{AriaRole, LiveRegion, ManifestationTraits, Variant};
use crate::intention::Action;

/// Presentation archetype; declaration order breaks confidence ties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionPattern {
    Selection,
    Input,
    Display,
    Action,
    Flow,
    Feedback,
}

impl ResolutionPattern {
    pub const ALL: [ResolutionPattern; 6] = [
        ResolutionPattern::Selection,
        ResolutionPattern::Input,
        ResolutionPattern::Display,
        ResolutionPattern::Action,
        ResolutionPattern::Flow,
        ResolutionPattern::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionPattern::Selection => "selection",
            ResolutionPattern::Input => "input",
            ResolutionPattern::Display => "display",
            ResolutionPattern::Action => "action",
            ResolutionPattern::Flow => "flow",
            ResolutionPattern::Feedback => "feedback",
        }
    }

    /// Traits a pattern starts from when a rule proposes it over the default
    pub fn baseline_traits(&self) -> ManifestationTraits {
        match self {
            ResolutionPattern::Selection => ManifestationTraits {
                contained: true,
                ..ManifestationTraits::control(AriaRole::Listbox, Variant::List)
            },
            ResolutionPattern::Input => ManifestationTraits {
                contained: true,
                ..ManifestationTraits::control(AriaRole::Form, Variant::Field)
            },
            ResolutionPattern::Display => ManifestationTraits {
                contained: true,
                ..ManifestationTraits::passive(AriaRole::Region, Variant::Card)
            },
            ResolutionPattern::Action => ManifestationTraits {
                elevated: true,
                contained: true,
                ..ManifestationTraits::control(AriaRole::Dialog, Variant::Dialog)
            },
            ResolutionPattern::Flow => ManifestationTraits {
                contained: true,
                ..ManifestationTraits::control(AriaRole::Group, Variant::Stepper)
            },
            ResolutionPattern::Feedback => ManifestationTraits {
                live_region: Some(LiveRegion::Polite),
                ..ManifestationTraits::passive(AriaRole::Status, Variant::Banner)
            },
        }
    }
}

/// Default pattern for an action
pub fn action_to_pattern(action: Action) -> ResolutionPattern {
    match action {
        Action::ChooseOne | Action::ChooseMany => ResolutionPattern::Selection,
        Action::ProvideText | Action::ProvideData => ResolutionPattern::Input,
        Action::Review => ResolutionPattern::Display,
        Action::Confirm => ResolutionPattern::Action,
        Action::Navigate => ResolutionPattern::Flow,
        Action::Acknowledge | Action::Wait | Action::Alert => ResolutionPattern::Feedback,
    }
}
