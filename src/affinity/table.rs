//! The affinity rule table and rule matching
//!
//! A table is built once, validated, and then only read. Share it behind an
//! `Arc`; concurrent readers need no locking.

use std::cmp::Reverse;
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;

use crate::affinity::rule::{AffinityRule, ConstraintCondition};
use crate::affinity::traits::{AriaRole, LiveRegion, SizeClass, TraitOverrides, Variant};
use crate::constraint::{
    ColorScheme, ConstraintSet, Density, InputMethod, PointerType, Urgency, ViewportClass,
};
use crate::core::error::{IntentError, Result};
use crate::intention::Action;
use crate::resolution::pattern::ResolutionPattern;

/// Ordered, read-only collection of affinity rules
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<AffinityRule>,
    by_id: AHashMap<String, usize>,
}

impl RuleTable {
    /// Build a table; insertion order is the final tie-break between rules
    pub fn new(rules: Vec<AffinityRule>) -> Result<Self> {
        let mut errors = Vec::new();
        let mut by_id = AHashMap::with_capacity(rules.len());

        for (i, rule) in rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                errors.push(format!("rule #{} has an empty id", i));
            }
            if by_id.insert(rule.id.clone(), i).is_some() {
                errors.push(format!("duplicate rule id '{}'", rule.id));
            }
            if rule.when.is_empty() {
                errors.push(format!("rule '{}' has no conditions", rule.id));
            }
            if rule.required_traits.is_empty() && rule.pattern.is_none() {
                errors.push(format!(
                    "rule '{}' neither requires traits nor proposes a pattern",
                    rule.id
                ));
            }
        }

        if errors.is_empty() {
            Ok(Self { rules, by_id })
        } else {
            Err(IntentError::InvalidRules(errors.join("; ")))
        }
    }

    /// The built-in rule table
    pub fn standard() -> Self {
        let rules = standard_rules();
        let by_id = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self { rules, by_id }
    }

    pub fn rules(&self) -> &[AffinityRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&AffinityRule> {
        self.by_id.get(id).map(|&i| &self.rules[i])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every applicable rule, highest precedence first
    ///
    /// Precedence: priority, then rule specificity, then insertion order.
    pub fn find_matching_rules(
        &self,
        action: Action,
        constraints: &ConstraintSet,
    ) -> Vec<&AffinityRule> {
        let mut matched: Vec<&AffinityRule> = self
            .rules
            .iter()
            .filter(|r| r.applies_to(action, constraints))
            .collect();
        // Stable sort keeps insertion order among equals
        matched.sort_by_key(|r| (Reverse(r.priority), Reverse(r.specificity())));
        matched
    }

    /// Highest-precedence applicable rule, `None` when nothing matched
    pub fn find_best_rule(&self, action: Action, constraints: &ConstraintSet) -> Option<&AffinityRule> {
        self.find_matching_rules(action, constraints).into_iter().next()
    }
}

pub fn find_matching_rules<'a>(
    table: &'a RuleTable,
    action: Action,
    constraints: &ConstraintSet,
) -> Vec<&'a AffinityRule> {
    table.find_matching_rules(action, constraints)
}

pub fn find_best_rule<'a>(
    table: &'a RuleTable,
    action: Action,
    constraints: &ConstraintSet,
) -> Option<&'a AffinityRule> {
    table.find_best_rule(action, constraints)
}

/// Process-wide standard table, built on first use
pub fn default_rule_table() -> Arc<RuleTable> {
    static TABLE: OnceLock<Arc<RuleTable>> = OnceLock::new();
    TABLE.get_or_init(|| Arc::new(RuleTable::standard())).clone()
}

pub(crate) fn standard_rules() -> Vec<AffinityRule> {
    use ConstraintCondition as C;

    vec![
        // === URGENCY ===
        AffinityRule::new("urgent-confirmation", 90)
            .for_actions(&[Action::Confirm, Action::Acknowledge])
            .when(C::UrgencyAtLeast(Urgency::High))
            .requiring(TraitOverrides {
                role: Some(AriaRole::Alertdialog),
                elevated: Some(true),
                emphasized: Some(true),
                dismissable: Some(false),
                live_region: Some(Some(LiveRegion::Assertive)),
                variant: Some(Variant::Dialog),
                ..Default::default()
            })
            .describe("Urgent decisions interrupt as a modal alert dialog"),
        AffinityRule::new("critical-alert-modal", 95)
            .for_actions(&[Action::Alert])
            .when(C::UrgencyAtLeast(Urgency::Critical))
            .proposing(ResolutionPattern::Action)
            .requiring(TraitOverrides {
                role: Some(AriaRole::Alertdialog),
                interactive: Some(true),
                focusable: Some(true),
                elevated: Some(true),
                variant: Some(Variant::Dialog),
                ..Default::default()
            })
            .describe("Critical alerts demand an explicit response"),
        AffinityRule::new("urgent-alert-banner", 70)
            .for_actions(&[Action::Alert])
            .when(C::UrgencyAtLeast(Urgency::High))
            .requiring(TraitOverrides {
                emphasized: Some(true),
                dismissable: Some(false),
                live_region: Some(Some(LiveRegion::Assertive)),
                ..Default::default()
            })
            .describe("Urgent alerts stay on screen and announce assertively"),
        AffinityRule::new("low-urgency-toast", 50)
            .for_actions(&[Action::Alert, Action::Acknowledge])
            .when(C::Urgency(Urgency::Low))
            .requiring(TraitOverrides {
                variant: Some(Variant::Toast),
                emphasized: Some(false),
                live_region: Some(Some(LiveRegion::Polite)),
                ..Default::default()
            })
            .describe("Low urgency notices become unobtrusive toasts"),
        // === DEVICE ===
        AffinityRule::new("touch-selection", 60)
            .for_actions(&[Action::ChooseOne, Action::ChooseMany])
            .when(C::Viewport(ViewportClass::Mobile))
            .requiring(TraitOverrides {
                contained: Some(true),
                size: Some(SizeClass::Touch),
                variant: Some(Variant::List),
                role: Some(AriaRole::Listbox),
                ..Default::default()
            })
            .describe("Phones get a contained list with touch-sized rows"),
        AffinityRule::new("compact-desktop-selection", 60)
            .for_actions(&[Action::ChooseOne, Action::ChooseMany])
            .when(C::Viewport(ViewportClass::Desktop))
            .when(C::Density(Density::Compact))
            .requiring(TraitOverrides {
                contained: Some(false),
                size: Some(SizeClass::Compact),
                variant: Some(Variant::Pill),
                ..Default::default()
            })
            .describe("Dense desktop layouts render options as inline pills"),
        AffinityRule::new("desktop-selection", 40)
            .for_actions(&[Action::ChooseOne, Action::ChooseMany])
            .when(C::Viewport(ViewportClass::Desktop))
            .requiring(TraitOverrides {
                variant: Some(Variant::Inline),
                size: Some(SizeClass::Regular),
                ..Default::default()
            }),
        AffinityRule::new("mobile-data-stepper", 50)
            .for_actions(&[Action::ProvideData])
            .when(C::Viewport(ViewportClass::Mobile))
            .proposing(ResolutionPattern::Flow)
            .requiring(TraitOverrides {
                variant: Some(Variant::Stepper),
                size: Some(SizeClass::Touch),
                ..Default::default()
            })
            .describe("Multi-field data entry on phones is split into steps"),
        AffinityRule::new("mobile-confirm-sheet", 40)
            .for_actions(&[Action::Confirm])
            .when(C::Viewport(ViewportClass::Mobile))
            .requiring(TraitOverrides {
                variant: Some(Variant::Sheet),
                size: Some(SizeClass::Touch),
                ..Default::default()
            }),
        AffinityRule::new("mobile-navigation-sheet", 30)
            .for_actions(&[Action::Navigate])
            .when(C::Viewport(ViewportClass::Mobile))
            .requiring(TraitOverrides {
                variant: Some(Variant::Sheet),
                dismissable: Some(true),
                size: Some(SizeClass::Touch),
                ..Default::default()
            }),
        AffinityRule::new("desktop-navigation", 30)
            .for_actions(&[Action::Navigate])
            .when(C::Viewport(ViewportClass::Desktop))
            .requiring(TraitOverrides {
                variant: Some(Variant::Inline),
                ..Default::default()
            }),
        AffinityRule::new("coarse-pointer-targets", 30)
            .when(C::Pointer(PointerType::Coarse))
            .requiring(TraitOverrides {
                size: Some(SizeClass::Touch),
                ..Default::default()
            }),
        AffinityRule::new("keyboard-focus", 25)
            .for_actions(&[
                Action::ChooseOne,
                Action::ChooseMany,
                Action::Confirm,
                Action::Navigate,
            ])
            .when(C::InputMethod(InputMethod::Keyboard))
            .requiring(TraitOverrides {
                focusable: Some(true),
                ..Default::default()
            }),
        // === ACCESSIBILITY ===
        AffinityRule::new("reduced-motion", 80)
            .when(C::ReducedMotion)
            .requiring(TraitOverrides {
                animated: Some(false),
                ..Default::default()
            }),
        AffinityRule::new("screen-reader-alerts", 70)
            .for_actions(&[Action::Alert, Action::Acknowledge])
            .when(C::ScreenReader)
            .requiring(TraitOverrides {
                focusable: Some(true),
                live_region: Some(Some(LiveRegion::Assertive)),
                ..Default::default()
            }),
        AffinityRule::new("screen-reader-progress", 70)
            .for_actions(&[Action::Wait])
            .when(C::ScreenReader)
            .requiring(TraitOverrides {
                live_region: Some(Some(LiveRegion::Polite)),
                ..Default::default()
            }),
        AffinityRule::new("screen-reader-review", 20)
            .for_actions(&[Action::Review])
            .when(C::ScreenReader)
            .requiring(TraitOverrides {
                focusable: Some(true),
                role: Some(AriaRole::Article),
                ..Default::default()
            }),
        AffinityRule::new("high-contrast", 20)
            .when(C::HighContrast)
            .requiring(TraitOverrides {
                contained: Some(true),
                emphasized: Some(true),
                elevated: Some(false),
                ..Default::default()
            })
            .describe("Borders instead of shadows under forced contrast"),
        // === DESIGN SYSTEM ===
        AffinityRule::new("dark-scheme-outline", 10)
            .when(C::ColorScheme(ColorScheme::Dark))
            .requiring(TraitOverrides {
                contained: Some(true),
                ..Default::default()
            }),
        // === DENSITY ===
        AffinityRule::new("spacious-review", 30)
            .for_actions(&[Action::Review])
            .when(C::Density(Density::Spacious))
            .requiring(TraitOverrides {
                elevated: Some(true),
                variant: Some(Variant::Card),
                ..Default::default()
            }),
        AffinityRule::new("compact-review", 30)
            .for_actions(&[Action::Review])
            .when(C::Density(Density::Compact))
            .requiring(TraitOverrides {
                contained: Some(false),
                variant: Some(Variant::Inline),
                ..Default::default()
            }),
        AffinityRule::new("compact-input", 20)
            .for_actions(&[Action::ProvideText, Action::ProvideData])
            .when(C::Density(Density::Compact))
            .requiring(TraitOverrides {
                size: Some(SizeClass::Compact),
                ..Default::default()
            }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = RuleTable::standard();
        assert!(RuleTable::new(table.rules().to_vec()).is_ok());
        assert!(table.get("touch-selection").is_some());
    }

    #[test]
    fn test_empty_constraints_match_nothing() {
        let table = RuleTable::standard();
        for action in Action::ALL {
            assert!(table.find_matching_rules(action, &ConstraintSet::new()).is_empty());
            assert!(table.find_best_rule(action, &ConstraintSet::new()).is_none());
        }
    }

    #[test]
    fn test_matches_are_priority_ordered() {
        let table = RuleTable::standard();
        let constraints = ConstraintSet::new()
            .with_viewport(ViewportClass::Desktop)
            .with_density(Density::Compact);
        let ids: Vec<_> = table
            .find_matching_rules(Action::ChooseOne, &constraints)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["compact-desktop-selection", "desktop-selection"]);
    }

    #[test]
    fn test_specificity_breaks_priority_ties() {
        let general = AffinityRule::new("general", 10)
            .when(ConstraintCondition::Viewport(ViewportClass::Mobile))
            .requiring(TraitOverrides {
                elevated: Some(true),
                ..Default::default()
            });
        let specific = AffinityRule::new("specific", 10)
            .when(ConstraintCondition::Viewport(ViewportClass::Mobile))
            .when(ConstraintCondition::ScreenReader)
            .requiring(TraitOverrides {
                elevated: Some(false),
                ..Default::default()
            });
        let table = RuleTable::new(vec![general, specific]).unwrap();
        let constraints = ConstraintSet::new()
            .with_viewport(ViewportClass::Mobile)
            .with_screen_reader();

        let best = table.find_best_rule(Action::Review, &constraints).unwrap();
        assert_eq!(best.id, "specific");
    }

    #[test]
    fn test_insertion_order_is_final_tie_break() {
        let rule = |id: &str| {
            AffinityRule::new(id, 5)
                .when(ConstraintCondition::HighContrast)
                .requiring(TraitOverrides {
                    contained: Some(true),
                    ..Default::default()
                })
        };
        let table = RuleTable::new(vec![rule("first"), rule("second")]).unwrap();
        let constraints = ConstraintSet::new().with_high_contrast();
        let ids: Vec<_> = table
            .find_matching_rules(Action::Wait, &constraints)
            .iter()
            .map(|r| r.id.clone())
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn test_invalid_tables_rejected() {
        let no_conditions = AffinityRule::new("bare", 1).requiring(TraitOverrides {
            emphasized: Some(true),
            ..Default::default()
        });
        let no_effect = AffinityRule::new("noop", 1).when(ConstraintCondition::ReducedMotion);
        let err = RuleTable::new(vec![no_conditions.clone(), no_conditions, no_effect]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("duplicate rule id 'bare'"));
        assert!(msg.contains("'bare' has no conditions"));
        assert!(msg.contains("'noop' neither requires traits"));
    }

    #[test]
    fn test_default_table_is_shared() {
        let a = default_rule_table();
        let b = default_rule_table();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
