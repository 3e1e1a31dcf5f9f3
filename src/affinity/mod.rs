//! Affinity rules: (action, constraint predicate) -> required behaviour traits

pub mod loader;
pub mod rule;
pub mod table;
pub mod traits;

pub use loader::{load_rule_table, parse_rule_table};
pub use rule::{AffinityRule, ConstraintCondition};
pub use table::{default_rule_table, find_best_rule, find_matching_rules, RuleTable};
pub use traits::{
    action_to_traits, enhance_traits_for_constraints, AriaRole, LiveRegion, ManifestationTraits,
    SizeClass, TraitOverrides, Variant,
};
