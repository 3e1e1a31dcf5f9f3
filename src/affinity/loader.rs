//! Load affinity rules from TOML files
//!
//! ```toml
//! extends-standard = true
//!
//! [[rules]]
//! id = "kiosk-selection"
//! actions = ["choose-one"]
//! priority = 65
//! when = [{ dimension = "token-set", value = "kiosk" }]
//!
//! [rules.traits]
//! size = "touch"
//! variant = "pill"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::affinity::rule::AffinityRule;
use crate::affinity::table::{standard_rules, RuleTable};
use crate::core::error::{IntentError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RuleFile {
    /// Append the file's rules after the built-in table
    #[serde(default)]
    extends_standard: bool,
    #[serde(default)]
    rules: Vec<AffinityRule>,
}

/// Parse a rule table from TOML text
pub fn parse_rule_table(content: &str) -> Result<RuleTable> {
    let file: RuleFile = toml::from_str(content)?;

    let mut rules = if file.extends_standard {
        standard_rules()
    } else {
        Vec::new()
    };
    rules.extend(file.rules);

    if rules.is_empty() {
        return Err(IntentError::InvalidRules("rule file defines no rules".into()));
    }

    RuleTable::new(rules)
}

/// Load a rule table from a TOML file
pub fn load_rule_table(path: &Path) -> Result<RuleTable> {
    let content = fs::read_to_string(path)?;
    let table = parse_rule_table(&content).map_err(|e| match e {
        IntentError::InvalidRules(msg) => {
            IntentError::InvalidRules(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })?;
    tracing::debug!("Loaded {} affinity rules from {}", table.len(), path.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affinity::traits::{LiveRegion, SizeClass, Variant};
    use crate::constraint::ConstraintSet;
    use crate::intention::Action;
    use crate::resolution::pattern::ResolutionPattern;

    const KIOSK: &str = r#"
        [[rules]]
        id = "kiosk-selection"
        actions = ["choose-one"]
        priority = 65
        pattern = "selection"
        when = [{ dimension = "token-set", value = "kiosk" }, { dimension = "screen-reader" }]

        [rules.traits]
        size = "touch"
        variant = "pill"
        live-region = "polite"
    "#;

    #[test]
    fn test_parse_rule_file() {
        let table = parse_rule_table(KIOSK).unwrap();
        assert_eq!(table.len(), 1);

        let rule = table.get("kiosk-selection").unwrap();
        assert_eq!(rule.actions, vec![Action::ChooseOne]);
        assert_eq!(rule.pattern, Some(ResolutionPattern::Selection));
        assert_eq!(rule.required_traits.size, Some(SizeClass::Touch));
        assert_eq!(rule.required_traits.variant, Some(Variant::Pill));
        assert_eq!(rule.required_traits.live_region, Some(Some(LiveRegion::Polite)));
        assert_eq!(rule.specificity(), 3);

        let kiosk = ConstraintSet::new().with_token_set("kiosk").with_screen_reader();
        assert!(rule.applies_to(Action::ChooseOne, &kiosk));
    }

    #[test]
    fn test_extends_standard_appends() {
        let content = format!("extends-standard = true\n{}", KIOSK);
        let table = parse_rule_table(&content).unwrap();
        assert_eq!(table.len(), RuleTable::standard().len() + 1);
        assert_eq!(table.rules().last().unwrap().id, "kiosk-selection");
    }

    #[test]
    fn test_unknown_trait_rejected() {
        let content = r#"
            [[rules]]
            id = "bad"
            when = [{ dimension = "high-contrast" }]
            [rules.traits]
            sparkle = true
        "#;
        assert!(matches!(parse_rule_table(content), Err(IntentError::TomlError(_))));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(matches!(
            parse_rule_table(""),
            Err(IntentError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_rule_table(Path::new("/nonexistent/rules.toml"));
        assert!(matches!(result, Err(IntentError::IoError(_))));
    }
}
