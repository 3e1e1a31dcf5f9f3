//! Neutral render instructions derived from traits
//!
//! The builder speaks only in style, ARIA and data-attribute primitives. It
//! never special-cases a concrete component.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::affinity::traits::{ManifestationTraits, SizeClass, Variant};
use crate::core::types::ResolutionId;
use crate::resolution::pattern::ResolutionPattern;

pub const CLASS_PREFIX: &str = "intent";
pub const TOUCH_TARGET_CLASS: &str = "intent--touch-target";

type StyleMap = BTreeMap<String, String>;

/// Entrance animation hint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationSpec {
    pub name: String,
    pub duration_ms: u32,
    pub easing: String,
}

/// Declarative output consumed, never mutated, by the rendering layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstructions {
    pub styles: StyleMap,
    /// Style overrides per interaction state (`hover`, `focus-visible` ...)
    pub states: BTreeMap<String, StyleMap>,
    pub class_names: Vec<String>,
    pub aria: BTreeMap<String, String>,
    pub data_attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationSpec>,
}

impl RenderInstructions {
    pub fn has_class(&self, class: &str) -> bool {
        self.class_names.iter().any(|c| c == class)
    }

    /// Space-separated class attribute value
    pub fn class_name(&self) -> String {
        self.class_names.join(" ")
    }
}

fn put(map: &mut StyleMap, key: &str, value: impl Into<String>) {
    map.insert(key.to_string(), value.into());
}

/// Map final traits to render instructions
pub fn build_render_instructions(
    pattern: ResolutionPattern,
    traits: &ManifestationTraits,
    resolution_id: ResolutionId,
) -> RenderInstructions {
    RenderInstructions {
        styles: styles_for(traits),
        states: states_for(traits),
        class_names: class_names_for(pattern, traits),
        aria: aria_for(traits),
        data_attributes: data_for(pattern, traits, resolution_id),
        animation: animation_for(traits),
    }
}

fn styles_for(traits: &ManifestationTraits) -> StyleMap {
    let mut styles = StyleMap::new();

    let (min_size, padding) = match traits.size {
        SizeClass::Compact => ("28px", "4px 8px"),
        SizeClass::Regular => ("36px", "8px 12px"),
        SizeClass::Touch => ("44px", "12px 16px"),
    };
    if traits.interactive {
        put(&mut styles, "min-height", min_size);
        put(&mut styles, "min-width", min_size);
    }

    match traits.variant {
        Variant::Pill | Variant::Inline => {
            put(&mut styles, "display", "inline-flex");
            put(&mut styles, "flex-direction", "row");
            put(&mut styles, "gap", "8px");
        }
        Variant::List | Variant::Stack | Variant::Stepper => {
            put(&mut styles, "display", "flex");
            put(&mut styles, "flex-direction", "column");
            put(&mut styles, "gap", "4px");
        }
        Variant::Dialog | Variant::Sheet => {
            put(&mut styles, "position", "fixed");
            put(&mut styles, "z-index", "1000");
        }
        Variant::Toast => {
            put(&mut styles, "position", "fixed");
            put(&mut styles, "z-index", "1100");
        }
        Variant::Field | Variant::Card | Variant::Banner | Variant::Indicator => {
            put(&mut styles, "display", "block");
        }
    }

    if traits.elevated {
        put(&mut styles, "box-shadow", "0 4px 12px rgba(0, 0, 0, 0.15)");
    }
    if traits.contained {
        let radius = if traits.variant == Variant::Pill { "9999px" } else { "8px" };
        put(&mut styles, "border", "1px solid var(--intent-border, currentColor)");
        put(&mut styles, "border-radius", radius);
        put(&mut styles, "padding", padding);
    }
    if traits.emphasized {
        put(&mut styles, "font-weight", "600");
        put(&mut styles, "color", "var(--intent-emphasis)");
    }
    if !traits.interactive {
        put(&mut styles, "cursor", "default");
    }

    styles
}

fn states_for(traits: &ManifestationTraits) -> BTreeMap<String, StyleMap> {
    let mut states = BTreeMap::new();

    if traits.focusable {
        let mut focus = StyleMap::new();
        put(&mut focus, "outline", "2px solid var(--intent-focus-ring)");
        put(&mut focus, "outline-offset", "2px");
        states.insert("focus-visible".to_string(), focus);
    }
    if traits.interactive {
        let mut hover = StyleMap::new();
        put(&mut hover, "background-color", "var(--intent-hover)");
        states.insert("hover".to_string(), hover);

        let mut disabled = StyleMap::new();
        put(&mut disabled, "opacity", "0.5");
        put(&mut disabled, "cursor", "not-allowed");
        states.insert("disabled".to_string(), disabled);
    }

    states
}

fn class_names_for(pattern: ResolutionPattern, traits: &ManifestationTraits) -> Vec<String> {
    let mut classes = vec![
        CLASS_PREFIX.to_string(),
        format!("{}--{}", CLASS_PREFIX, pattern.as_str()),
        format!("{}--variant-{}", CLASS_PREFIX, traits.variant.as_str()),
        format!("{}--size-{}", CLASS_PREFIX, traits.size.as_str()),
    ];
    if traits.size == SizeClass::Touch {
        classes.push(TOUCH_TARGET_CLASS.to_string());
    }

    let flags = [
        (traits.interactive, "interactive"),
        (traits.focusable, "focusable"),
        (traits.dismissable, "dismissable"),
        (traits.elevated, "elevated"),
        (traits.contained, "contained"),
        (traits.emphasized, "emphasized"),
    ];
    classes.extend(
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, name)| format!("{}--{}", CLASS_PREFIX, name)),
    );
    classes
}

fn aria_for(traits: &ManifestationTraits) -> BTreeMap<String, String> {
    let mut aria = BTreeMap::new();
    aria.insert("role".to_string(), traits.role.as_str().to_string());

    if let Some(live) = traits.live_region {
        aria.insert("aria-live".to_string(), live.as_str().to_string());
        aria.insert("aria-atomic".to_string(), "true".to_string());
    }
    if !traits.interactive {
        aria.insert("aria-disabled".to_string(), "true".to_string());
    }
    if traits.role.is_dialog() {
        aria.insert("aria-modal".to_string(), "true".to_string());
    }
    aria
}

fn data_for(
    pattern: ResolutionPattern,
    traits: &ManifestationTraits,
    resolution_id: ResolutionId,
) -> BTreeMap<String, String> {
    let mut data = BTreeMap::new();
    data.insert("data-intent-pattern".to_string(), pattern.as_str().to_string());
    data.insert("data-resolution-id".to_string(), resolution_id.to_string());
    data.insert("data-intent-variant".to_string(), traits.variant.as_str().to_string());
    data.insert("data-dismissable".to_string(), traits.dismissable.to_string());
    data
}

fn animation_for(traits: &ManifestationTraits) -> Option<AnimationSpec> {
    if !traits.animated {
        return None;
    }
    let (name, duration_ms) = match traits.variant {
        Variant::Dialog | Variant::Sheet => ("intent-scale-in", 200),
        Variant::Toast | Variant::Banner => ("intent-slide-in", 180),
        Variant::Indicator => ("intent-pulse", 1200),
        _ => ("intent-fade-in", 150),
    };
    Some(AnimationSpec {
        name: name.to_string(),
        duration_ms,
        easing: "ease-out".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affinity::traits::{action_to_traits, AriaRole, LiveRegion};
    use crate::intention::Action;

    #[test]
    fn test_touch_size_adds_marker_class() {
        let traits = ManifestationTraits {
            size: SizeClass::Touch,
            ..action_to_traits(Action::ChooseOne)
        };
        let render = build_render_instructions(ResolutionPattern::Selection, &traits, ResolutionId::new());
        assert!(render.has_class(TOUCH_TARGET_CLASS));
        assert!(render.has_class("intent--selection"));
        assert_eq!(render.styles["min-height"], "44px");
    }

    #[test]
    fn test_trait_booleans_map_to_styles() {
        let traits = action_to_traits(Action::Confirm);
        let render = build_render_instructions(ResolutionPattern::Action, &traits, ResolutionId::new());
        assert!(render.styles.contains_key("box-shadow"));
        assert!(render.styles.contains_key("border"));
        assert!(!render.styles.contains_key("font-weight"));
        assert_eq!(render.aria["aria-modal"], "true");
    }

    #[test]
    fn test_passive_traits_are_aria_disabled() {
        let traits = action_to_traits(Action::Wait);
        let render = build_render_instructions(ResolutionPattern::Feedback, &traits, ResolutionId::new());
        assert_eq!(render.aria["role"], "progressbar");
        assert_eq!(render.aria["aria-live"], "polite");
        assert_eq!(render.aria["aria-disabled"], "true");
        assert!(!render.states.contains_key("focus-visible"));
    }

    #[test]
    fn test_data_attributes_carry_pattern_and_id() {
        let id = ResolutionId::new();
        let traits = action_to_traits(Action::Review);
        let render = build_render_instructions(ResolutionPattern::Display, &traits, id);
        assert_eq!(render.data_attributes["data-intent-pattern"], "display");
        assert_eq!(render.data_attributes["data-resolution-id"], id.to_string());
    }

    #[test]
    fn test_animation_follows_animated_trait() {
        let mut traits = action_to_traits(Action::Alert);
        assert!(build_render_instructions(ResolutionPattern::Feedback, &traits, ResolutionId::new())
            .animation
            .is_some());

        traits.animated = false;
        assert!(build_render_instructions(ResolutionPattern::Feedback, &traits, ResolutionId::new())
            .animation
            .is_none());
    }

    #[test]
    fn test_pill_radius() {
        let traits = ManifestationTraits {
            variant: Variant::Pill,
            contained: true,
            role: AriaRole::Radiogroup,
            live_region: Some(LiveRegion::Polite),
            ..action_to_traits(Action::ChooseOne)
        };
        let render = build_render_instructions(ResolutionPattern::Selection, &traits, ResolutionId::new());
        assert_eq!(render.styles["border-radius"], "9999px");
        assert_eq!(render.styles["display"], "inline-flex");
    }
}
