//! Manifestation traits and their per-action baselines

use serde::{Deserialize, Serialize};

use crate::intention::Action;

/// ARIA role of the resolved element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaRole {
    Alert,
    Alertdialog,
    Article,
    Button,
    Dialog,
    Form,
    Group,
    Listbox,
    Navigation,
    Progressbar,
    Radiogroup,
    Region,
    Status,
    Textbox,
}

impl AriaRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaRole::Alert => "alert",
            AriaRole::Alertdialog => "alertdialog",
            AriaRole::Article => "article",
            AriaRole::Button => "button",
            AriaRole::Dialog => "dialog",
            AriaRole::Form => "form",
            AriaRole::Group => "group",
            AriaRole::Listbox => "listbox",
            AriaRole::Navigation => "navigation",
            AriaRole::Progressbar => "progressbar",
            AriaRole::Radiogroup => "radiogroup",
            AriaRole::Region => "region",
            AriaRole::Status => "status",
            AriaRole::Textbox => "textbox",
        }
    }

    pub fn is_dialog(&self) -> bool {
        matches!(self, AriaRole::Dialog | AriaRole::Alertdialog)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiveRegion {
    Polite,
    Assertive,
}

impl LiveRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiveRegion::Polite => "polite",
            LiveRegion::Assertive => "assertive",
        }
    }
}

/// Presentation archetype within a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    List,
    Pill,
    Inline,
    Field,
    Stack,
    Card,
    Dialog,
    Sheet,
    Banner,
    Toast,
    Stepper,
    Indicator,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::List => "list",
            Variant::Pill => "pill",
            Variant::Inline => "inline",
            Variant::Field => "field",
            Variant::Stack => "stack",
            Variant::Card => "card",
            Variant::Dialog => "dialog",
            Variant::Sheet => "sheet",
            Variant::Banner => "banner",
            Variant::Toast => "toast",
            Variant::Stepper => "stepper",
            Variant::Indicator => "indicator",
        }
    }
}

/// Hit-area size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeClass {
    Compact,
    Regular,
    Touch,
}

impl SizeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Compact => "compact",
            SizeClass::Regular => "regular",
            SizeClass::Touch => "touch",
        }
    }
}

/// Behavioural description of a manifestation; derived, never author-supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestationTraits {
    pub interactive: bool,
    pub focusable: bool,
    pub dismissable: bool,
    pub elevated: bool,
    pub contained: bool,
    pub emphasized: bool,
    pub animated: bool,
    pub role: AriaRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_region: Option<LiveRegion>,
    pub variant: Variant,
    pub size: SizeClass,
}

impl ManifestationTraits {
    /// Inert, uncontained region
    pub const fn passive(role: AriaRole, variant: Variant) -> Self {
        Self {
            interactive: false,
            focusable: false,
            dismissable: false,
            elevated: false,
            contained: false,
            emphasized: false,
            animated: false,
            role,
            live_region: None,
            variant,
            size: SizeClass::Regular,
        }
    }

    /// Focusable interactive control
    pub const fn control(role: AriaRole, variant: Variant) -> Self {
        Self {
            interactive: true,
            focusable: true,
            ..Self::passive(role, variant)
        }
    }
}

/// `live-region` in rule files: a region name, or `"off"` (or JSON `null`) to clear it
mod live_region_override {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::LiveRegion;

    const OFF: &str = "off";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Region(LiveRegion),
        Keyword(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<LiveRegion>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Some(None)),
            Some(Raw::Region(region)) => Ok(Some(Some(region))),
            Some(Raw::Keyword(k)) if k == OFF => Ok(Some(None)),
            Some(Raw::Keyword(k)) => Err(D::Error::custom(format!(
                "unknown live region '{}', expected polite, assertive or {}",
                k, OFF
            ))),
        }
    }

    pub fn serialize<S>(value: &Option<Option<LiveRegion>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(Some(region)) => region.serialize(serializer),
            _ => serializer.serialize_str(OFF),
        }
    }
}

/// Partial traits a rule requires; `None` leaves the field alone
///
/// `live_region` is doubly optional so a rule can clear an existing region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct TraitOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focusable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contained: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AriaRole>,
    #[serde(skip_serializing_if = "Option::is_none", with = "live_region_override")]
    pub live_region: Option<Option<LiveRegion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeClass>,
}

impl TraitOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Minimal trait baseline for an action when no rule matched
pub fn action_to_traits(action: Action) -> ManifestationTraits {
    match action {
        Action::ChooseOne => ManifestationTraits {
            contained: true,
            ..ManifestationTraits::control(AriaRole::Radiogroup, Variant::List)
        },
        Action::ChooseMany => ManifestationTraits {
            contained: true,
            ..ManifestationTraits::control(AriaRole::Group, Variant::List)
        },
        Action::ProvideText => ManifestationTraits {
            contained: true,
            ..ManifestationTraits::control(AriaRole::Textbox, Variant::Field)
        },
        Action::ProvideData => ManifestationTraits {
            contained: true,
            ..ManifestationTraits::control(AriaRole::Form, Variant::Stack)
        },
        Action::Confirm => ManifestationTraits {
            dismissable: true,
            elevated: true,
            contained: true,
            animated: true,
            ..ManifestationTraits::control(AriaRole::Dialog, Variant::Dialog)
        },
        Action::Acknowledge => ManifestationTraits {
            dismissable: true,
            contained: true,
            live_region: Some(LiveRegion::Polite),
            ..ManifestationTraits::control(AriaRole::Status, Variant::Banner)
        },
        Action::Review => ManifestationTraits {
            contained: true,
            ..ManifestationTraits::passive(AriaRole::Region, Variant::Card)
        },
        Action::Navigate => ManifestationTraits::control(AriaRole::Navigation, Variant::Inline),
        Action::Wait => ManifestationTraits {
            animated: true,
            live_region: Some(LiveRegion::Polite),
            ..ManifestationTraits::passive(AriaRole::Progressbar, Variant::Indicator)
        },
        Action::Alert => ManifestationTraits {
            dismissable: true,
            emphasized: true,
            animated: true,
            live_region: Some(LiveRegion::Assertive),
            ..ManifestationTraits::passive(AriaRole::Alert, Variant::Banner)
        },
    }
}

/// Merge a rule's required traits onto a baseline without touching either input
pub fn enhance_traits_for_constraints(
    traits: &ManifestationTraits,
    overrides: &TraitOverrides,
) -> ManifestationTraits {
    ManifestationTraits {
        interactive: overrides.interactive.unwrap_or(traits.interactive),
        focusable: overrides.focusable.unwrap_or(traits.focusable),
        dismissable: overrides.dismissable.unwrap_or(traits.dismissable),
        elevated: overrides.elevated.unwrap_or(traits.elevated),
        contained: overrides.contained.unwrap_or(traits.contained),
        emphasized: overrides.emphasized.unwrap_or(traits.emphasized),
        animated: overrides.animated.unwrap_or(traits.animated),
        role: overrides.role.unwrap_or(traits.role),
        live_region: overrides.live_region.unwrap_or(traits.live_region),
        variant: overrides.variant.unwrap_or(traits.variant),
        size: overrides.size.unwrap_or(traits.size),
    }
}
