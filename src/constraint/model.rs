//! Constraint value objects
//!
//! A [`ConstraintSet`] is built fresh for each resolution and never mutated
//! afterwards. Every dimension defaults to "not narrowed".

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewportClass {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointerType {
    Coarse,
    Fine,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputMethod {
    Touch,
    Mouse,
    Keyboard,
    Voice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorScheme {
    Light,
    Dark,
}

/// How pressing the situation is; ordered from calm to critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    Low,
    Normal,
    High,
    Critical,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [Urgency::Low, Urgency::Normal, Urgency::High, Urgency::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Low => "low",
            Urgency::Normal => "normal",
            Urgency::High => "high",
            Urgency::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Density {
    Compact,
    Comfortable,
    Spacious,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<ViewportClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<PointerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_method: Option<InputMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilityConstraints {
    pub screen_reader: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// Design-system input; the token set is an opaque name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignSystemConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scheme: Option<ColorScheme>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<Density>,
}

/// Device, accessibility, design and context limits for one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConstraintSet {
    pub device: DeviceConstraints,
    pub accessibility: AccessibilityConstraints,
    pub design_system: DesignSystemConstraints,
    pub context: ContextConstraints,
}

/// A single narrowable constraint dimension, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintDimension {
    Viewport,
    Pointer,
    InputMethod,
    ScreenReader,
    HighContrast,
    ReducedMotion,
    TokenSet,
    ColorScheme,
    Urgency,
    Density,
}

impl ConstraintDimension {
    pub const ALL: [ConstraintDimension; 10] = [
        ConstraintDimension::Viewport,
        ConstraintDimension::Pointer,
        ConstraintDimension::InputMethod,
        ConstraintDimension::ScreenReader,
        ConstraintDimension::HighContrast,
        ConstraintDimension::ReducedMotion,
        ConstraintDimension::TokenSet,
        ConstraintDimension::ColorScheme,
        ConstraintDimension::Urgency,
        ConstraintDimension::Density,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintDimension::Viewport => "viewport",
            ConstraintDimension::Pointer => "pointer",
            ConstraintDimension::InputMethod => "input-method",
            ConstraintDimension::ScreenReader => "screen-reader",
            ConstraintDimension::HighContrast => "high-contrast",
            ConstraintDimension::ReducedMotion => "reduced-motion",
            ConstraintDimension::TokenSet => "token-set",
            ConstraintDimension::ColorScheme => "color-scheme",
            ConstraintDimension::Urgency => "urgency",
            ConstraintDimension::Density => "density",
        }
    }
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phone-sized touch device
    pub fn mobile() -> Self {
        Self::new()
            .with_viewport(ViewportClass::Mobile)
            .with_pointer(PointerType::Coarse)
            .with_input_method(InputMethod::Touch)
    }

    /// Desktop with mouse
    pub fn desktop() -> Self {
        Self::new()
            .with_viewport(ViewportClass::Desktop)
            .with_pointer(PointerType::Fine)
            .with_input_method(InputMethod::Mouse)
    }

    pub fn with_viewport(mut self, viewport: ViewportClass) -> Self {
        self.device.viewport = Some(viewport);
        self
    }

    pub fn with_pointer(mut self, pointer: PointerType) -> Self {
        self.device.pointer = Some(pointer);
        self
    }

    pub fn with_input_method(mut self, input_method: InputMethod) -> Self {
        self.device.input_method = Some(input_method);
        self
    }

    pub fn with_screen_reader(mut self) -> Self {
        self.accessibility.screen_reader = true;
        self
    }

    pub fn with_high_contrast(mut self) -> Self {
        self.accessibility.high_contrast = true;
        self
    }

    pub fn with_reduced_motion(mut self) -> Self {
        self.accessibility.reduced_motion = true;
        self
    }

    pub fn with_token_set(mut self, token_set: impl Into<String>) -> Self {
        self.design_system.token_set = Some(token_set.into());
        self
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.design_system.color_scheme = Some(scheme);
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.context.urgency = Some(urgency);
        self
    }

    pub fn with_density(mut self, density: Density) -> Self {
        self.context.density = Some(density);
        self
    }

    /// Whether a dimension is narrowed away from its default
    pub fn is_set(&self, dimension: ConstraintDimension) -> bool {
        match dimension {
            ConstraintDimension::Viewport => self.device.viewport.is_some(),
            ConstraintDimension::Pointer => self.device.pointer.is_some(),
            ConstraintDimension::InputMethod => self.device.input_method.is_some(),
            ConstraintDimension::ScreenReader => self.accessibility.screen_reader,
            ConstraintDimension::HighContrast => self.accessibility.high_contrast,
            ConstraintDimension::ReducedMotion => self.accessibility.reduced_motion,
            ConstraintDimension::TokenSet => self.design_system.token_set.is_some(),
            ConstraintDimension::ColorScheme => self.design_system.color_scheme.is_some(),
            ConstraintDimension::Urgency => self.context.urgency.is_some(),
            ConstraintDimension::Density => self.context.density.is_some(),
        }
    }

    /// Narrowed dimensions in declaration order
    pub fn active_dimensions(&self) -> Vec<ConstraintDimension> {
        ConstraintDimension::ALL
            .into_iter()
            .filter(|d| self.is_set(*d))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.active_dimensions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let constraints = ConstraintSet::new();
        assert!(constraints.is_empty());
        assert!(constraints.active_dimensions().is_empty());
    }

    #[test]
    fn test_mobile_preset_dimensions() {
        assert_eq!(
            ConstraintSet::mobile().active_dimensions(),
            vec![
                ConstraintDimension::Viewport,
                ConstraintDimension::Pointer,
                ConstraintDimension::InputMethod
            ]
        );
    }

    #[test]
    fn test_urgency_ordering() {
        assert!(Urgency::Critical > Urgency::High);
        assert!(Urgency::Low < Urgency::Normal);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let constraints = ConstraintSet::new()
            .with_input_method(InputMethod::Keyboard)
            .with_screen_reader()
            .with_density(Density::Compact);
        let json = serde_json::to_value(&constraints).unwrap();
        assert_eq!(json["device"]["inputMethod"], "keyboard");
        assert_eq!(json["accessibility"]["screenReader"], true);
        assert_eq!(json["context"]["density"], "compact");

        let back: ConstraintSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, constraints);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let constraints: ConstraintSet =
            serde_json::from_str(r#"{"device":{"viewport":"tablet"}}"#).unwrap();
        assert_eq!(constraints.device.viewport, Some(ViewportClass::Tablet));
        assert!(!constraints.accessibility.reduced_motion);
    }
}
