//! Constraint model and specificity scoring

pub mod model;
pub mod specificity;

pub use model::{
    AccessibilityConstraints, ColorScheme, ConstraintDimension, ConstraintSet, ContextConstraints,
    Density, DesignSystemConstraints, DeviceConstraints, InputMethod, PointerType, Urgency,
    ViewportClass,
};
pub use specificity::{calculate_constraint_specificity, dimension_weight, weight_of};
