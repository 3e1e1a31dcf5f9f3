//! Constraint specificity scoring
//!
//! Specificity is the weighted count of narrowed dimensions. Accessibility
//! flags are hard requirements for the user and weigh double. All weights are
//! positive, so adding a narrowed dimension always strictly raises the score.

use crate::constraint::model::{ConstraintDimension, ConstraintSet};

/// Weight of a single dimension in specificity sums
pub fn dimension_weight(dimension: ConstraintDimension) -> u32 {
    match dimension {
        ConstraintDimension::ScreenReader
        | ConstraintDimension::HighContrast
        | ConstraintDimension::ReducedMotion => 2,
        ConstraintDimension::Viewport
        | ConstraintDimension::Pointer
        | ConstraintDimension::InputMethod
        | ConstraintDimension::TokenSet
        | ConstraintDimension::ColorScheme
        | ConstraintDimension::Urgency
        | ConstraintDimension::Density => 1,
    }
}

/// Sum of weights over a set of dimensions, counting each dimension once
pub fn weight_of(dimensions: &[ConstraintDimension]) -> u32 {
    ConstraintDimension::ALL
        .into_iter()
        .filter(|d| dimensions.contains(d))
        .map(dimension_weight)
        .sum()
}

/// Score how narrowly a constraint set pins down the presentation
pub fn calculate_constraint_specificity(constraints: &ConstraintSet) -> u32 {
    weight_of(&constraints.active_dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::model::{Density, Urgency, ViewportClass};

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(calculate_constraint_specificity(&ConstraintSet::new()), 0);
    }

    #[test]
    fn test_more_dimensions_score_higher() {
        let device = ConstraintSet::new().with_viewport(ViewportClass::Mobile);
        let device_a11y = device.clone().with_screen_reader();
        let device_a11y_urgency = device_a11y.clone().with_urgency(Urgency::High);

        let a = calculate_constraint_specificity(&device);
        let b = calculate_constraint_specificity(&device_a11y);
        let c = calculate_constraint_specificity(&device_a11y_urgency);
        assert!(a < b && b < c, "{} {} {}", a, b, c);
    }

    #[test]
    fn test_build_order_does_not_matter() {
        let one = ConstraintSet::new()
            .with_density(Density::Compact)
            .with_viewport(ViewportClass::Desktop);
        let two = ConstraintSet::new()
            .with_viewport(ViewportClass::Desktop)
            .with_density(Density::Compact);
        assert_eq!(
            calculate_constraint_specificity(&one),
            calculate_constraint_specificity(&two)
        );
    }

    #[test]
    fn test_duplicate_dimensions_count_once() {
        let dims = [ConstraintDimension::Urgency, ConstraintDimension::Urgency];
        assert_eq!(weight_of(&dims), 1);
    }
}
