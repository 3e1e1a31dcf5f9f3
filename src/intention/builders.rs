//! Builder functions for the common intention shapes
//!
//! Every builder defaults `purpose` and checks its output against the intention
//! schema, so an `Ok` intention always survives a schema round-trip. Degenerate
//! input (an empty label, no options for a selection, inverted length bounds)
//! comes back as a `SchemaViolation` naming the offending field.

use serde_json::Value;

use crate::constraint::Urgency;
use crate::intention::model::{
    Action, Intention, IntentionMeta, Purpose, SelectOption, Subject, SubjectConstraints,
};
use crate::intention::schema::{validate_intention, ParseResult};

/// Run a built intention through the same validator untrusted JSON gets
fn finish(intention: Intention) -> ParseResult {
    validate_intention(&serde_json::to_value(&intention)?)
}

#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    /// Allow several options to be chosen
    pub multiple: bool,
    pub required: bool,
    /// Overrides the `option` subject type
    pub subject_type: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TextInputOptions {
    /// Overrides the `text` subject type (`email`, `long-text` ...)
    pub subject_type: Option<String>,
    pub required: bool,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub pattern: Option<String>,
    pub validate: Option<String>,
    pub initial_value: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmationOptions {
    /// Frame the confirmation as an alert and hint high urgency
    pub urgent: bool,
    pub description: Option<String>,
    pub icon_hint: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    pub subject_type: Option<String>,
    pub value: Option<Value>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AlertOptions {
    pub severity: Option<Urgency>,
    /// Ask the user to acknowledge instead of merely showing the alert
    pub requires_acknowledgement: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProgressOptions {
    /// Completion fraction in `[0, 1]`; absent for indeterminate progress
    pub fraction: Option<f64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationOptions {
    pub description: Option<String>,
}

pub fn create_selection_intention(
    options: Vec<SelectOption>,
    label: impl Into<String>,
    opts: SelectionOptions,
) -> ParseResult {
    let action = if opts.multiple {
        Action::ChooseMany
    } else {
        Action::ChooseOne
    };
    let mut subject = Subject::new(
        opts.subject_type.unwrap_or_else(|| "option".into()),
        label,
    );
    subject.description = opts.description;
    subject.constraints = Some(SubjectConstraints {
        options: Some(options),
        required: opts.required.then_some(true),
        ..Default::default()
    });
    finish(Intention::new(action, subject, Purpose::Request))
}

pub fn create_text_input_intention(label: impl Into<String>, opts: TextInputOptions) -> ParseResult {
    let mut subject = Subject::new(opts.subject_type.unwrap_or_else(|| "text".into()), label);
    subject.description = opts.description;
    subject.value = opts.initial_value.map(Value::String);

    let constraints = SubjectConstraints {
        options: None,
        required: opts.required.then_some(true),
        min: opts.min_length.map(f64::from),
        max: opts.max_length.map(f64::from),
        pattern: opts.pattern,
        validate: opts.validate,
    };
    if constraints != SubjectConstraints::default() {
        subject.constraints = Some(constraints);
    }
    finish(Intention::new(Action::ProvideText, subject, Purpose::Request))
}

pub fn create_confirmation_intention(
    label: impl Into<String>,
    opts: ConfirmationOptions,
) -> ParseResult {
    let mut subject = Subject::new("decision", label);
    subject.description = opts.description;
    subject.icon_hint = opts.icon_hint;

    finish(if opts.urgent {
        Intention::new(Action::Confirm, subject, Purpose::Alert).with_meta(IntentionMeta {
            urgency: Some(Urgency::High),
            ..Default::default()
        })
    } else {
        Intention::new(Action::Confirm, subject, Purpose::Confirm)
    })
}

pub fn create_review_intention(label: impl Into<String>, opts: ReviewOptions) -> ParseResult {
    let mut subject = Subject::new(opts.subject_type.unwrap_or_else(|| "record".into()), label);
    subject.value = opts.value;
    subject.description = opts.description;
    finish(Intention::new(Action::Review, subject, Purpose::Inform))
}

pub fn create_alert_intention(label: impl Into<String>, opts: AlertOptions) -> ParseResult {
    let action = if opts.requires_acknowledgement {
        Action::Acknowledge
    } else {
        Action::Alert
    };
    let mut subject = Subject::new("notice", label);
    subject.description = opts.description;

    let intention = Intention::new(action, subject, Purpose::Alert);
    finish(match opts.severity {
        Some(urgency) => intention.with_meta(IntentionMeta {
            urgency: Some(urgency),
            ..Default::default()
        }),
        None => intention,
    })
}

pub fn create_progress_intention(label: impl Into<String>, opts: ProgressOptions) -> ParseResult {
    let mut subject = Subject::new("progress", label);
    subject.description = opts.description;
    if let Some(fraction) = opts.fraction {
        subject.value = serde_json::Number::from_f64(fraction.clamp(0.0, 1.0)).map(Value::Number);
        subject.constraints = Some(SubjectConstraints {
            min: Some(0.0),
            max: Some(1.0),
            ..Default::default()
        });
    }
    finish(Intention::new(Action::Wait, subject, Purpose::Progress))
}

pub fn create_navigation_intention(
    destinations: Vec<SelectOption>,
    label: impl Into<String>,
    opts: NavigationOptions,
) -> ParseResult {
    let mut subject = Subject::new("destination", label);
    subject.description = opts.description;
    if !destinations.is_empty() {
        subject.constraints = Some(SubjectConstraints {
            options: Some(destinations),
            ..Default::default()
        });
    }
    finish(Intention::new(Action::Navigate, subject, Purpose::Request))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ab() -> Vec<SelectOption> {
        vec![SelectOption::new("a", "A"), SelectOption::new("b", "B")]
    }

    #[test]
    fn test_selection_defaults() {
        let intention = create_selection_intention(ab(), "Pick one", SelectionOptions::default()).unwrap();
        assert_eq!(intention.action(), Action::ChooseOne);
        assert_eq!(intention.purpose(), Purpose::Request);
        assert_eq!(intention.subject().kind, "option");
        assert_eq!(intention.subject().options().len(), 2);
        assert!(intention.validate().is_ok());
    }

    #[test]
    fn test_multiple_selection_is_choose_many() {
        let opts = SelectionOptions {
            multiple: true,
            ..Default::default()
        };
        let intention = create_selection_intention(ab(), "Pick some", opts).unwrap();
        assert_eq!(intention.action(), Action::ChooseMany);
    }

    #[test]
    fn test_text_input_without_limits_has_no_constraints() {
        let intention = create_text_input_intention("Name", TextInputOptions::default()).unwrap();
        assert!(intention.subject().constraints.is_none());

        let intention = create_text_input_intention(
            "Email",
            TextInputOptions {
                subject_type: Some("email".into()),
                required: true,
                max_length: Some(120),
                ..Default::default()
            },
        )
        .unwrap();
        let constraints = intention.subject().constraints.as_ref().unwrap();
        assert_eq!(constraints.required, Some(true));
        assert_eq!(constraints.max, Some(120.0));
    }

    #[test]
    fn test_urgent_confirmation_hints_high_urgency() {
        let intention = create_confirmation_intention(
            "Delete item",
            ConfirmationOptions {
                urgent: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(intention.purpose(), Purpose::Alert);
        assert_eq!(intention.urgency_hint(), Some(Urgency::High));

        let calm = create_confirmation_intention("Save", ConfirmationOptions::default()).unwrap();
        assert_eq!(calm.purpose(), Purpose::Confirm);
        assert_eq!(calm.urgency_hint(), None);
    }

    #[test]
    fn test_alert_acknowledgement_switches_action() {
        let intention = create_alert_intention(
            "Session expired",
            AlertOptions {
                requires_acknowledgement: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(intention.action(), Action::Acknowledge);
        assert_eq!(intention.purpose(), Purpose::Alert);
    }

    #[test]
    fn test_progress_fraction_is_clamped() {
        let intention = create_progress_intention(
            "Uploading",
            ProgressOptions {
                fraction: Some(1.7),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(intention.subject().value, Some(serde_json::json!(1.0)));
        assert_eq!(intention.action(), Action::Wait);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let err = create_selection_intention(vec![], "", SelectionOptions::default()).unwrap_err();
        assert!(err.violations().iter().any(|v| v.path == "subject.label"));

        let err = create_selection_intention(vec![], "Pick", SelectionOptions::default()).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].path, "subject.constraints.options");
    }

    #[test]
    fn test_inverted_length_bounds_are_rejected() {
        let err = create_text_input_intention(
            "Code",
            TextInputOptions {
                min_length: Some(10),
                max_length: Some(5),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].path, "subject.constraints.min");
    }

    #[test]
    fn test_blank_option_value_is_rejected() {
        let err = create_selection_intention(
            vec![SelectOption::new("", "Nothing")],
            "Pick",
            SelectionOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.violations()[0].path, "subject.constraints.options[0].value");
    }

    #[test]
    fn test_navigation_without_destinations_is_valid() {
        let intention = create_navigation_intention(vec![], "Go", NavigationOptions::default()).unwrap();
        assert!(intention.subject().constraints.is_none());
    }
}
