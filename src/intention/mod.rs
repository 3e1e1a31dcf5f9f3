//! Intention model
//!
//! What the user must do, independent of visual form:
//! builders for trusted callers, schema validation for untrusted JSON.

pub mod builders;
pub mod model;
pub mod schema;

pub use builders::{
    create_alert_intention, create_confirmation_intention, create_navigation_intention,
    create_progress_intention, create_review_intention, create_selection_intention,
    create_text_input_intention, AlertOptions, ConfirmationOptions, NavigationOptions,
    ProgressOptions, ReviewOptions, SelectionOptions, TextInputOptions,
};
pub use model::{
    Action, FlowMeta, Intention, IntentionMeta, Purpose, SelectOption, Subject,
    SubjectConstraints,
};
pub use schema::{intention_schema, parse_intention_str, validate_intention, ParseResult};
