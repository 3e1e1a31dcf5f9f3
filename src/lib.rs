//! Intention Resolver - declarative user intentions to neutral render instructions
//!
//! An intention says what the user must do. Constraints say what the device,
//! the user and the context allow. The resolution engine picks a pattern and
//! behaviour traits, and the render builder turns those into style, ARIA and
//! data-attribute instructions for an external materializer.

pub mod affinity;
pub mod constraint;
pub mod core;
pub mod intention;
pub mod llm;
pub mod render;
pub mod resolution;

pub use crate::affinity::{default_rule_table, RuleTable};
pub use crate::constraint::ConstraintSet;
pub use crate::core::{IntentError, ResolverConfig, Result};
pub use crate::intention::Intention;
pub use crate::render::ResolvedUI;
pub use crate::resolution::{Resolution, ResolutionEngine};
