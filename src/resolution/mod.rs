//! Resolution: pick a pattern and traits for an intention under constraints

pub mod engine;
pub mod pattern;
pub mod types;

pub use engine::{ResolutionEngine, ResolveRequest};
pub use pattern::{action_to_pattern, ResolutionPattern};
pub use types::{Manifestation, Reasoning, Resolution};
