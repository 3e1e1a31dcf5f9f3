pub mod config;
pub mod error;
pub mod types;

pub use config::ResolverConfig;
pub use error::{IntentError, Result, Violation, ViolationKind};
pub use types::{ResolutionId, Timestamp};
