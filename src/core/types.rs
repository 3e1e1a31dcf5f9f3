//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single resolution
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
#[serde(transparent)]
pub struct ResolutionId(pub Uuid);

impl ResolutionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResolutionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock instant a resolution was produced
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse a kebab-case wire name into any of the crate's serde enums
///
/// Shaped for clap's `value_parser`, so CLI flags accept exactly the wire names.
pub fn parse_wire_name<T: serde::de::DeserializeOwned>(name: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| format!("unknown value '{}'", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_ids_are_unique() {
        assert_ne!(ResolutionId::new(), ResolutionId::new());
    }

    #[test]
    fn test_resolution_id_display_matches_uuid() {
        let id = ResolutionId::new();
        assert_eq!(id.to_string(), id.0.to_string());
    }

    #[test]
    fn test_resolution_id_serializes_transparently() {
        let id = ResolutionId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }

    #[test]
    fn test_parse_wire_name() {
        use crate::constraint::{Density, ViewportClass};
        assert_eq!(parse_wire_name::<ViewportClass>("mobile"), Ok(ViewportClass::Mobile));
        assert_eq!(parse_wire_name::<Density>("compact"), Ok(Density::Compact));
        assert!(parse_wire_name::<Density>("cramped").unwrap_err().contains("cramped"));
    }
}
