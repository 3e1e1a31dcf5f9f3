//! Turn free-text provider replies into validated intentions
//!
//! Models wrap JSON in prose and markdown fences. A fenced ```json block is
//! preferred; otherwise the first brace that opens a complete JSON object is
//! taken, and anything after that object is ignored. The extracted object then
//! goes through the same validator as any other untrusted input.

use serde_json::{Deserializer, Value};

use crate::core::error::{IntentError, Result};
use crate::intention::{validate_intention, ParseResult};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Extract the JSON object from a provider reply
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(fenced) = fenced_json(response) {
        return Ok(fenced);
    }

    for (start, _) in response.match_indices('{') {
        let mut stream = Deserializer::from_str(&response[start..]).into_iter::<Value>();
        if let Some(Ok(Value::Object(_))) = stream.next() {
            return Ok(&response[start..start + stream.byte_offset()]);
        }
    }
    Err(malformed("no JSON object found in response", response))
}

/// Body of the first ```json fence, if it holds an object
fn fenced_json(response: &str) -> Option<&str> {
    let open = response.find(JSON_FENCE)? + JSON_FENCE.len();
    let rest = &response[open..];
    let close = rest.find(FENCE)?;
    let body = rest[..close].trim();
    (body.starts_with('{') && body.ends_with('}')).then_some(body)
}

fn malformed(reason: &str, raw: &str) -> IntentError {
    IntentError::MalformedProviderOutput {
        reason: reason.to_string(),
        raw: raw.to_string(),
    }
}

/// Extract, parse and validate an intention from a provider reply
///
/// Text without a JSON object, or JSON that does not parse, is malformed
/// output. A well-formed object that breaks the schema is a schema violation.
pub fn parse_intention_response(response: &str) -> ParseResult {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str)
        .map_err(|e| malformed(&format!("invalid JSON: {}", e), response))?;
    validate_intention(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intention::Action;

    #[test]
    fn test_extract_json_simple() {
        let response = r#"{"action": "confirm"}"#;
        assert_eq!(extract_json(response).unwrap(), response);
    }

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Here you go:
{"action": "review", "subject": {"type": "order", "label": "Order"}}
Let me know if you need anything else."#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("review"));
    }

    #[test]
    fn test_braces_in_trailing_prose_are_ignored() {
        let response = r#"Here it is: {"action":"review","subject":{"type":"order","label":"Order"},"purpose":"inform"} (fields use {camelCase})"#;
        let intention = parse_intention_response(response).unwrap();
        assert_eq!(intention.action(), Action::Review);
    }

    #[test]
    fn test_braces_in_leading_prose_are_skipped() {
        let response = r#"Set {x} first, then: {"action": "confirm"} ok"#;
        assert_eq!(extract_json(response).unwrap(), r#"{"action": "confirm"}"#);
    }

    #[test]
    fn test_nested_object_is_taken_whole() {
        let response = r#"Result: {"subject": {"label": "A"}, "n": 1}. {"other": 2}"#;
        assert_eq!(
            extract_json(response).unwrap(),
            r#"{"subject": {"label": "A"}, "n": 1}"#
        );
    }

    #[test]
    fn test_fence_preferred_over_braces() {
        let response = "Use {curly} notes.\n```json\n{\"a\": 1}\n```\nDone {}";
        assert_eq!(extract_json(response).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_inline_fence() {
        let response = r#"Sure! ```json {"action":"confirm"}``` Thanks"#;
        assert_eq!(extract_json(response).unwrap(), r#"{"action":"confirm"}"#);
    }

    #[test]
    fn test_extract_json_no_json() {
        let err = extract_json("I don't understand that").unwrap_err();
        assert_eq!(err.raw_output(), Some("I don't understand that"));
    }

    #[test]
    fn test_reversed_braces_are_malformed() {
        assert!(matches!(
            extract_json("} oops {"),
            Err(IntentError::MalformedProviderOutput { .. })
        ));
    }

    #[test]
    fn test_parse_valid_response() {
        let response = r#"{"action":"confirm","subject":{"type":"file","label":"Delete?"},"purpose":"confirm"}"#;
        let intention = parse_intention_response(response).unwrap();
        assert_eq!(intention.action(), Action::Confirm);
    }

    #[test]
    fn test_broken_json_is_malformed_not_schema() {
        let err = parse_intention_response(r#"{"action": "confirm",}"#).unwrap_err();
        assert!(matches!(err, IntentError::MalformedProviderOutput { .. }));
    }

    #[test]
    fn test_unknown_action_is_schema_violation() {
        let response = r#"{"action":"fly-to-moon","subject":{"type":"x","label":"Moon"},"purpose":"request"}"#;
        let err = parse_intention_response(response).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field(), "action");
    }
}
