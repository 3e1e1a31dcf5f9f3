//! Intention JSON Schema and the total validator for untrusted input
//!
//! [`intention_schema`] is the wire contract handed to LLMs and other producers.
//! [`validate_intention`] enforces the same contract on arbitrary JSON without
//! ever panicking, collecting every violation before it reports.

use std::sync::OnceLock;

use serde_json::{json, Map, Value};

use crate::constraint::Urgency;
use crate::core::error::{IntentError, Result, Violation, ViolationKind};
use crate::intention::model::{Action, Intention, Purpose};

/// Outcome of validating or parsing an untrusted intention
pub type ParseResult = Result<Intention>;

const TOP_LEVEL_FIELDS: &[&str] = &["action", "subject", "purpose", "flow", "meta"];
const SUBJECT_FIELDS: &[&str] = &[
    "type",
    "label",
    "value",
    "constraints",
    "description",
    "iconHint",
];
const CONSTRAINT_FIELDS: &[&str] = &["options", "required", "min", "max", "pattern", "validate"];
const OPTION_FIELDS: &[&str] = &["value", "label", "description", "disabled"];
const FLOW_FIELDS: &[&str] = &["id", "parentId", "sequence", "totalSteps", "canGoBack"];

fn action_names() -> Vec<&'static str> {
    Action::ALL.iter().map(|a| a.as_str()).collect()
}

fn purpose_names() -> Vec<&'static str> {
    Purpose::ALL.iter().map(|p| p.as_str()).collect()
}

fn urgency_names() -> Vec<&'static str> {
    Urgency::ALL.iter().map(|u| u.as_str()).collect()
}

/// Draft-07 JSON Schema for an intention
pub fn intention_schema() -> &'static Value {
    static SCHEMA: OnceLock<Value> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "$id": "https://intention-resolver/schemas/intention.json",
            "title": "Intention",
            "type": "object",
            "required": ["action", "subject", "purpose"],
            "additionalProperties": false,
            "properties": {
                "action": { "type": "string", "enum": action_names() },
                "purpose": { "type": "string", "enum": purpose_names() },
                "subject": {
                    "type": "object",
                    "required": ["type", "label"],
                    "additionalProperties": false,
                    "properties": {
                        "type": { "type": "string", "minLength": 1 },
                        "label": { "type": "string", "minLength": 1 },
                        "value": {},
                        "description": { "type": "string" },
                        "iconHint": { "type": "string" },
                        "constraints": {
                            "type": "object",
                            "additionalProperties": false,
                            "properties": {
                                "options": {
                                    "type": "array",
                                    "items": {
                                        "type": "object",
                                        "required": ["value", "label"],
                                        "additionalProperties": false,
                                        "properties": {
                                            "value": { "type": "string", "minLength": 1 },
                                            "label": { "type": "string", "minLength": 1 },
                                            "description": { "type": "string" },
                                            "disabled": { "type": "boolean" }
                                        }
                                    }
                                },
                                "required": { "type": "boolean" },
                                "min": { "type": "number" },
                                "max": { "type": "number" },
                                "pattern": { "type": "string" },
                                "validate": { "type": "string" }
                            }
                        }
                    }
                },
                "flow": {
                    "type": "object",
                    "required": ["id", "sequence", "totalSteps"],
                    "additionalProperties": false,
                    "properties": {
                        "id": { "type": "string" },
                        "parentId": { "type": "string" },
                        "sequence": { "type": "integer", "minimum": 1 },
                        "totalSteps": { "type": "integer", "minimum": 1 },
                        "canGoBack": { "type": "boolean" }
                    }
                },
                "meta": {
                    "type": "object",
                    "properties": {
                        "source": { "type": "string" },
                        "urgency": { "type": "string", "enum": urgency_names() },
                        "tags": { "type": "array", "items": { "type": "string" } }
                    }
                }
            }
        })
    })
}

/// Validate untrusted JSON into an [`Intention`]
pub fn validate_intention(value: &Value) -> ParseResult {
    let mut violations = Vec::new();

    let Some(root) = value.as_object() else {
        return Err(IntentError::SchemaViolation(vec![Violation::new(
            "$",
            ViolationKind::WrongType {
                expected: "object".into(),
            },
        )]));
    };

    reject_unknown(root, TOP_LEVEL_FIELDS, "", &mut violations);
    check_enum(root, "action", "action", &action_names(), &mut violations);
    check_enum(root, "purpose", "purpose", &purpose_names(), &mut violations);
    check_subject(root.get("subject"), &mut violations);
    if let Some(flow) = root.get("flow") {
        check_flow(flow, &mut violations);
    }
    if let Some(meta) = root.get("meta") {
        check_meta(meta, &mut violations);
    }

    if !violations.is_empty() {
        return Err(IntentError::SchemaViolation(violations));
    }

    let intention: Intention = serde_json::from_value(value.clone()).map_err(|e| {
        IntentError::SchemaViolation(vec![Violation::new(
            "$",
            ViolationKind::Invalid {
                reason: e.to_string(),
            },
        )])
    })?;

    intention.validate()?;
    Ok(intention)
}

/// Parse JSON text and validate it
pub fn parse_intention_str(text: &str) -> ParseResult {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        IntentError::SchemaViolation(vec![Violation::new(
            "$",
            ViolationKind::Invalid {
                reason: format!("not valid JSON: {}", e),
            },
        )])
    })?;
    validate_intention(&value)
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn type_violation(path: String, expected: &str) -> Violation {
    Violation::new(
        path,
        ViolationKind::WrongType {
            expected: expected.into(),
        },
    )
}

fn reject_unknown(obj: &Map<String, Value>, allowed: &[&str], prefix: &str, out: &mut Vec<Violation>) {
    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            out.push(Violation::new(join(prefix, key), ViolationKind::UnexpectedField));
        }
    }
}

fn check_enum(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    allowed: &[&str],
    out: &mut Vec<Violation>,
) {
    match obj.get(key) {
        None | Some(Value::Null) => out.push(Violation::new(path, ViolationKind::Missing)),
        Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
        Some(Value::String(s)) => out.push(Violation::new(
            path,
            ViolationKind::NotInEnum {
                found: s.clone(),
                allowed: allowed.iter().map(|a| a.to_string()).collect(),
            },
        )),
        Some(_) => out.push(type_violation(path.into(), "string")),
    }
}

/// Required non-empty string
fn check_required_text(obj: &Map<String, Value>, key: &str, prefix: &str, out: &mut Vec<Violation>) {
    let path = join(prefix, key);
    match obj.get(key) {
        None | Some(Value::Null) => out.push(Violation::new(path, ViolationKind::Missing)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            out.push(Violation::new(path, ViolationKind::Empty))
        }
        Some(Value::String(_)) => {}
        Some(_) => out.push(type_violation(path, "string")),
    }
}

/// Optional field that must match `predicate` when present
fn check_optional(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
    expected: &str,
    predicate: fn(&Value) -> bool,
    out: &mut Vec<Violation>,
) {
    if let Some(v) = obj.get(key) {
        if !predicate(v) {
            out.push(type_violation(join(prefix, key), expected));
        }
    }
}

fn check_subject(subject: Option<&Value>, out: &mut Vec<Violation>) {
    let subject = match subject {
        None | Some(Value::Null) => {
            out.push(Violation::new("subject", ViolationKind::Missing));
            return;
        }
        Some(Value::Object(obj)) => obj,
        Some(_) => {
            out.push(type_violation("subject".into(), "object"));
            return;
        }
    };

    reject_unknown(subject, SUBJECT_FIELDS, "subject", out);
    check_required_text(subject, "type", "subject", out);
    check_required_text(subject, "label", "subject", out);
    check_optional(subject, "description", "subject", "string", Value::is_string, out);
    check_optional(subject, "iconHint", "subject", "string", Value::is_string, out);

    match subject.get("constraints") {
        None | Some(Value::Null) => {}
        Some(Value::Object(c)) => check_subject_constraints(c, out),
        Some(_) => out.push(type_violation("subject.constraints".into(), "object")),
    }
}

fn check_subject_constraints(c: &Map<String, Value>, out: &mut Vec<Violation>) {
    let prefix = "subject.constraints";
    reject_unknown(c, CONSTRAINT_FIELDS, prefix, out);
    check_optional(c, "required", prefix, "boolean", Value::is_boolean, out);
    check_optional(c, "min", prefix, "number", Value::is_number, out);
    check_optional(c, "max", prefix, "number", Value::is_number, out);
    check_optional(c, "pattern", prefix, "string", Value::is_string, out);
    check_optional(c, "validate", prefix, "string", Value::is_string, out);

    match c.get("options") {
        None | Some(Value::Null) => {}
        Some(Value::Array(options)) => {
            for (i, option) in options.iter().enumerate() {
                let path = format!("{}.options[{}]", prefix, i);
                let Some(obj) = option.as_object() else {
                    out.push(type_violation(path, "object"));
                    continue;
                };
                reject_unknown(obj, OPTION_FIELDS, &path, out);
                check_required_text(obj, "value", &path, out);
                check_required_text(obj, "label", &path, out);
                check_optional(obj, "description", &path, "string", Value::is_string, out);
                check_optional(obj, "disabled", &path, "boolean", Value::is_boolean, out);
            }
        }
        Some(_) => out.push(type_violation(format!("{}.options", prefix), "array")),
    }
}

fn is_step(v: &Value) -> bool {
    v.as_u64().is_some_and(|n| n >= 1 && n <= u64::from(u32::MAX))
}

fn check_flow(flow: &Value, out: &mut Vec<Violation>) {
    let Some(obj) = flow.as_object() else {
        out.push(type_violation("flow".into(), "object"));
        return;
    };
    reject_unknown(obj, FLOW_FIELDS, "flow", out);
    check_required_text(obj, "id", "flow", out);
    for key in ["sequence", "totalSteps"] {
        match obj.get(key) {
            None | Some(Value::Null) => {
                out.push(Violation::new(join("flow", key), ViolationKind::Missing))
            }
            Some(v) if is_step(v) => {}
            Some(_) => out.push(type_violation(join("flow", key), "integer >= 1")),
        }
    }
    check_optional(obj, "parentId", "flow", "string", Value::is_string, out);
    check_optional(obj, "canGoBack", "flow", "boolean", Value::is_boolean, out);
}

fn check_meta(meta: &Value, out: &mut Vec<Violation>) {
    let Some(obj) = meta.as_object() else {
        out.push(type_violation("meta".into(), "object"));
        return;
    };
    check_optional(obj, "source", "meta", "string", Value::is_string, out);
    if obj.get("urgency").is_some_and(|u| !u.is_null()) {
        check_enum(obj, "urgency", "meta.urgency", &urgency_names(), out);
    }
    check_optional(
        obj,
        "tags",
        "meta",
        "array of strings",
        |v| v.as_array().is_some_and(|a| a.iter().all(Value::is_string)),
        out,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Value {
        json!({
            "action": "choose-one",
            "purpose": "request",
            "subject": {
                "type": "option",
                "label": "Pick one",
                "constraints": {
                    "options": [
                        { "value": "a", "label": "A" },
                        { "value": "b", "label": "B", "disabled": true }
                    ]
                }
            }
        })
    }

    fn paths(err: &IntentError) -> Vec<&str> {
        err.violations().iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_schema_shape() {
        let schema = intention_schema();
        assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
        assert_eq!(schema["required"], json!(["action", "subject", "purpose"]));
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["properties"]["action"]["enum"].as_array().unwrap().len(), 10);
        assert_eq!(
            schema["properties"]["subject"]["properties"]["constraints"]["properties"]["options"]
                ["items"]["required"],
            json!(["value", "label"])
        );
    }

    #[test]
    fn test_schema_and_validator_agree_on_blank_option_fields() {
        let option = &intention_schema()["properties"]["subject"]["properties"]["constraints"]
            ["properties"]["options"]["items"]["properties"];
        assert_eq!(option["value"]["minLength"], 1);
        assert_eq!(option["label"]["minLength"], 1);

        let mut value = valid();
        value["subject"]["constraints"]["options"][0]["value"] = json!("");
        let err = validate_intention(&value).unwrap_err();
        assert_eq!(paths(&err), vec!["subject.constraints.options[0].value"]);
        assert_eq!(err.violations()[0].kind, ViolationKind::Empty);
    }

    #[test]
    fn test_valid_intention_passes() {
        let intention = validate_intention(&valid()).unwrap();
        assert_eq!(intention.action(), Action::ChooseOne);
        assert_eq!(intention.subject().options()[1].disabled, Some(true));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let value = json!({
            "action": "fly-to-moon",
            "subject": { "label": "", "constraints": { "options": [ { "value": "a" }, 3 ] } },
            "colour": "red"
        });
        let err = validate_intention(&value).unwrap_err();
        let found = paths(&err);
        for expected in [
            "colour",
            "action",
            "purpose",
            "subject.type",
            "subject.label",
            "subject.constraints.options[0].label",
            "subject.constraints.options[1]",
        ] {
            assert!(found.contains(&expected), "missing {} in {:?}", expected, found);
        }
    }

    #[test]
    fn test_enum_mismatch_names_allowed_values() {
        let mut value = valid();
        value["purpose"] = json!("shout");
        let err = validate_intention(&value).unwrap_err();
        match &err.violations()[0].kind {
            ViolationKind::NotInEnum { found, allowed } => {
                assert_eq!(found, "shout");
                assert!(allowed.contains(&"inform".to_string()));
            }
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root_does_not_panic() {
        for value in [json!(null), json!(42), json!("confirm"), json!([1, 2])] {
            let err = validate_intention(&value).unwrap_err();
            assert_eq!(paths(&err), vec!["$"]);
        }
    }

    #[test]
    fn test_semantic_checks_run_after_shape() {
        let value = json!({
            "action": "choose-many",
            "purpose": "request",
            "subject": { "type": "option", "label": "Pick" }
        });
        let err = validate_intention(&value).unwrap_err();
        assert_eq!(paths(&err), vec!["subject.constraints.options"]);
    }

    #[test]
    fn test_flow_and_meta_checked() {
        let mut value = valid();
        value["flow"] = json!({ "id": "w", "sequence": 0, "totalSteps": 2 });
        value["meta"] = json!({ "urgency": "meh", "tags": [1] });
        let err = validate_intention(&value).unwrap_err();
        let found = paths(&err);
        assert!(found.contains(&"flow.sequence"));
        assert!(found.contains(&"meta.urgency"));
        assert!(found.contains(&"meta.tags"));
    }

    #[test]
    fn test_parse_intention_str_rejects_bad_json() {
        let err = parse_intention_str("{not json").unwrap_err();
        assert!(matches!(err, IntentError::SchemaViolation(_)));
    }
}
