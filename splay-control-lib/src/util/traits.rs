use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::control_interface::commands::CommandType;

/// A request the device's HTTP API understands.
///
/// The discriminant and the response shape are fixed per type, so the
/// dispatcher can hand back a typed answer without the device describing it.
pub trait Command: Serialize {
    /// The integer sent in the `command` field.
    const TYPE: CommandType;

    /// What a successful answer to this command deserializes into.
    type Response: DeserializeOwned;
}

/// The JSON body of a request: the command's own fields next to its discriminant.
#[derive(Debug, Serialize)]
pub struct TaggedCommand<'a, C> {
    command: CommandType,
    #[serde(flatten)]
    fields: &'a C,
}

impl<'a, C: Command> TaggedCommand<'a, C> {
    pub fn new(fields: &'a C) -> Self {
        TaggedCommand {
            command: C::TYPE,
            fields,
        }
    }
}

/// Whether a parsed response object reports success.
///
/// The HTTP status says nothing useful; the device answers 200 with a body
/// describing the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    /// `error` holds the device's reason, when it gave one.
    Failure { error: Option<String> },
}

impl ResponseStatus {
    /// A missing `result` counts as success; several responses never carry one.
    pub fn of(object: &Map<String, Value>) -> Self {
        match object.get("result") {
            None | Some(Value::Bool(true)) => ResponseStatus::Success,
            Some(_) => ResponseStatus::Failure {
                error: object.get("error").and_then(Self::error_text),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseStatus::Success)
    }

    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    fn error_text(value: &Value) -> Option<String> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::Number(number) if number.as_f64() == Some(0.0) => None,
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status(value: Value) -> ResponseStatus {
        match value {
            Value::Object(object) => ResponseStatus::of(&object),
            _ => panic!("test input must be an object"),
        }
    }

    #[test]
    fn test_missing_result_is_success() {
        assert!(status(json!({ "playlist": {} })).is_ok());
        assert!(status(json!({ "result": true, "version": "1.2" })).is_ok());
    }

    #[test]
    fn test_failures() {
        assert_eq!(
            status(json!({ "result": false, "error": "busy" })),
            ResponseStatus::Failure {
                error: Some("busy".to_string())
            }
        );
        assert_eq!(
            status(json!({ "result": false })),
            ResponseStatus::Failure { error: None }
        );
        assert_eq!(
            status(json!({ "result": "nope", "error": "" })),
            ResponseStatus::Failure { error: None }
        );
        assert_eq!(
            status(json!({ "result": 0, "error": 12 })),
            ResponseStatus::Failure {
                error: Some("12".to_string())
            }
        );
        assert!(status(json!({ "result": null })).is_error());
    }

    #[test]
    fn test_falsy_error_carries_no_reason() {
        for error in [json!(0), json!(0.0), json!(false), json!(null), json!("")] {
            assert_eq!(
                status(json!({ "result": false, "error": error })),
                ResponseStatus::Failure { error: None }
            );
        }
    }
}
