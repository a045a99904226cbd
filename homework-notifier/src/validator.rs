//! Structural check of the status payload before any field is consumed

use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::error::PollError;

/// A payload that passed `validate`. Extra top-level keys are ignored;
/// submission records stay raw and are checked one by one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiResponse {
    pub current_date: Value,
    pub homeworks: Vec<Value>,
}

impl ApiResponse {
    pub fn is_empty(&self) -> bool {
        self.homeworks.is_empty()
    }
}

pub fn validate(raw: Value) -> Result<ApiResponse, PollError> {
    let body = match raw {
        Value::Object(body) => body,
        other => {
            error!("Status payload is not an object: {}", json_kind(&other));
            return Err(PollError::MalformedResponse(format!(
                "expected an object, got {}",
                json_kind(&other)
            )));
        }
    };

    for key in ["current_date", "homeworks"] {
        if !body.contains_key(key) {
            error!("Status payload has no `{}` key", key);
            return Err(PollError::MalformedResponse(format!("missing `{key}` key")));
        }
    }

    if let Some(homeworks) = body.get("homeworks").filter(|v| !v.is_array()) {
        error!("`homeworks` is {}, expected an array", json_kind(homeworks));
        return Err(PollError::MalformedResponse(format!(
            "`homeworks` must be an array, got {}",
            json_kind(homeworks)
        )));
    }

    serde_json::from_value(Value::Object(body)).map_err(|e| {
        error!("Status payload does not deserialize: {}", e);
        PollError::MalformedResponse(e.to_string())
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
