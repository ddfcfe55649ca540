use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fallback for a validation body whose field list is empty or unreadable
pub const INVALID_INPUT: &str = "Invalid Input";
/// Fallback for an error response carrying nothing we can show
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
/// Fallback for a request that never produced a usable response
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Per-field rejection, recoverable by editing input
    Validation,
    /// A single human-readable message asserted by the backend
    Generic,
    /// Nothing usable came back: transport or decoding failure
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The one error shape handed to UI code.
///
/// Every failed backend call is classified into exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct NormalizedError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
}

impl NormalizedError {
    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        let message = field_errors
            .first()
            .map(|e| e.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| INVALID_INPUT.to_string());
        Self {
            kind: ErrorKind::Validation,
            message,
            field_errors,
        }
    }

    /// A single local field rejection
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError {
            field: field.to_string(),
            message: message.into(),
        }])
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Generic,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    /// A request that failed before any error body could be read
    pub fn unknown() -> Self {
        Self::network(UNKNOWN_ERROR)
    }

    /// Classify a decoded error body.
    ///
    /// Recognized shapes:
    ///  - `{ "detail": { "detail": [ { "field", "msg" }, ... ] } }` -> validation
    ///  - `{ "detail": [ { "loc", "msg" }, ... ] }` -> validation
    ///  - `{ "detail": "<message>" }` -> generic
    ///  - anything else -> network
    pub fn normalize(body: &Value) -> Self {
        match body.get("detail") {
            Some(Value::String(message)) if !message.is_empty() => Self::generic(message.clone()),
            Some(Value::Array(entries)) => Self::validation(entries.iter().map(field_error).collect()),
            Some(detail @ Value::Object(_)) => match detail.get("detail") {
                Some(Value::Array(entries)) => {
                    Self::validation(entries.iter().map(field_error).collect())
                }
                Some(Value::String(message)) if !message.is_empty() => {
                    Self::generic(message.clone())
                }
                _ => Self::network(SOMETHING_WENT_WRONG),
            },
            _ => Self::network(SOMETHING_WENT_WRONG),
        }
    }

    /// Classify a raw error response body.
    /// Bytes that do not decode as JSON count as an empty body.
    pub fn from_body(bytes: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(bytes).unwrap_or(Value::Null);
        Self::normalize(&body)
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

fn field_error(entry: &Value) -> FieldError {
    let field = match (entry.get("field"), entry.get("loc")) {
        (Some(Value::String(field)), _) => field.clone(),
        (_, Some(Value::Array(loc))) => loc
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("."),
        _ => String::new(),
    };
    let message = entry
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    FieldError { field, message }
}
