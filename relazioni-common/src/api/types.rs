//! Payload types for the extraction service
//!
//! Every field of the upload response is optional and decoded leniently: a
//! field of an unexpected type is treated as absent instead of failing the
//! whole response.
//!
//! # Examples
//!
//! ```
//! use relazioni_common::api::types::ProcessFilesResponse;
//!
//! let body = r#"{"message": "2 file processati", "report_filename": "report_1.csv",
//!                "num_relazioni_estratte": 7}"#;
//! let response: ProcessFilesResponse = serde_json::from_str(body).unwrap();
//!
//! assert_eq!(response.message.as_deref(), Some("2 file processati"));
//! assert_eq!(response.report_filename.as_deref(), Some("report_1.csv"));
//! assert!(response.warnings.is_empty());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Response of `POST /process_files`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawProcessFilesResponse")]
pub struct ProcessFilesResponse {
    /// Human-readable success text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Number of extracted relations, only when sent as a JSON number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_relazioni_estratte: Option<Number>,

    /// Server-assigned name of the generated CSV report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_filename: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,

    /// `warnings` or `errors` arrived as non-empty text instead of a list.
    /// Nothing is rendered for them, but the payload is not empty either.
    #[serde(skip)]
    pub unlisted_notes: bool,
}

impl ProcessFilesResponse {
    /// True when the payload carries nothing the user would see besides the
    /// relation count
    pub fn is_empty_result(&self) -> bool {
        self.message.is_none()
            && self.report_filename.is_none()
            && self.warnings.is_empty()
            && self.errors.is_empty()
            && !self.unlisted_notes
    }
}

/// Wire shape before the truthiness rules are applied
#[derive(Deserialize)]
struct RawProcessFilesResponse {
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    num_relazioni_estratte: Option<Value>,
    #[serde(default)]
    report_filename: Option<Value>,
    #[serde(default)]
    warnings: Option<Value>,
    #[serde(default)]
    errors: Option<Value>,
}

impl From<RawProcessFilesResponse> for ProcessFilesResponse {
    fn from(raw: RawProcessFilesResponse) -> Self {
        let unlisted_notes =
            is_non_empty_text(raw.warnings.as_ref()) || is_non_empty_text(raw.errors.as_ref());

        Self {
            message: raw.message.as_ref().and_then(truthy_text),
            num_relazioni_estratte: match raw.num_relazioni_estratte {
                Some(Value::Number(n)) => Some(n),
                _ => None,
            },
            report_filename: raw.report_filename.as_ref().and_then(truthy_text),
            warnings: text_list(raw.warnings),
            errors: text_list(raw.errors),
            unlisted_notes,
        }
    }
}

/// Body of a failed request
///
/// Accepts both `{"error": "text"}` and `{"error": {"message": "text"}}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "error_text")]
    pub error: Option<String>,
}

fn text_list(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn is_non_empty_text(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if !s.is_empty())
}

fn error_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map.get("message").and_then(truthy_scalar),
        Some(other) => truthy_scalar(&other),
        None => None,
    })
}

/// Text of a value that would pass a JavaScript truthiness check
///
/// Objects and arrays are always truthy; they render as compact JSON.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.to_string()),
        other => truthy_scalar(other),
    }
}

fn truthy_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
