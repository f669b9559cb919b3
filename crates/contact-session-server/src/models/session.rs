use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== STORED MODELS =====

/// One contact-collection event. Persisted as `<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub name: String,
    /// Epoch milliseconds. Recorded at creation, never revised.
    pub expires_at: i64,
    pub contacts: Vec<Contact>,
}

impl Session {
    pub fn new(id: String, name: String, expires_at: i64) -> Self {
        Self {
            id,
            name,
            expires_at,
            contacts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone: String,
}

// ===== REQUEST MODELS =====

// Fields stay loosely typed: both JSON and urlencoded bodies land here,
// and a wrong type must surface as a 422, not a body rejection.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub session_name: Option<Value>,
    #[serde(default)]
    pub minutes: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddContactRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub phone: Option<Value>,
}

// ===== RESPONSE MODELS =====

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddContactResponse {
    pub success: bool,
}

// ===== FIELD COERCION =====

/// Reads a free-text field. Strings and non-zero numbers count as present;
/// empty strings, zero, null and any other JSON type count as missing.
pub fn text_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads the session duration with loose numeric coercion.
///
/// Falsy values (missing, `null`, `false`, `0`, `""`) count as missing.
/// Anything else is coerced: `true` is 1, numeric strings parse, a blank
/// string is 0. Values with no numeric reading come back as NaN so the
/// caller can reject them.
pub fn minutes_field(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some(1.0),
        Value::Number(n) => n.as_f64().filter(|m| *m != 0.0),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                Some(trimmed.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        Value::Array(_) | Value::Object(_) => Some(f64::NAN),
    }
}
