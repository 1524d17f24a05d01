use reqwest::StatusCode;
use serde_json::Value;

use crate::error::Result;

/// Result of a DCI client call.
///
/// Either the structure is already at hand, or it is an HTTP body that still
/// has to be decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Raw(Value),
    Http { status: StatusCode, body: Vec<u8> },
}

impl ApiResponse {
    /// Decodes the response into a JSON structure.
    ///
    /// `204 No Content` and blank bodies decode to `Value::Null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn into_payload(self) -> Result<Value> {
        match self {
            Self::Raw(value) => Ok(value),
            Self::Http {
                status: StatusCode::NO_CONTENT,
                ..
            } => Ok(Value::Null),
            Self::Http { body, .. } if body.iter().all(u8::is_ascii_whitespace) => {
                Ok(Value::Null)
            }
            Self::Http { body, .. } => Ok(serde_json::from_slice(&body)?),
        }
    }
}

impl From<Value> for ApiResponse {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}
