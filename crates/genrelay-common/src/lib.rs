use serde::{Deserialize, Serialize};
use serde_json::Value;

/// In-band status codes carried by the response envelope. The transport
/// status stays 200; clients branch on `code`.
pub const CODE_SUCCESS: i32 = 0;
pub const CODE_INVALID_PARAMS: i32 = 400;
pub const CODE_UNAUTHORIZED: i32 = 401;
pub const CODE_FORBIDDEN: i32 = 403;
pub const CODE_NOT_FOUND: i32 = 404;
pub const CODE_SERVER_ERROR: i32 = 500;

/// Uniform response envelope for every non-streaming reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i32,
    pub message: String,
    pub data: Option<Value>,
}

impl Envelope {
    pub fn success(message: impl Into<String>, data: Value) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Masks a secret for display: short values collapse entirely, longer ones
/// keep the first and last four characters. Operates on characters, not
/// bytes, so multibyte credentials never split mid-character.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}****{tail}")
}
