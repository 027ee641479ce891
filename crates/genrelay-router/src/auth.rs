use std::collections::HashMap;

use axum::http::{HeaderMap, header};

use genrelay_core::CallerIdentity;

/// Maps inbound credentials to a caller identity. The router runs this on
/// every request before the handler sees it.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Option<CallerIdentity>;
}

/// Static token table seeded at startup.
#[derive(Debug, Default)]
pub struct TokenAuth {
    tokens: HashMap<String, String>,
}

impl TokenAuth {
    pub fn new(tokens: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }
}

impl Authenticator for TokenAuth {
    fn authenticate(&self, headers: &HeaderMap) -> Option<CallerIdentity> {
        let token = extract_bearer(headers)?;
        self.tokens.get(token).map(CallerIdentity::new)
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`, case-insensitive
/// on the scheme.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if value.len() > prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix) {
        let token = value[prefix.len()..].trim();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}
