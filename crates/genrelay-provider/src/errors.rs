/// Request construction can only fail on body serialization, which is an
/// internal fault rather than a user error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("request body serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("malformed upstream response: {0}")]
    Malformed(String),
    #[error("upstream returned no content")]
    NoContent,
}
