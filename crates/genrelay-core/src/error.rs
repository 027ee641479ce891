use genrelay_common::{
    CODE_FORBIDDEN, CODE_INVALID_PARAMS, CODE_NOT_FOUND, CODE_SERVER_ERROR, CODE_UNAUTHORIZED,
};
use genrelay_provider::{BuildError, ParseError};

/// Everything a generation call can fail with, detected as early as the
/// pipeline allows. Never retried; the caller re-issues the request.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    InvalidParams(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("provider belongs to another tenant")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("upstream call failed: {0}")]
    Transport(String),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("{0}")]
    Internal(String),
}

impl GenerateError {
    /// Envelope code for the in-band error channel.
    pub fn code(&self) -> i32 {
        match self {
            GenerateError::InvalidParams(_) => CODE_INVALID_PARAMS,
            GenerateError::Unauthorized => CODE_UNAUTHORIZED,
            GenerateError::Forbidden => CODE_FORBIDDEN,
            GenerateError::NotFound(_) => CODE_NOT_FOUND,
            GenerateError::Upstream { .. }
            | GenerateError::Transport(_)
            | GenerateError::Parse(_)
            | GenerateError::Internal(_) => CODE_SERVER_ERROR,
        }
    }
}

impl From<BuildError> for GenerateError {
    fn from(err: BuildError) -> Self {
        GenerateError::Internal(err.to_string())
    }
}
