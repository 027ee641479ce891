use bytes::Bytes;

use genrelay_protocol::{GenerationResult, StreamEvent};

use crate::errors::{BuildError, ParseError};
use crate::profile::{ProviderKind, ProviderProfile};

/// Effective parameters for one generation call, after the orchestrator has
/// applied defaults and resolved the model override.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// A fully prepared upstream HTTP POST. Building one is pure: identical
/// inputs always produce identical output.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// One upstream dialect: how to phrase a request, read a complete response,
/// and decode one line of a live stream. The orchestrator and relay never
/// branch on provider kind themselves; they go through this table.
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn build_request(
        &self,
        profile: &ProviderProfile,
        params: &GenerationParams,
    ) -> Result<UpstreamRequest, BuildError>;

    fn parse_response(
        &self,
        profile: &ProviderProfile,
        body: &[u8],
    ) -> Result<GenerationResult, ParseError>;

    /// Decodes one upstream stream line into zero or more normalized events.
    /// Malformed lines are skipped, not fatal; the relay stops at the first
    /// terminal event returned.
    fn decode_stream_line(&self, profile: &ProviderProfile, line: &str) -> Vec<StreamEvent>;
}
