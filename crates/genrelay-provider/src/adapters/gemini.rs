use genrelay_protocol::{GenerationResult, StreamEvent};

use crate::adapter::{GenerationParams, ProviderAdapter, UpstreamRequest};
use crate::errors::{BuildError, ParseError};
use crate::openai_compat::{chat_body, decode_chat_line, json_header, parse_chat_response};
use crate::profile::{ProviderKind, ProviderProfile};

/// Google Gemini: the credential travels as the `key` query parameter, and
/// the target is `{base}/models/{model}:generateContent`. Request body and
/// response shape stay OpenAI-compatible.
#[derive(Debug, Default)]
pub struct GeminiAdapter;

impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleGemini
    }

    fn build_request(
        &self,
        profile: &ProviderProfile,
        params: &GenerationParams,
    ) -> Result<UpstreamRequest, BuildError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            profile.trimmed_base_url(),
            params.model,
            urlencoding::encode(&profile.credential),
        );
        Ok(UpstreamRequest {
            url,
            headers: vec![json_header()],
            body: chat_body(params)?,
        })
    }

    fn parse_response(
        &self,
        _profile: &ProviderProfile,
        body: &[u8],
    ) -> Result<GenerationResult, ParseError> {
        parse_chat_response(body)
    }

    fn decode_stream_line(&self, _profile: &ProviderProfile, line: &str) -> Vec<StreamEvent> {
        decode_chat_line(line)
    }
}
