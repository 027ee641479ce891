use genrelay_protocol::{GenerationResult, StreamEvent};

use crate::adapter::{GenerationParams, ProviderAdapter, UpstreamRequest};
use crate::errors::{BuildError, ParseError};
use crate::openai_compat::{
    bearer_header, chat_body, chat_completions_url, decode_chat_line, json_header,
    parse_chat_response,
};
use crate::profile::{ProviderKind, ProviderProfile};

/// The default dialect: bearer auth against `{base}/chat/completions`.
/// Covers OpenAI itself and the many endpoints that imitate it.
#[derive(Debug, Default)]
pub struct OpenAiCompatAdapter;

impl ProviderAdapter for OpenAiCompatAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAiCompatible
    }

    fn build_request(
        &self,
        profile: &ProviderProfile,
        params: &GenerationParams,
    ) -> Result<UpstreamRequest, BuildError> {
        Ok(UpstreamRequest {
            url: chat_completions_url(&profile.base_url),
            headers: vec![json_header(), bearer_header(&profile.credential)],
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
