use genrelay_protocol::{GenerationResult, StreamEvent};

use crate::adapter::{GenerationParams, ProviderAdapter, UpstreamRequest};
use crate::errors::{BuildError, ParseError};
use crate::openai_compat::{
    chat_body, chat_completions_url, decode_chat_line, json_header, parse_chat_response,
};
use crate::profile::{ProviderKind, ProviderProfile};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic endpoints accept the OpenAI-compatible chat body here; only the
/// auth headers differ (`x-api-key` plus a pinned `anthropic-version`).
#[derive(Debug, Default)]
pub struct AnthropicAdapter;

impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn build_request(
        &self,
        profile: &ProviderProfile,
        params: &GenerationParams,
    ) -> Result<UpstreamRequest, BuildError> {
        Ok(UpstreamRequest {
            url: chat_completions_url(&profile.base_url),
            headers: vec![
                json_header(),
                ("x-api-key".to_string(), profile.credential.clone()),
                (
                    "anthropic-version".to_string(),
                    ANTHROPIC_VERSION.to_string(),
                ),
            ],
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_anthropic_auth_headers() {
        let profile = ProviderProfile {
            id: 1,
            owner: "owner".to_string(),
            name: "claude".to_string(),
            kind: ProviderKind::Anthropic,
            base_url: "https://api.anthropic.com/v1".to_string(),
            model: "claude-3-5-haiku".to_string(),
            credential: "sk-ant-test".to_string(),
            enabled: true,
            open: false,
        };
        let params = GenerationParams {
            model: "claude-3-5-haiku".to_string(),
            prompt: "hi".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            stream: true,
        };

        let request = AnthropicAdapter.build_request(&profile, &params).unwrap();
        assert_eq!(request.url, "https://api.anthropic.com/v1/chat/completions");
        assert!(
            request
                .headers
                .contains(&("x-api-key".to_string(), "sk-ant-test".to_string()))
        );
        assert!(
            request
                .headers
                .contains(&("anthropic-version".to_string(), "2023-06-01".to_string()))
        );
        assert!(
            !request
                .headers
                .iter()
                .any(|(name, _)| name == "Authorization")
        );
    }
}
