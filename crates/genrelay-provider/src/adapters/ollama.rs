use bytes::Bytes;
use tracing::debug;

use genrelay_protocol::ollama;
use genrelay_protocol::{GenerationResult, StreamEvent, Usage, strip_html_tags};

use crate::adapter::{GenerationParams, ProviderAdapter, UpstreamRequest};
use crate::errors::{BuildError, ParseError};
use crate::openai_compat::{
    bearer_header, chat_body, chat_completions_url, decode_chat_line, json_header,
    parse_chat_response,
};
use crate::profile::{ProviderKind, ProviderProfile};

/// Ollama speaks two dialects. With `/v1` in the base URL it behaves as an
/// OpenAI-compatible endpoint; otherwise it uses the native `/api/generate`
/// protocol: prompt instead of messages, no max_tokens, NDJSON streaming,
/// and no auth header.
#[derive(Debug, Default)]
pub struct OllamaAdapter;

impl ProviderAdapter for OllamaAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ollama
    }

    fn build_request(
        &self,
        profile: &ProviderProfile,
        params: &GenerationParams,
    ) -> Result<UpstreamRequest, BuildError> {
        if !profile.native_ollama() {
            return Ok(UpstreamRequest {
                url: chat_completions_url(&profile.base_url),
                headers: vec![json_header(), bearer_header(&profile.credential)],
                body: chat_body(params)?,
            });
        }

        let request = ollama::GenerateRequest {
            model: params.model.clone(),
            prompt: params.prompt.clone(),
            temperature: params.temperature,
            stream: params.stream,
        };
        Ok(UpstreamRequest {
            url: format!("{}/api/generate", profile.trimmed_base_url()),
            headers: vec![json_header()],
            body: Bytes::from(serde_json::to_vec(&request)?),
        })
    }

    fn parse_response(
        &self,
        profile: &ProviderProfile,
        body: &[u8],
    ) -> Result<GenerationResult, ParseError> {
        if !profile.native_ollama() {
            return parse_chat_response(body);
        }

        let parsed: ollama::GenerateResponse =
            serde_json::from_slice(body).map_err(|err| ParseError::Malformed(err.to_string()))?;
        let content = parsed
            .response
            .filter(|response| !response.is_empty())
            .ok_or(ParseError::NoContent)?;

        let mut usage = Usage {
            prompt_tokens: parsed.prompt_eval_count,
            ..Usage::default()
        };
        if let Some(eval_count) = parsed.eval_count {
            usage.completion_tokens = Some(eval_count);
            if let Some(prompt_eval_count) = parsed.prompt_eval_count {
                usage.total_tokens = Some(prompt_eval_count + eval_count);
            }
        }

        Ok(GenerationResult {
            content: strip_html_tags(&content),
            usage,
        })
    }

    fn decode_stream_line(&self, profile: &ProviderProfile, line: &str) -> Vec<StreamEvent> {
        if !profile.native_ollama() {
            return decode_chat_line(line);
        }

        let parsed: ollama::GenerateResponse = match serde_json::from_str(line) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(event = "stream_payload_skipped", error = %err);
                return Vec::new();
            }
        };

        let mut events = Vec::new();
        if let Some(response) = parsed.response.as_deref()
            && !response.is_empty()
        {
            let clean = strip_html_tags(response);
            if !clean.is_empty() {
                events.push(StreamEvent::content(clean));
            }
        }
        if parsed.done == Some(true) {
            events.push(StreamEvent::done());
        }
        events
    }
}
