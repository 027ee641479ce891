//! Shared plumbing for every adapter that speaks OpenAI-style chat
//! completions on the wire: the OpenAI-compatible kind itself, Anthropic,
//! Gemini bodies, and Ollama in `/v1` mode.

use bytes::Bytes;
use tracing::debug;

use genrelay_protocol::openai::{ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use genrelay_protocol::{GenerationResult, StreamEvent, Usage, strip_html_tags};

use crate::adapter::GenerationParams;
use crate::errors::ParseError;

pub(crate) fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

pub(crate) fn chat_body(params: &GenerationParams) -> Result<Bytes, serde_json::Error> {
    let request = ChatCompletionRequest {
        model: params.model.clone(),
        messages: vec![ChatMessage::user(params.prompt.clone())],
        temperature: params.temperature,
        max_tokens: params.max_tokens,
        stream: params.stream,
    };
    serde_json::to_vec(&request).map(Bytes::from)
}

pub(crate) fn bearer_header(credential: &str) -> (String, String) {
    ("Authorization".to_string(), format!("Bearer {credential}"))
}

pub(crate) fn json_header() -> (String, String) {
    ("Content-Type".to_string(), "application/json".to_string())
}

pub(crate) fn parse_chat_response(body: &[u8]) -> Result<GenerationResult, ParseError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_slice(body).map_err(|err| ParseError::Malformed(err.to_string()))?;
    let choice = parsed.choices.first().ok_or(ParseError::NoContent)?;
    let content = strip_html_tags(&choice.message.content);
    let usage = parsed
        .usage
        .map(|usage| Usage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
            total_tokens: usage.total_tokens,
        })
        .unwrap_or_default();
    Ok(GenerationResult { content, usage })
}

/// One SSE line of an OpenAI-compatible stream. Only `data: ` lines carry a
/// payload; `[DONE]` is the end-of-stream sentinel; a non-empty
/// `finish_reason` also terminates.
pub(crate) fn decode_chat_line(line: &str) -> Vec<StreamEvent> {
    let Some(payload) = line.strip_prefix("data: ") else {
        return Vec::new();
    };
    if payload == "[DONE]" {
        return vec![StreamEvent::done()];
    }

    let chunk: ChatCompletionChunk = match serde_json::from_str(payload) {
        Ok(chunk) => chunk,
        Err(err) => {
            debug!(event = "stream_payload_skipped", error = %err);
            return Vec::new();
        }
    };

    let mut events = Vec::new();
    if let Some(choice) = chunk.choices.first() {
        if let Some(content) = choice.delta.content.as_deref() {
            let clean = strip_html_tags(content);
            if !clean.is_empty() {
                events.push(StreamEvent::content(clean));
            }
        }
        if choice
            .finish_reason
            .as_deref()
            .is_some_and(|reason| !reason.is_empty())
        {
            events.push(StreamEvent::done());
        }
    }
    events
}
