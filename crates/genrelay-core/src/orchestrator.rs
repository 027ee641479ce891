use std::sync::Arc;

use futures_util::stream;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use genrelay_protocol::{GenerationResult, StreamEvent};
use genrelay_provider::{AdapterRegistry, GenerationParams, ProviderProfile};

use crate::directory::{CallerIdentity, DirectoryError, ProviderDirectory};
use crate::error::GenerateError;
use crate::relay::relay_stream;
use crate::upstream::{UpstreamBody, UpstreamClient};

const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_MAX_TOKENS: u32 = 2000;
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// One inbound generation request, as received on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub provider_id: u64,
    pub prompt: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: u32,
    #[serde(default)]
    pub stream: Option<bool>,
    #[serde(default)]
    pub model: Option<String>,
}

impl GenerateRequest {
    pub fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(true)
    }
}

#[derive(Debug)]
pub enum GenerateOutcome {
    Completed(GenerationResult),
    /// Events arrive as the upstream produces them; the receiver sees zero
    /// or more content events and exactly one terminal event.
    Streaming(mpsc::Receiver<StreamEvent>),
}

/// Entry point of the relay core. Validates the request, resolves the
/// provider profile, applies defaults, and drives the upstream call through
/// the per-kind adapter table. One attempt per call; no retries.
pub struct Orchestrator {
    adapters: AdapterRegistry,
    directory: Arc<dyn ProviderDirectory>,
    client: Arc<dyn UpstreamClient>,
}

impl Orchestrator {
    pub fn new(
        adapters: AdapterRegistry,
        directory: Arc<dyn ProviderDirectory>,
        client: Arc<dyn UpstreamClient>,
    ) -> Self {
        Self {
            adapters,
            directory,
            client,
        }
    }

    pub async fn generate(
        &self,
        identity: &CallerIdentity,
        request: GenerateRequest,
    ) -> Result<GenerateOutcome, GenerateError> {
        let trace_id = Uuid::new_v4();

        if request.prompt.trim().is_empty() {
            return Err(GenerateError::InvalidParams("prompt is required".into()));
        }
        if request.provider_id == 0 {
            return Err(GenerateError::InvalidParams(
                "provider_id is required".into(),
            ));
        }

        let profile = self
            .directory
            .lookup(identity, request.provider_id)
            .await
            .map_err(|err| match err {
                DirectoryError::NotFound => GenerateError::NotFound("provider not found".into()),
                DirectoryError::Forbidden => GenerateError::Forbidden,
            })?;
        info!(
            event = "provider_resolved",
            trace_id = %trace_id,
            provider_id = profile.id,
            kind = %profile.kind,
            model = %profile.model,
            enabled = profile.enabled
        );

        if !profile.enabled {
            return Err(GenerateError::InvalidParams(
                "provider is not enabled".into(),
            ));
        }

        let params = effective_params(&request, &profile)?;

        let adapter = self.adapters.get(profile.kind).ok_or_else(|| {
            GenerateError::Internal(format!("no adapter registered for kind {}", profile.kind))
        })?;
        let upstream_request = adapter.build_request(&profile, &params)?;
        info!(
            event = "upstream_request",
            trace_id = %trace_id,
            url = %upstream_request.url,
            model = %params.model,
            stream = params.stream
        );

        let response = self
            .client
            .post(&upstream_request, params.stream)
            .await
            .map_err(|failure| GenerateError::Transport(failure.message))?;
        info!(
            event = "upstream_response",
            trace_id = %trace_id,
            status = response.status
        );

        if !(200..300).contains(&response.status) {
            let body = match &response.body {
                UpstreamBody::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                UpstreamBody::Stream(_) => String::new(),
            };
            warn!(
                event = "upstream_error",
                trace_id = %trace_id,
                status = response.status,
                url = %upstream_request.url,
                body = %body
            );
            return Err(upstream_error(response.status, &upstream_request.url));
        }

        if !params.stream {
            let UpstreamBody::Bytes(bytes) = response.body else {
                return Err(GenerateError::Internal(
                    "unexpected streaming body for non-stream request".into(),
                ));
            };
            let result = adapter.parse_response(&profile, &bytes)?;
            return Ok(GenerateOutcome::Completed(result));
        }

        let upstream = match response.body {
            UpstreamBody::Stream(stream) => stream,
            // A buffered body still relays correctly as a one-chunk stream.
            UpstreamBody::Bytes(bytes) => Box::pin(stream::once(async move { Ok(bytes) })),
        };

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::spawn(relay_stream(upstream, adapter, profile, tx));
        Ok(GenerateOutcome::Streaming(rx))
    }
}

fn effective_params(
    request: &GenerateRequest,
    profile: &ProviderProfile,
) -> Result<GenerationParams, GenerateError> {
    let temperature = if request.temperature == 0.0 {
        DEFAULT_TEMPERATURE
    } else {
        request.temperature
    };
    if !(0.0..=2.0).contains(&temperature) {
        return Err(GenerateError::InvalidParams(
            "temperature must be within [0, 2]".into(),
        ));
    }

    let max_tokens = if request.max_tokens == 0 {
        DEFAULT_MAX_TOKENS
    } else {
        request.max_tokens
    };

    // A non-empty override always wins over the profile's configured model.
    let model = request
        .model
        .as_deref()
        .filter(|model| !model.is_empty())
        .unwrap_or(&profile.model)
        .to_string();

    Ok(GenerationParams {
        model,
        prompt: request.prompt.clone(),
        temperature,
        max_tokens,
        stream: request.wants_stream(),
    })
}

fn upstream_error(status: u16, url: &str) -> GenerateError {
    // A 404 from a local endpoint almost always means the service is not in
    // OpenAI-compatible mode or the model name is wrong; say so.
    let message = if status == 404 {
        format!(
            "upstream returned 404; check that the service is running, supports \
             OpenAI-compatible mode, and that the model name is correct (url: {url})"
        )
    } else {
        format!("upstream returned error status {status}")
    };
    GenerateError::Upstream { status, message }
}
