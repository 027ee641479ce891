use std::convert::Infallible;

use axum::Json;
use axum::body::Body;
use axum::extract::{Extension, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use genrelay_common::{CODE_INVALID_PARAMS, Envelope};
use genrelay_core::{CallerIdentity, GenerateError, GenerateOutcome, GenerateRequest};
use genrelay_protocol::StreamEvent;

use crate::AppState;

/// POST /api/generate. Replies either with one envelope or with an SSE
/// stream of normalized events; the transport status is 200 either way and
/// clients branch on the envelope `code` or the event shape.
pub async fn generate(
    State(state): State<AppState>,
    Extension(identity): Extension<CallerIdentity>,
    body: Bytes,
) -> Response {
    let request: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            return envelope_response(Envelope::error(
                CODE_INVALID_PARAMS,
                format!("invalid request body: {err}"),
            ));
        }
    };

    // Decided before the call so failures reach the client on the channel
    // it is already reading.
    let wants_stream = request.wants_stream();
    info!(
        event = "generate_request",
        user = %identity.user,
        provider_id = request.provider_id,
        stream = wants_stream
    );

    match state.orchestrator.generate(&identity, request).await {
        Ok(GenerateOutcome::Completed(result)) => {
            let data = serde_json::to_value(&result).unwrap_or(serde_json::Value::Null);
            envelope_response(Envelope::success("generation complete", data))
        }
        Ok(GenerateOutcome::Streaming(rx)) => {
            let stream = ReceiverStream::new(rx)
                .filter_map(|event| async move { sse_frame(&event) })
                .map(Ok::<_, Infallible>);
            sse_response(Body::from_stream(stream))
        }
        Err(err) if wants_stream => {
            let frame = sse_frame(&StreamEvent::error(err.to_string()))
                .unwrap_or_else(|| Bytes::from_static(b"data: {\"done\":true}\n\n"));
            sse_response(Body::from(frame))
        }
        Err(err) => envelope_response(error_envelope(&err)),
    }
}

pub async fn health() -> Response {
    envelope_response(Envelope::success("ok", serde_json::json!({"status": "up"})))
}

fn error_envelope(err: &GenerateError) -> Envelope {
    Envelope::error(err.code(), err.to_string())
}

fn envelope_response(envelope: Envelope) -> Response {
    (StatusCode::OK, Json(envelope)).into_response()
}

/// One SSE frame per event: `data: <json>\n\n`. Serialization of these
/// shapes cannot fail in practice; a frame that does is dropped rather than
/// corrupting the stream.
fn sse_frame(event: &StreamEvent) -> Option<Bytes> {
    let json = serde_json::to_vec(event).ok()?;
    let mut frame = Vec::with_capacity(json.len() + 8);
    frame.extend_from_slice(b"data: ");
    frame.extend_from_slice(&json);
    frame.extend_from_slice(b"\n\n");
    Some(Bytes::from(frame))
}

fn sse_response(body: Body) -> Response {
    let mut response = Response::new(body);
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/event-stream"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    // Hint common reverse proxies to avoid buffering SSE responses.
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    response
}
