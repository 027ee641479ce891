use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use genrelay_protocol::{LineDecoder, StreamEvent};
use genrelay_provider::{ProviderAdapter, ProviderProfile};

use crate::upstream::ByteStream;

/// Forwards a live upstream body to the client channel, one normalized
/// event per decoded frame. Guarantees exactly one terminal event: the
/// dialect's own end marker, an `error` on read failure, or an implicit
/// `done` when the upstream closes silently. Dropping the receiver (client
/// disconnect) stops the relay and releases the upstream body.
pub async fn relay_stream(
    mut upstream: ByteStream,
    adapter: Arc<dyn ProviderAdapter>,
    profile: ProviderProfile,
    tx: mpsc::Sender<StreamEvent>,
) {
    let mut decoder = LineDecoder::new();
    let mut content_events = 0usize;

    while let Some(item) = upstream.next().await {
        let chunk = match item {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!(event = "upstream_read_failed", provider_id = profile.id, error = %err);
                let _ = tx.send(StreamEvent::error(err.to_string())).await;
                return;
            }
        };

        for line in decoder.push(&chunk) {
            if forward_line(&adapter, &profile, &line, &tx, &mut content_events).await {
                return;
            }
        }
    }

    if let Some(line) = decoder.finish() {
        if forward_line(&adapter, &profile, &line, &tx, &mut content_events).await {
            return;
        }
    }

    // Upstream ended without a terminal marker; the client still gets one.
    debug!(
        event = "stream_ended_without_marker",
        provider_id = profile.id,
        content_events
    );
    let _ = tx.send(StreamEvent::done()).await;
}

/// Returns true once the relay is finished, either because a terminal event
/// went out or because the client went away.
async fn forward_line(
    adapter: &Arc<dyn ProviderAdapter>,
    profile: &ProviderProfile,
    line: &str,
    tx: &mpsc::Sender<StreamEvent>,
    content_events: &mut usize,
) -> bool {
    for event in adapter.decode_stream_line(profile, line) {
        let terminal = event.is_terminal();
        if !terminal {
            *content_events += 1;
        }
        if tx.send(event).await.is_err() {
            return true;
        }
        if terminal {
            debug!(
                event = "stream_complete",
                provider_id = profile.id,
                content_events = *content_events
            );
            return true;
        }
    }
    false
}
