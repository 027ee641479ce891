use std::future::Future;
use std::io;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use wreq::{Client, Method};

use genrelay_provider::UpstreamRequest;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, io::Error>> + Send>>;

pub enum UpstreamBody {
    Bytes(Bytes),
    Stream(ByteStream),
}

pub struct UpstreamResponse {
    pub status: u16,
    pub body: UpstreamBody,
}

/// Network-level failure reaching the upstream; reported, never retried.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
}

/// Seam for the upstream HTTP call so the orchestrator can be exercised
/// without a live endpoint.
pub trait UpstreamClient: Send + Sync {
    fn post<'a>(
        &'a self,
        req: &'a UpstreamRequest,
        want_stream: bool,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamResponse, TransportFailure>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
pub struct UpstreamClientConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for UpstreamClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Clone)]
pub struct WreqUpstreamClient {
    client: Client,
}

impl WreqUpstreamClient {
    pub fn new(config: UpstreamClientConfig) -> Result<Self, wreq::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl UpstreamClient for WreqUpstreamClient {
    fn post<'a>(
        &'a self,
        req: &'a UpstreamRequest,
        want_stream: bool,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamResponse, TransportFailure>> + Send + 'a>>
    {
        Box::pin(async move {
            let mut builder = self.client.request(Method::POST, &req.url);
            for (name, value) in &req.headers {
                builder = builder.header(name, value);
            }
            builder = builder.body(req.body.clone());

            let resp = builder.send().await.map_err(map_wreq_error)?;
            let status = resp.status().as_u16();

            // Error bodies are small; read them eagerly so the caller can
            // surface them. Only successful streaming responses stay open.
            let is_success = (200..300).contains(&status);
            if !is_success || !want_stream {
                let body = resp.bytes().await.map_err(map_wreq_error)?;
                return Ok(UpstreamResponse {
                    status,
                    body: UpstreamBody::Bytes(body),
                });
            }

            let stream = resp.bytes_stream().map(|item| item.map_err(io::Error::other));
            Ok(UpstreamResponse {
                status,
                body: UpstreamBody::Stream(Box::pin(stream)),
            })
        })
    }
}

fn map_wreq_error(err: wreq::Error) -> TransportFailure {
    TransportFailure {
        message: err.to_string(),
    }
}
