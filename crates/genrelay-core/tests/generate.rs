use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use genrelay_core::{
    CallerIdentity, GenerateError, GenerateOutcome, GenerateRequest, MemoryDirectory,
    Orchestrator, TransportFailure, UpstreamBody, UpstreamClient, UpstreamResponse,
};
use genrelay_protocol::StreamEvent;
use genrelay_protocol::openai::ChatCompletionRequest;
use genrelay_provider::{ProviderKind, ProviderProfile, UpstreamRequest, default_adapters};

struct MockUpstream {
    status: u16,
    body: &'static str,
    fail: Option<&'static str>,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl MockUpstream {
    fn ok(status: u16, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            fail: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status: 0,
            body: "",
            fail: Some(message),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn recorded(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl UpstreamClient for MockUpstream {
    fn post<'a>(
        &'a self,
        req: &'a UpstreamRequest,
        _want_stream: bool,
    ) -> Pin<Box<dyn Future<Output = Result<UpstreamResponse, TransportFailure>> + Send + 'a>>
    {
        Box::pin(async move {
            self.calls.lock().unwrap().push(req.clone());
            if let Some(message) = self.fail {
                return Err(TransportFailure {
                    message: message.to_string(),
                });
            }
            Ok(UpstreamResponse {
                status: self.status,
                body: UpstreamBody::Bytes(Bytes::from_static(self.body.as_bytes())),
            })
        })
    }
}

fn profile(enabled: bool) -> ProviderProfile {
    ProviderProfile {
        id: 1,
        owner: "alice".to_string(),
        name: "primary".to_string(),
        kind: ProviderKind::OpenAiCompatible,
        base_url: "https://api.example.com/v1".to_string(),
        model: "gpt-4o-mini".to_string(),
        credential: "sk-test".to_string(),
        enabled,
        open: false,
    }
}

fn orchestrator(profiles: Vec<ProviderProfile>, client: Arc<MockUpstream>) -> Orchestrator {
    Orchestrator::new(
        default_adapters(),
        Arc::new(MemoryDirectory::new(profiles)),
        client,
    )
}

fn request(provider_id: u64) -> GenerateRequest {
    GenerateRequest {
        provider_id,
        prompt: "write a haiku".to_string(),
        temperature: 0.0,
        max_tokens: 0,
        stream: None,
        model: None,
    }
}

fn alice() -> CallerIdentity {
    CallerIdentity::new("alice")
}

#[tokio::test]
async fn defaults_are_applied_before_the_upstream_call() {
    let client = MockUpstream::ok(200, "data: [DONE]\n\n");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let outcome = orchestrator.generate(&alice(), request(1)).await.unwrap();
    assert!(matches!(outcome, GenerateOutcome::Streaming(_)));

    let recorded = client.recorded();
    assert_eq!(recorded.len(), 1);
    let body: ChatCompletionRequest = serde_json::from_slice(&recorded[0].body).unwrap();
    assert_eq!(body.temperature, 0.7);
    assert_eq!(body.max_tokens, 2000);
    assert!(body.stream);
    assert_eq!(body.model, "gpt-4o-mini");
}

#[tokio::test]
async fn model_override_takes_precedence() {
    let client = MockUpstream::ok(200, r#"{"choices":[{"message":{"content":"ok"}}]}"#);
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    req.model = Some("custom-model".to_string());
    orchestrator.generate(&alice(), req).await.unwrap();

    let body: ChatCompletionRequest = serde_json::from_slice(&client.recorded()[0].body).unwrap();
    assert_eq!(body.model, "custom-model");
}

#[tokio::test]
async fn empty_model_override_falls_back_to_profile() {
    let client = MockUpstream::ok(200, r#"{"choices":[{"message":{"content":"ok"}}]}"#);
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    req.model = Some(String::new());
    orchestrator.generate(&alice(), req).await.unwrap();

    let body: ChatCompletionRequest = serde_json::from_slice(&client.recorded()[0].body).unwrap();
    assert_eq!(body.model, "gpt-4o-mini");
}

#[tokio::test]
async fn disabled_provider_is_rejected_without_upstream_call() {
    let client = MockUpstream::ok(200, "");
    let orchestrator = orchestrator(vec![profile(false)], client.clone());

    let err = orchestrator
        .generate(&alice(), request(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParams(_)));
    assert!(err.to_string().contains("not enabled"));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn empty_prompt_is_rejected() {
    let client = MockUpstream::ok(200, "");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.prompt = "   ".to_string();
    let err = orchestrator.generate(&alice(), req).await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParams(_)));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn out_of_range_temperature_is_rejected() {
    let client = MockUpstream::ok(200, "");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.temperature = 3.5;
    let err = orchestrator.generate(&alice(), req).await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidParams(_)));
}

#[tokio::test]
async fn unknown_provider_is_not_found() {
    let client = MockUpstream::ok(200, "");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let err = orchestrator
        .generate(&alice(), request(42))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::NotFound(_)));
}

#[tokio::test]
async fn foreign_provider_is_forbidden() {
    let client = MockUpstream::ok(200, "");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let err = orchestrator
        .generate(&CallerIdentity::new("mallory"), request(1))
        .await
        .unwrap_err();
    assert!(matches!(err, GenerateError::Forbidden));
    assert!(client.recorded().is_empty());
}

#[tokio::test]
async fn upstream_404_names_the_attempted_url() {
    let client = MockUpstream::ok(404, "model not found");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    let err = orchestrator.generate(&alice(), req).await.unwrap_err();
    match err {
        GenerateError::Upstream { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("https://api.example.com/v1/chat/completions"));
            assert!(message.contains("OpenAI-compatible"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn upstream_500_reports_the_status() {
    let client = MockUpstream::ok(500, "boom");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    let err = orchestrator.generate(&alice(), req).await.unwrap_err();
    match err {
        GenerateError::Upstream { status, message } => {
            assert_eq!(status, 500);
            assert!(message.contains("500"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_is_reported_not_retried() {
    let client = MockUpstream::failing("connection refused");
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    let err = orchestrator.generate(&alice(), req).await.unwrap_err();
    assert!(matches!(err, GenerateError::Transport(_)));
    assert_eq!(client.recorded().len(), 1);
}

#[tokio::test]
async fn non_stream_response_is_parsed_and_sanitized() {
    let client = MockUpstream::ok(
        200,
        r#"{"choices":[{"message":{"content":"<b>hi</b>"}}],"usage":{"prompt_tokens":2,"completion_tokens":3,"total_tokens":5}}"#,
    );
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    let outcome = orchestrator.generate(&alice(), req).await.unwrap();
    let GenerateOutcome::Completed(result) = outcome else {
        panic!("expected a completed result");
    };
    assert_eq!(result.content, "hi");
    assert_eq!(result.usage.total_tokens, Some(5));
}

#[tokio::test]
async fn contentless_upstream_response_is_a_parse_error() {
    let client = MockUpstream::ok(200, r#"{"choices":[]}"#);
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let mut req = request(1);
    req.stream = Some(false);
    let err = orchestrator.generate(&alice(), req).await.unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)));
}

#[tokio::test]
async fn streaming_outcome_relays_events() {
    let client = MockUpstream::ok(
        200,
        "data: {\"choices\":[{\"delta\":{\"content\":\"He\"}}]}\n\n\
         data: {\"choices\":[{\"delta\":{\"content\":\"llo\"}}]}\n\n\
         data: [DONE]\n\n",
    );
    let orchestrator = orchestrator(vec![profile(true)], client.clone());

    let outcome = orchestrator.generate(&alice(), request(1)).await.unwrap();
    let GenerateOutcome::Streaming(mut rx) = outcome else {
        panic!("expected a streaming outcome");
    };

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            StreamEvent::content("He"),
            StreamEvent::content("llo"),
            StreamEvent::done(),
        ]
    );
}
