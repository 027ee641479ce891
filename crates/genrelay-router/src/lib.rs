//! HTTP surface of the relay: authentication middleware plus the generate
//! and health routes. All replies, success or failure, leave with transport
//! status 200; the envelope `code` carries the outcome.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tracing::debug;

use genrelay_common::{CODE_UNAUTHORIZED, Envelope};
use genrelay_core::Orchestrator;

mod auth;
mod generate;

pub use auth::{Authenticator, TokenAuth, extract_bearer};

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub auth: Arc<dyn Authenticator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate::generate))
        .route("/api/health", get(generate::health))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}

async fn authenticate(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if req.uri().path() == "/api/health" {
        return next.run(req).await;
    }

    let Some(identity) = state.auth.authenticate(req.headers()) else {
        debug!(event = "auth_rejected", path = %req.uri().path());
        return axum::Json(Envelope::error(CODE_UNAUTHORIZED, "unauthorized")).into_response();
    };
    req.extensions_mut().insert(identity);
    next.run(req).await
}
