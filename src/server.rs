use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;

use crate::config::AssistantSettings;
use crate::handlers;
use crate::llm::ProviderRegistry;
use crate::session::SessionStore;
use crate::web;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub providers: ProviderRegistry,
    pub settings: Arc<AssistantSettings>,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let api_v1 = Router::new()
        .route("/sessions", post(handlers::v1::create_session))
        .route("/sessions/{session_id}", get(handlers::v1::get_session))
        .route(
            "/sessions/{session_id}/messages",
            get(handlers::v1::list_messages).post(handlers::v1::send_message),
        )
        .route(
            "/sessions/{session_id}/reset",
            post(handlers::v1::reset_session),
        )
        .route(
            "/sessions/{session_id}/budget",
            post(handlers::v1::manual_budget),
        )
        .with_state(state);

    Router::new()
        .route("/", get(web::index))
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        .nest("/api/v1", api_v1)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}
