//! Session and chat-turn HTTP handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use ulid::Ulid;

use crate::budget::{self, BudgetBreakdown, Category, Currency};
use crate::llm::{ChatRequest, Message, Role};
use crate::response;
use crate::server::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct CreateSessionResponse {
    session_id: String,
    model: String,
    created_at: String,
}

#[derive(Serialize)]
pub struct GetSessionResponse {
    session_id: String,
    model: String,
    turns: usize,
    created_at: String,
    updated_at: String,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    session_id: String,
    messages: Vec<TranscriptMessage>,
}

#[derive(Serialize)]
pub struct TranscriptMessage {
    role: Role,
    content: String,
}

#[derive(Deserialize)]
pub struct SendMessageRequest {
    content: String,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    message_id: String,
    role: String,
    content: String,
    budget: Option<BudgetBreakdown>,
}

#[derive(Serialize)]
pub struct ResetSessionResponse {
    session_id: String,
    status: String,
}

#[derive(Deserialize)]
pub struct ManualBudgetRequest {
    #[serde(default = "default_currency")]
    currency: Currency,
    #[serde(default)]
    accommodation: u64,
    #[serde(default)]
    transport: u64,
    #[serde(default)]
    food: u64,
    #[serde(default)]
    activities: u64,
    #[serde(default)]
    miscellaneous: u64,
}

fn default_currency() -> Currency {
    Currency::Inr
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/sessions
pub async fn create_session(State(state): State<AppState>) -> Response {
    let session = state.sessions.create(&state.settings.system_prompt);
    info!(session_id = %session.id, "created session");

    let response = CreateSessionResponse {
        session_id: session.id,
        model: state.settings.model.clone(),
        created_at: session.created_at.to_rfc3339(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/v1/sessions/{session_id}
pub async fn get_session(State(state): State<AppState>, Path(session_id): Path<String>) -> Response {
    let Some(session) = state.sessions.get(&session_id) else {
        return response::not_found("Session not found");
    };

    let response = GetSessionResponse {
        session_id: session.id.clone(),
        model: state.settings.model.clone(),
        turns: session.turns(),
        created_at: session.created_at.to_rfc3339(),
        updated_at: session.updated_at.to_rfc3339(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// GET /api/v1/sessions/{session_id}/messages
///
/// The visible transcript: user and assistant turns, system message elided.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    let Some(session) = state.sessions.get(&session_id) else {
        return response::not_found("Session not found");
    };

    let messages = session
        .visible_messages()
        .iter()
        .map(|m| TranscriptMessage {
            role: m.role,
            content: m.content.clone(),
        })
        .collect();

    let response = TranscriptResponse {
        session_id: session.id,
        messages,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/v1/sessions/{session_id}/messages
///
/// One chat turn: send the accumulated history plus the new user message
/// upstream, commit the exchange, and return the reply with any budget
/// figures found in it. On upstream failure the session is left untouched
/// and the error surfaces to the client.
pub async fn send_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Response {
    let user_content = req.content.trim().to_string();
    if user_content.is_empty() {
        return response::bad_request("Message content is empty");
    }

    let Some(history) = state.sessions.history_with(&session_id, &user_content) else {
        return response::not_found("Session not found");
    };

    let Some(provider) = state.providers.get(&state.settings.provider) else {
        return response::internal_error(format!(
            "Provider '{}' not configured. Check API key environment variable.",
            state.settings.provider
        ));
    };

    let chat_request = ChatRequest {
        model: state.settings.model.clone(),
        messages: history,
        temperature: Some(state.settings.temperature),
        max_tokens: state.settings.max_output_tokens,
    };

    let chat_response = match provider.chat(chat_request).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "chat turn failed");
            return response::bad_gateway(format!("LLM request failed: {}", e));
        }
    };

    let reply = chat_response.reply().unwrap_or_default().to_string();

    if state
        .sessions
        .commit_turn(
            &session_id,
            Message::user(user_content.clone()),
            Message::assistant(reply.clone()),
        )
        .is_none()
    {
        return response::not_found("Session not found");
    }

    let breakdown = budget::extract(&reply, &user_content);
    info!(
        session_id = %session_id,
        reply_chars = reply.len(),
        budget = breakdown.is_some(),
        "chat turn completed"
    );

    let response = SendMessageResponse {
        message_id: format!("msg_{}", Ulid::new().to_string().to_lowercase()),
        role: "assistant".to_string(),
        content: reply,
        budget: breakdown,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/v1/sessions/{session_id}/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    if state.sessions.reset(&session_id).is_none() {
        return response::not_found("Session not found");
    }
    info!(session_id = %session_id, "session reset");

    let response = ResetSessionResponse {
        session_id,
        status: "cleared".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/v1/sessions/{session_id}/budget
///
/// Manually entered budget amounts, for when no figures could be extracted
/// from the conversation.
pub async fn manual_budget(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(req): Json<ManualBudgetRequest>,
) -> Response {
    if state.sessions.get(&session_id).is_none() {
        return response::not_found("Session not found");
    }

    let amounts = [
        (Category::Accommodation, req.accommodation),
        (Category::Transport, req.transport),
        (Category::Food, req.food),
        (Category::Activities, req.activities),
        (Category::Miscellaneous, req.miscellaneous),
    ];

    match budget::manual(req.currency, &amounts) {
        Some(breakdown) => (StatusCode::OK, Json(breakdown)).into_response(),
        None => response::bad_request("All amounts are zero"),
    }
}
