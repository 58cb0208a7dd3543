//! HTTP Handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use agent_core::{AgentError, ToolCall, ToolResult, ToolSchema};

use crate::state::AppState;

pub const INVALID_REQUEST_MESSAGE: &str = "Formato de requisição inválido";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub catalog: String,
    pub catalog_connected: bool,
    pub llm_enabled: bool,
    pub llm_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (status, Json(ErrorResponse { error: error.into(), code: code.into() }))
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm = async {
        match &state.provider {
            Some(provider) => provider.health_check().await.unwrap_or(false),
            None => false,
        }
    };
    let (catalog_connected, llm_connected) = tokio::join!(state.catalog.health_check(), llm);

    Json(HealthResponse {
        status: if catalog_connected { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        catalog: state.catalog.name().to_string(),
        catalog_connected,
        llm_enabled: state.provider.is_some(),
        llm_connected,
    })
}

/// Conversational endpoint
pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected chat body: {}", rejection);
        api_error(StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE, "INVALID_REQUEST")
    })?;

    let response = state.engine.answer_within(&request.message, state.request_timeout).await;

    Ok(Json(ChatResponse { response }))
}

/// Schemas of the registered catalog tools
pub async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolSchema>> {
    Json(state.tools.schemas())
}

/// Execute one catalog tool
pub async fn call_tool(
    State(state): State<AppState>,
    payload: Result<Json<ToolCall>, JsonRejection>,
) -> Result<Json<ToolResult>, ApiError> {
    let Json(call) = payload.map_err(|rejection| {
        tracing::debug!("Rejected tool call body: {}", rejection);
        api_error(StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE, "INVALID_REQUEST")
    })?;

    let Ok(result) = tokio::time::timeout(state.request_timeout, state.tools.execute(&call)).await else {
        tracing::warn!(tool = %call.name, "Tool call deadline elapsed");
        return Err(api_error(
            StatusCode::GATEWAY_TIMEOUT,
            vehicle_advisor::engine::TIMEOUT_MESSAGE,
            "TIMEOUT",
        ));
    };

    result.map(Json).map_err(|e| tool_error(&e))
}

fn tool_error(err: &AgentError) -> ApiError {
    let (status, code) = match err {
        AgentError::ToolNotFound(_) => (StatusCode::NOT_FOUND, "TOOL_NOT_FOUND"),
        AgentError::ToolValidation(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENTS"),
        _ => {
            tracing::error!("Tool error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "TOOL_ERROR")
        }
    };
    api_error(status, err.user_message(), code)
}
