//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::dispatch::{DispatchError, ProviderStatus};
use crate::domain::DispatchOutcome;
use crate::tools::{ToolDefinition, ToolError};

use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(invoke_tool))
        .route("/providers", get(list_providers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct ToolsResponse {
    tools: Vec<ToolDefinition>,
}

/// Tools answerable by at least one enabled provider.
async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: state.tools.list(),
    })
}

#[derive(Debug, Serialize)]
struct ProvidersResponse {
    providers: Vec<ProviderStatus>,
}

/// Every provider with its enabled flag.
async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state.tools.dispatcher().registry().statuses(),
    })
}

/// Invoke a tool. An absent or empty body means no arguments.
async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: axum::body::Bytes,
) -> Result<Json<DispatchOutcome>, AppError> {
    let arguments = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest {
            message: format!("request body is not JSON: {e}"),
        })?
    };

    let outcome = state.tools.invoke(&name, arguments).await?;
    Ok(Json(outcome))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<ToolError> for AppError {
    fn from(e: ToolError) -> Self {
        let message = e.to_string();
        match e {
            ToolError::InvalidArguments(_) | ToolError::Dispatch(DispatchError::InvalidParams(_)) => {
                AppError::BadRequest { message }
            }
            ToolError::UnknownTool(_)
            | ToolError::Dispatch(DispatchError::UnsupportedCapability(_)) => {
                AppError::NotFound { message }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request rejected");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
