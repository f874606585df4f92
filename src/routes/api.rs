use crate::handlers::{diagnostics, execute_code, health_check, ready_check};
use crate::models::ErrorResponse;
use crate::AppState;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .route("/v1/execute", post(execute_code))
        .fallback(api_not_found)
        .with_state(app_state)
}

async fn api_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            code: StatusCode::NOT_FOUND.as_u16(),
            status: "error".to_string(),
            error: "Unknown API route".to_string(),
        }),
    )
}
