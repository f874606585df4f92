use axum::Json;
use tracing::info;

use crate::clients::exec_client;
use crate::models::{ExecuteRequest, ExecuteResponse};

/// Run the submitted buffer against the execution service.
///
/// Always answers 200 with output lines; an execution failure is one
/// descriptive line in the output, never an API error.
pub async fn execute_code(Json(request): Json<ExecuteRequest>) -> Json<ExecuteResponse> {
    info!("Execute requested for language {}", request.language);

    let output = match exec_client::get_exec_client() {
        Some(client) => {
            client
                .execute(
                    request.language,
                    request.version.as_deref(),
                    request.filename.as_deref(),
                    &request.content,
                )
                .await
        }
        None => vec!["Execution service not configured".to_string()],
    };

    Json(ExecuteResponse { output })
}
