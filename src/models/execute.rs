use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Language;

/// Request to run the current buffer against the execution service.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub language: Language,
    /// Runtime version, resolved to "*" (latest) when omitted.
    pub version: Option<String>,
    /// File name, defaulted per language when omitted.
    pub filename: Option<String>,
    pub content: String,
}

/// Combined run output, split into lines for display.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    pub output: Vec<String>,
}
