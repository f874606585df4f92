use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::models::Language;

static EXEC_CLIENT: OnceCell<Arc<ExecClient>> = OnceCell::const_new();

/// Client for the stateless code-execution service.
///
/// The service is an external collaborator: one request with the buffer, one
/// response with the combined run output. Failures of any kind come back as a
/// single descriptive output line and are never retried.
#[derive(Debug)]
pub struct ExecClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ExecRequest {
    language: String,
    version: String,
    files: Vec<ExecFile>,
}

#[derive(Debug, Serialize)]
struct ExecFile {
    name: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ExecResponse {
    run: RunResult,
}

#[derive(Debug, Deserialize)]
struct RunResult {
    /// stdout and stderr combined, in emission order.
    output: String,
}

impl ExecClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// Run `content` and return the output split into display lines.
    pub async fn execute(
        &self,
        language: Language,
        version: Option<&str>,
        filename: Option<&str>,
        content: &str,
    ) -> Vec<String> {
        let request = ExecRequest {
            language: language.to_string(),
            version: version.unwrap_or("*").to_string(),
            files: vec![ExecFile {
                name: filename.unwrap_or(language.default_filename()).to_string(),
                content: content.to_string(),
            }],
        };

        match self.try_execute(&request).await {
            Ok(lines) => lines,
            Err(e) => {
                error!("Code execution failed: {}", e);
                vec![format!("Execution failed: {e}")]
            }
        }
    }

    async fn try_execute(&self, request: &ExecRequest) -> Result<Vec<String>, reqwest::Error> {
        let url = format!("{}/execute", self.base_url);
        let response: ExecResponse = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(split_output_lines(&response.run.output))
    }
}

/// Split combined run output into display lines, dropping a single trailing
/// newline so an empty run yields an empty list.
fn split_output_lines(output: &str) -> Vec<String> {
    if output.is_empty() {
        return Vec::new();
    }
    output.lines().map(str::to_string).collect()
}

/// Initialize the global ExecClient
pub fn init_exec_client(base_url: String) {
    if EXEC_CLIENT.set(Arc::new(ExecClient::new(base_url))).is_ok() {
        info!("Execution client initialized");
    }
}

/// Get the global ExecClient instance
pub fn get_exec_client() -> Option<Arc<ExecClient>> {
    EXEC_CLIENT.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_splits_into_lines() {
        assert_eq!(split_output_lines("1\n2\n"), vec!["1", "2"]);
        assert_eq!(split_output_lines("no newline"), vec!["no newline"]);
        assert!(split_output_lines("").is_empty());
    }

    #[test]
    fn blank_interior_lines_survive() {
        assert_eq!(split_output_lines("a\n\nb\n"), vec!["a", "", "b"]);
    }
}
