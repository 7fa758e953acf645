//! HTTP-backed tool.
//!
//! Posts the arguments as JSON to a configured endpoint and expects a
//! [`ToolOutput`] back.

use super::{Tool, ToolArgs, ToolError, ToolOutput};
use crate::error::{AnswerError, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Default timeout for tool endpoints.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Tool that delegates to an HTTP endpoint.
pub struct HttpTool {
    name: String,
    description: String,
    url: Url,
    client: reqwest::Client,
}

impl HttpTool {
    /// Create a new HTTP tool.
    pub fn new(name: &str, description: &str, url: &str) -> Result<Self> {
        Self::with_timeout(name, description, url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new HTTP tool with a custom request timeout.
    pub fn with_timeout(name: &str, description: &str, url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| AnswerError::Configuration(format!("Invalid URL for tool '{}': {}", name, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AnswerError::Configuration(format!(
                "Tool '{}' must use http or https, got '{}'",
                name,
                url.scheme()
            )));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            url,
            client,
        })
    }

    /// The endpoint this tool posts to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Tool for HttpTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    #[instrument(skip(self, args), fields(tool = %self.name))]
    async fn run(&self, args: &ToolArgs) -> std::result::Result<ToolOutput, ToolError> {
        debug!("Posting tool call to {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&serde_json::json!({ "args": args }))
            .send()
            .await
            .map_err(|e| ToolError::Failed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Failed(format!("endpoint returned {}: {}", status, body)));
        }

        response
            .json::<ToolOutput>()
            .await
            .map_err(|e| ToolError::Failed(format!("invalid response body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(
            HttpTool::new("search", "", "not a url"),
            Err(AnswerError::Configuration(_))
        ));
        assert!(matches!(
            HttpTool::new("search", "", "ftp://example.com/search"),
            Err(AnswerError::Configuration(_))
        ));
    }

    #[test]
    fn test_accepts_http_url() {
        let tool = HttpTool::new("search", "Search documents", "http://localhost:8080/search").unwrap();
        assert_eq!(tool.name(), "search");
        assert_eq!(tool.url().path(), "/search");
    }
}
