//! In-process tool backed by an async closure.

use super::{Tool, ToolArgs, ToolError, ToolOutput};
use async_trait::async_trait;
use std::future::Future;

/// Tool that runs an async closure.
pub struct FnTool<F> {
    name: String,
    description: String,
    parameters: serde_json::Value,
    func: F,
}

impl<F, Fut> FnTool<F>
where
    F: Fn(ToolArgs) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send,
{
    /// Create a new closure-backed tool.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            parameters: serde_json::json!({ "type": "object", "properties": {} }),
            func,
        }
    }

    /// Set the description shown to the model.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the JSON schema of the arguments.
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }
}

#[async_trait]
impl<F, Fut> Tool for FnTool<F>
where
    F: Fn(ToolArgs) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> serde_json::Value {
        self.parameters.clone()
    }

    async fn run(&self, args: &ToolArgs) -> Result<ToolOutput, ToolError> {
        (self.func)(args.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_tool_passes_arguments() {
        let tool = FnTool::new("echo", |args: ToolArgs| async move {
            match args.get("query").and_then(|v| v.as_str()) {
                Some(query) => Ok(ToolOutput::new(query)),
                None => Err(ToolError::InvalidArguments("missing 'query'".to_string())),
            }
        })
        .with_description("Echo the query back");

        let mut args = ToolArgs::new();
        args.insert("query".to_string(), serde_json::json!("hello"));

        let output = tool.run(&args).await.unwrap();
        assert_eq!(output.summary, "hello");
        assert_eq!(tool.description(), "Echo the query back");

        let err = tool.run(&ToolArgs::new()).await.unwrap_err();
        assert_eq!(err, ToolError::InvalidArguments("missing 'query'".to_string()));
    }
}
