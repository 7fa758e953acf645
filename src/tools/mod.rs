//! Tool capability used by the answer orchestrator.
//!
//! A tool is anything that can be run with JSON arguments and return a
//! result payload. The orchestrator only sees the [`Tool`] trait; concrete
//! implementations live in the submodules (in-process closures, HTTP
//! endpoints) and tests substitute their own fakes.

mod function;
mod http;

pub use function::FnTool;
pub use http::HttpTool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// JSON object of tool arguments.
pub type ToolArgs = serde_json::Map<String, serde_json::Value>;

/// A callable tool.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name used for lookup and forced-tool matching.
    fn name(&self) -> &str;

    /// Human-readable description, sent to the model during tool selection.
    fn description(&self) -> &str {
        ""
    }

    /// JSON schema of the accepted arguments.
    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    /// Run the tool with the given arguments.
    async fn run(&self, args: &ToolArgs) -> Result<ToolOutput, ToolError>;
}

/// Errors a tool may report.
///
/// Everything except [`ToolError::Fatal`] is recorded in the event stream and
/// generation still proceeds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("{0}")]
    Failed(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("fatal: {0}")]
    Fatal(String),
}

impl ToolError {
    /// Whether the answer must stop after this failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ToolError::Fatal(_))
    }
}

/// Result payload returned by a successful tool run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Short summary of what the tool produced.
    pub summary: String,
    /// Tool-specific result data.
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Retrieved context documents, if the tool retrieves any.
    #[serde(default)]
    pub contexts: Vec<ContextDocument>,
}

impl ToolOutput {
    /// Create an output with only a summary.
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            payload: serde_json::Value::Null,
            contexts: Vec::new(),
        }
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Attach retrieved context documents.
    pub fn with_contexts(mut self, contexts: Vec<ContextDocument>) -> Self {
        self.contexts = contexts;
        self
    }
}

/// A piece of retrieved context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextDocument {
    /// Where the content came from (URL, document id, ...).
    pub source: String,
    /// Optional title.
    #[serde(default)]
    pub title: Option<String>,
    /// Text content.
    pub content: String,
    /// Relevance score, if the tool ranks its results.
    #[serde(default)]
    pub score: Option<f32>,
}

impl ContextDocument {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: None,
            content: content.into(),
            score: None,
        }
    }
}

/// A tool chosen by the model during tool selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolChoice {
    pub tool_name: String,
    pub args: ToolArgs,
}

/// Find a tool by name.
pub fn find_tool<'a>(tools: &'a [Arc<dyn Tool>], name: &str) -> Option<&'a Arc<dyn Tool>> {
    tools.iter().find(|t| t.name() == name)
}

/// Format context documents for inclusion in a prompt.
pub fn format_contexts_for_prompt(contexts: &[ContextDocument]) -> String {
    contexts
        .iter()
        .enumerate()
        .map(|(i, doc)| {
            let title = doc.title.as_deref().unwrap_or(&doc.source);
            format!("---\n[{}] {}\n{}\n---", i + 1, title, doc.content)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tool() {
        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(FnTool::new("search", |_| async { Ok(ToolOutput::new("ok")) })),
            Arc::new(FnTool::new("calculator", |_| async { Ok(ToolOutput::new("ok")) })),
        ];
        assert_eq!(find_tool(&tools, "calculator").map(|t| t.name()), Some("calculator"));
        assert!(find_tool(&tools, "weather").is_none());
    }

    #[test]
    fn test_format_contexts_uses_title_or_source() {
        let mut titled = ContextDocument::new("doc-1", "Moons have no capitals.");
        titled.title = Some("Lunar Facts".to_string());
        let untitled = ContextDocument::new("https://example.com/moon", "Still none.");

        let formatted = format_contexts_for_prompt(&[titled, untitled]);
        assert!(formatted.contains("[1] Lunar Facts\nMoons have no capitals."));
        assert!(formatted.contains("[2] https://example.com/moon\nStill none."));
    }

    #[test]
    fn test_tool_output_deserializes_with_defaults() {
        let output: ToolOutput = serde_json::from_str(r#"{"summary": "done"}"#).unwrap();
        assert_eq!(output.summary, "done");
        assert!(output.payload.is_null());
        assert!(output.contexts.is_empty());
    }

    #[test]
    fn test_tool_error_fatality() {
        assert!(ToolError::Fatal("stop".into()).is_fatal());
        assert!(!ToolError::Failed("oops".into()).is_fatal());
        assert!(!ToolError::InvalidArguments("bad".into()).is_fatal());
    }
}
