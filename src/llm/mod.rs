//! Language model capability used for answer generation.
//!
//! The orchestrator only depends on [`ModelStreamer`]. [`OpenAIStreamer`]
//! is the production implementation.

mod openai;

pub use openai::OpenAIStreamer;

use crate::error::Result;
use crate::tools::{format_contexts_for_prompt, Tool, ToolChoice, ToolOutput};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// Lazy sequence of generated text fragments.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Capability that streams model output for a prompt.
#[async_trait]
pub trait ModelStreamer: Send + Sync {
    /// Start streaming an answer.
    async fn stream(&self, request: &GenerationRequest) -> Result<TokenStream>;

    /// Ask the model whether one of `tools` should be called first.
    ///
    /// Streamers that do not support tool calling select nothing.
    async fn select_tool(
        &self,
        _request: &GenerationRequest,
        _tools: &[Arc<dyn Tool>],
    ) -> Result<Option<ToolChoice>> {
        Ok(None)
    }
}

/// Everything the model needs to answer one question.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub question: String,
    /// Free-text history of earlier turns.
    pub history: Option<String>,
    /// Result of the tool run, if one ran.
    pub tool_context: Option<ToolContext>,
}

impl GenerationRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            history: None,
            tool_context: None,
        }
    }

    /// Render the tool context as prompt text.
    pub fn context_text(&self) -> Option<String> {
        self.tool_context.as_ref().map(ToolContext::render)
    }
}

/// Tool result forwarded to the model as additional context.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolContext {
    pub tool_name: String,
    pub outcome: std::result::Result<ToolOutput, String>,
}

impl ToolContext {
    fn render(&self) -> String {
        match &self.outcome {
            Ok(output) if output.contexts.is_empty() => {
                format!("Result of tool '{}': {}", self.tool_name, output.summary)
            }
            Ok(output) => format!(
                "Result of tool '{}': {}\n\n{}",
                self.tool_name,
                output.summary,
                format_contexts_for_prompt(&output.contexts)
            ),
            Err(message) => format!("Tool '{}' failed: {}", self.tool_name, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ContextDocument;

    #[test]
    fn test_context_text_without_tool() {
        assert!(GenerationRequest::new("Why?").context_text().is_none());
    }

    #[test]
    fn test_context_text_includes_documents() {
        let mut request = GenerationRequest::new("What is the capital of the moon?");
        request.tool_context = Some(ToolContext {
            tool_name: "search".to_string(),
            outcome: Ok(ToolOutput::new("1 document found")
                .with_contexts(vec![ContextDocument::new("doc-1", "The moon has no capital.")])),
        });

        let text = request.context_text().unwrap();
        assert!(text.starts_with("Result of tool 'search': 1 document found"));
        assert!(text.contains("The moon has no capital."));
    }

    #[test]
    fn test_context_text_for_failed_tool() {
        let mut request = GenerationRequest::new("q");
        request.tool_context = Some(ToolContext {
            tool_name: "search".to_string(),
            outcome: Err("index offline".to_string()),
        });
        assert_eq!(request.context_text().unwrap(), "Tool 'search' failed: index offline");
    }
}
