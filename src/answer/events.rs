//! Events produced while answering a question.

use crate::tools::{ContextDocument, ToolArgs};
use serde::{Deserialize, Serialize};

/// One step of an answer, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnswerEvent {
    /// A tool is about to run with these arguments.
    ToolCall {
        call_id: String,
        tool_name: String,
        args: ToolArgs,
    },

    /// A tool finished, successfully or not.
    ToolResult {
        call_id: String,
        tool_name: String,
        outcome: ToolOutcome,
        /// Retrieved context, present only when contexts were requested.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        contexts: Option<Vec<ContextDocument>>,
    },

    /// A fragment of generated answer text.
    AnswerToken { text: String },

    /// The answer is complete.
    AnswerFinished { finish_reason: FinishReason },
}

impl AnswerEvent {
    /// Whether this event belongs to the tool phase.
    pub fn is_tool_event(&self) -> bool {
        matches!(self, AnswerEvent::ToolCall { .. } | AnswerEvent::ToolResult { .. })
    }

    /// The text fragment, if this is a token event.
    pub fn token(&self) -> Option<&str> {
        match self {
            AnswerEvent::AnswerToken { text } => Some(text),
            _ => None,
        }
    }
}

/// Outcome of a tool run as recorded in the event stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success {
        summary: String,
        #[serde(default)]
        payload: serde_json::Value,
    },
    Error { message: String },
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Error { .. })
    }
}

/// Why the answer finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// The model finished generating.
    Stop,
    /// Generation was skipped by configuration.
    GenerationSkipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_shape() {
        let event = AnswerEvent::ToolResult {
            call_id: "call-1".to_string(),
            tool_name: "search".to_string(),
            outcome: ToolOutcome::Error {
                message: "index offline".to_string(),
            },
            contexts: None,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "tool_result");
        assert_eq!(json["outcome"]["status"], "error");
        assert!(json.get("contexts").is_none());

        let finished = serde_json::to_value(AnswerEvent::AnswerFinished {
            finish_reason: FinishReason::GenerationSkipped,
        })
        .unwrap();
        assert_eq!(finished["finish_reason"], "generation_skipped");
    }

    #[test]
    fn test_event_helpers() {
        let token = AnswerEvent::AnswerToken {
            text: "Hello".to_string(),
        };
        assert_eq!(token.token(), Some("Hello"));
        assert!(!token.is_tool_event());

        let call = AnswerEvent::ToolCall {
            call_id: "call-1".to_string(),
            tool_name: "search".to_string(),
            args: ToolArgs::new(),
        };
        assert!(call.is_tool_event());
        assert_eq!(call.token(), None);
    }
}
