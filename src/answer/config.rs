//! Per-question answer configuration.

use crate::tools::ToolArgs;
use serde::{Deserialize, Serialize};

/// Switches that decide which producers run for a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Skip model-driven tool selection.
    pub skip_explicit_tool_calling: bool,
    /// Never call the model; only tool events are produced.
    pub skip_gen_ai_answer_generation: bool,
    /// Attach retrieved contexts to tool result events.
    pub return_contexts: bool,
}

/// Directive to run a specific tool before generating.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForceUseTool {
    pub tool_name: String,
    pub args: ToolArgs,
    pub force: bool,
}

impl ForceUseTool {
    /// Force `tool_name` to run with `args`.
    pub fn new(tool_name: impl Into<String>, args: ToolArgs) -> Self {
        Self {
            tool_name: tool_name.into(),
            args,
            force: true,
        }
    }

    /// No forced tool.
    pub fn none() -> Self {
        Self::default()
    }
}
