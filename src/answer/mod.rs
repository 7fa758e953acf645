//! Answer orchestration: tool-use decision, tool execution and generation
//! merged into one ordered event stream.

mod config;
mod events;
mod orchestrator;

pub use config::{AnswerConfig, ForceUseTool};
pub use events::{AnswerEvent, FinishReason, ToolOutcome};
pub use orchestrator::{Answer, Phase};
