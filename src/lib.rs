//! Sift - tool-augmented answer streaming
//!
//! Answers a question by optionally running a tool first and then streaming
//! the model's answer, exposing every step as one ordered event stream.
//!
//! # Architecture
//!
//! - `answer` - The orchestrator and its event types
//! - `tools` - Tool capability plus in-process and HTTP implementations
//! - `llm` - Model streaming capability plus the OpenAI implementation
//! - `config` - Configuration management and prompt templates
//! - `schedule` - Periodic task schedule for the external task runner
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use sift::answer::{Answer, AnswerConfig, ForceUseTool};
//! use sift::llm::OpenAIStreamer;
//! use sift::tools::{FnTool, Tool, ToolArgs, ToolOutput};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let search: Arc<dyn Tool> = Arc::new(FnTool::new("search", |_args: ToolArgs| async {
//!         Ok(ToolOutput::new("No documents mention a lunar capital."))
//!     }));
//!
//!     let mut args = ToolArgs::new();
//!     args.insert("query".into(), "capital of the moon".into());
//!
//!     let mut answer = Answer::new(
//!         "What is the capital of the moon?",
//!         vec![search],
//!         ForceUseTool::new("search", args),
//!         AnswerConfig::default(),
//!         Arc::new(OpenAIStreamer::new("gpt-4o-mini")?),
//!     );
//!
//!     let mut events = Box::pin(answer.processed_streamed_output()?);
//!     while let Some(event) = events.next().await {
//!         println!("{:?}", event?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod answer;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod openai;
pub mod schedule;
pub mod tools;

pub use error::{AnswerError, Result};
