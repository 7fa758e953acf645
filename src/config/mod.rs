//! Configuration module for Sift.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    GeneralSettings, HttpToolSettings, LlmSettings, PromptSettings, Settings, ToolSettings,
};
