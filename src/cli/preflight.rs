//! Pre-flight checks before answering.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway through a stream.

use crate::answer::{AnswerConfig, ForceUseTool};
use crate::error::{AnswerError, Result};

/// Run pre-flight checks for an answer with the given configuration.
pub fn check(config: &AnswerConfig, force_use_tool: &ForceUseTool) -> Result<()> {
    if needs_model(config, force_use_tool) {
        check_api_key()?;
    }
    Ok(())
}

/// Whether answering will call the model at all.
pub fn needs_model(config: &AnswerConfig, force_use_tool: &ForceUseTool) -> bool {
    let selects_tool = !force_use_tool.force && !config.skip_explicit_tool_calling;
    !config.skip_gen_ai_answer_generation || selects_tool
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(AnswerError::Configuration(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(AnswerError::Configuration(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolArgs;

    #[test]
    fn test_tool_only_answers_need_no_model() {
        let config = AnswerConfig {
            skip_gen_ai_answer_generation: true,
            ..AnswerConfig::default()
        };
        let forced = ForceUseTool::new("search", ToolArgs::new());

        assert!(!needs_model(&config, &forced));
        assert!(check(&config, &forced).is_ok());
    }

    #[test]
    fn test_tool_selection_needs_model() {
        let config = AnswerConfig {
            skip_gen_ai_answer_generation: true,
            ..AnswerConfig::default()
        };
        assert!(needs_model(&config, &ForceUseTool::none()));

        let config = AnswerConfig {
            skip_explicit_tool_calling: true,
            skip_gen_ai_answer_generation: true,
            ..AnswerConfig::default()
        };
        assert!(!needs_model(&config, &ForceUseTool::none()));
    }

    #[test]
    fn test_generation_needs_model() {
        let forced = ForceUseTool::new("search", ToolArgs::new());
        assert!(needs_model(&AnswerConfig::default(), &forced));
    }
}
