//! Ask command implementation.

use crate::answer::{Answer, AnswerConfig, AnswerEvent, ForceUseTool};
use crate::cli::preflight;
use crate::cli::{AskArgs, Output};
use crate::config::{HttpToolSettings, Prompts, Settings};
use crate::error::{AnswerError, Result as SiftResult};
use crate::llm::OpenAIStreamer;
use crate::openai::create_client_with_timeout;
use crate::tools::{HttpTool, Tool, ToolArgs};
use anyhow::Result;
use futures::StreamExt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Run the ask command.
pub async fn run_ask(args: &AskArgs, settings: Settings) -> Result<()> {
    let config = AnswerConfig {
        skip_explicit_tool_calling: args.skip_explicit_tool_calling
            || settings.answer.skip_explicit_tool_calling,
        skip_gen_ai_answer_generation: args.skip_gen_ai
            || settings.answer.skip_gen_ai_answer_generation,
        return_contexts: args.return_contexts || settings.answer.return_contexts,
    };

    let force_use_tool = match &args.force_tool {
        Some(name) => ForceUseTool::new(name, tool_args(args)?),
        None => ForceUseTool::none(),
    };

    // Pre-flight checks
    if let Err(e) = preflight::check(&config, &force_use_tool) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let tools = build_tools(&settings.tools.http)?;

    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let model = args.model.clone().unwrap_or_else(|| settings.llm.model.clone());
    let client = create_client_with_timeout(Duration::from_secs(settings.llm.timeout_secs))?;
    let streamer = OpenAIStreamer::with_client(client, &model)
        .with_temperature(settings.llm.temperature)
        .with_prompts(prompts);

    let mut answer = Answer::new(
        args.question.clone(),
        tools,
        force_use_tool,
        config,
        Arc::new(streamer),
    );
    if let Some(history) = &args.history {
        answer = answer.with_history(history.clone());
    }

    let mut events = match answer.processed_streamed_output() {
        Ok(events) => Box::pin(events),
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    let mut spinner = (!args.json).then(|| Output::spinner("Thinking..."));
    let mut streaming = false;

    while let Some(item) = events.next().await {
        if let Some(spinner) = spinner.take() {
            spinner.finish_and_clear();
        }

        let event = match item {
            Ok(event) => event,
            Err(e) => {
                if streaming {
                    println!();
                }
                Output::error(&format!("Failed to answer: {}", e));
                return Err(e.into());
            }
        };

        if args.json {
            println!("{}", serde_json::to_string(&event)?);
            continue;
        }

        let waiting = wait_message(&event, &config);

        match event {
            AnswerEvent::ToolCall {
                tool_name,
                args: call_args,
                ..
            } => Output::tool_call(&tool_name, &call_args),
            AnswerEvent::ToolResult {
                tool_name,
                outcome,
                contexts,
                ..
            } => Output::tool_result(&tool_name, &outcome, contexts.as_deref()),
            AnswerEvent::AnswerToken { text } => {
                if !streaming {
                    println!();
                    streaming = true;
                }
                print!("{}", text);
                std::io::stdout().flush()?;
            }
            AnswerEvent::AnswerFinished { .. } => {
                if streaming {
                    println!("\n");
                }
            }
        }

        spinner = waiting.map(|message| Output::spinner(&message));
    }

    Ok(())
}

/// Spinner message for the wait that follows `event`, if there is one.
fn wait_message(event: &AnswerEvent, config: &AnswerConfig) -> Option<String> {
    match event {
        AnswerEvent::ToolCall { tool_name, .. } => Some(format!("Running {}...", tool_name)),
        AnswerEvent::ToolResult { .. } if !config.skip_gen_ai_answer_generation => {
            Some("Generating answer...".to_string())
        }
        _ => None,
    }
}

/// Build the configured tool set.
pub fn build_tools(http_tools: &[HttpToolSettings]) -> SiftResult<Vec<Arc<dyn Tool>>> {
    http_tools
        .iter()
        .map(|t| {
            HttpTool::new(&t.name, &t.description, &t.url).map(|tool| Arc::new(tool) as Arc<dyn Tool>)
        })
        .collect()
}

/// Arguments for the forced tool, defaulting to the question as the query.
fn tool_args(args: &AskArgs) -> SiftResult<ToolArgs> {
    match &args.tool_args {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(raw)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(AnswerError::InvalidInput(
                "--tool-args must be a JSON object".to_string(),
            )),
        },
        None => {
            let mut map = ToolArgs::new();
            map.insert("query".to_string(), serde_json::json!(args.question));
            Ok(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::ToolOutcome;

    fn ask(question: &str, tool_args: Option<&str>) -> AskArgs {
        AskArgs {
            question: question.to_string(),
            history: None,
            force_tool: Some("search".to_string()),
            tool_args: tool_args.map(str::to_string),
            skip_gen_ai: false,
            skip_explicit_tool_calling: false,
            return_contexts: false,
            model: None,
            json: false,
        }
    }

    #[test]
    fn test_tool_args_default_to_question() {
        let args = tool_args(&ask("What is the capital of the moon?", None)).unwrap();
        assert_eq!(args["query"], "What is the capital of the moon?");
    }

    #[test]
    fn test_tool_args_must_be_object() {
        let args = tool_args(&ask("q", Some(r#"{"query": "moon", "limit": 2}"#))).unwrap();
        assert_eq!(args["limit"], 2);

        assert!(matches!(
            tool_args(&ask("q", Some("[1]"))),
            Err(AnswerError::InvalidInput(_))
        ));
        assert!(matches!(
            tool_args(&ask("q", Some("{oops"))),
            Err(AnswerError::Json(_))
        ));
    }

    #[test]
    fn test_wait_message_follows_tool_phase() {
        let config = AnswerConfig::default();
        let call = AnswerEvent::ToolCall {
            call_id: "1".to_string(),
            tool_name: "search".to_string(),
            args: ToolArgs::new(),
        };
        let result = AnswerEvent::ToolResult {
            call_id: "1".to_string(),
            tool_name: "search".to_string(),
            outcome: ToolOutcome::Error {
                message: "offline".to_string(),
            },
            contexts: None,
        };

        assert_eq!(
            wait_message(&call, &config).as_deref(),
            Some("Running search...")
        );
        assert_eq!(
            wait_message(&result, &config).as_deref(),
            Some("Generating answer...")
        );

        let skipped = AnswerConfig {
            skip_gen_ai_answer_generation: true,
            ..config
        };
        assert_eq!(wait_message(&result, &skipped), None);
        assert_eq!(
            wait_message(
                &AnswerEvent::AnswerToken {
                    text: "Hi".to_string()
                },
                &config
            ),
            None
        );
    }

    #[test]
    fn test_build_tools() {
        let tools = build_tools(&[HttpToolSettings {
            name: "search".to_string(),
            description: "Search documents".to_string(),
            url: "http://localhost:9000/search".to_string(),
        }])
        .unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name(), "search");

        assert!(build_tools(&[HttpToolSettings {
            name: "broken".to_string(),
            description: String::new(),
            url: "nope".to_string(),
        }])
        .is_err());
    }
}
