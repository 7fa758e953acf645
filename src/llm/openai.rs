//! OpenAI chat-completions streamer.

use super::{GenerationRequest, ModelStreamer, TokenStream};
use crate::config::Prompts;
use crate::error::{AnswerError, Result};
use crate::openai::create_client;
use crate::tools::{Tool, ToolArgs, ToolChoice};
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, ChatCompletionTool, ChatCompletionToolChoiceOption,
    ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionObject,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Streams answers from an OpenAI chat model.
pub struct OpenAIStreamer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    prompts: Prompts,
}

impl OpenAIStreamer {
    /// Create a new streamer for the given model.
    pub fn new(model: &str) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: model.to_string(),
            temperature: 0.7,
            prompts: Prompts::default(),
        })
    }

    /// Use an already configured client.
    pub fn with_client(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature: 0.7,
            prompts: Prompts::default(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    fn build_messages(&self, request: &GenerationRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let user_prompt = render_user_prompt(&self.prompts, request);

        Ok(vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.prompts.answer.system.clone())
                .build()
                .map_err(|e| AnswerError::Generation(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| AnswerError::Generation(e.to_string()))?
                .into(),
        ])
    }
}

#[async_trait]
impl ModelStreamer for OpenAIStreamer {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn stream(&self, request: &GenerationRequest) -> Result<TokenStream> {
        let messages = self.build_messages(request)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .stream(true)
            .build()
            .map_err(|e| AnswerError::Generation(e.to_string()))?;

        info!("Starting answer stream");

        let stream = self
            .client
            .chat()
            .create_stream(chat_request)
            .await
            .map_err(|e| AnswerError::OpenAI(format!("Failed to start stream: {}", e)))?;

        let tokens = stream.filter_map(|chunk| async move {
            match chunk {
                Ok(response) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content)
                    .map(Ok),
                Err(e) => Some(Err(AnswerError::Generation(e.to_string()))),
            }
        });

        Ok(Box::pin(tokens))
    }

    #[instrument(skip(self, request, tools), fields(model = %self.model, tools = tools.len()))]
    async fn select_tool(
        &self,
        request: &GenerationRequest,
        tools: &[Arc<dyn Tool>],
    ) -> Result<Option<ToolChoice>> {
        if tools.is_empty() {
            return Ok(None);
        }

        let messages = self.build_messages(request)?;

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .tools(tool_definitions(tools))
            .tool_choice(ChatCompletionToolChoiceOption::Auto)
            .build()
            .map_err(|e| AnswerError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| AnswerError::OpenAI(format!("Tool selection failed: {}", e)))?;

        let Some(call) = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.tool_calls)
            .and_then(|calls| calls.into_iter().next())
        else {
            debug!("Model chose not to call a tool");
            return Ok(None);
        };

        Ok(choice_from_call(call.function.name, &call.function.arguments))
    }
}

/// Turn a model tool call into a choice. A call whose arguments cannot be
/// parsed is dropped, so the answer proceeds without a tool.
fn choice_from_call(tool_name: String, arguments: &str) -> Option<ToolChoice> {
    match parse_arguments(arguments) {
        Ok(args) => Some(ToolChoice { tool_name, args }),
        Err(e) => {
            warn!("Ignoring call to '{}' with unparseable arguments: {}", tool_name, e);
            None
        }
    }
}

/// Build OpenAI function definitions from the tool set.
pub fn tool_definitions(tools: &[Arc<dyn Tool>]) -> Vec<ChatCompletionTool> {
    tools
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()).filter(|d| !d.is_empty()),
                parameters: Some(tool.parameters()),
                strict: None,
            },
        })
        .collect()
}

/// Parse the JSON arguments string of a model tool call.
fn parse_arguments(arguments: &str) -> Result<ToolArgs> {
    if arguments.trim().is_empty() {
        return Ok(ToolArgs::new());
    }
    match serde_json::from_str::<serde_json::Value>(arguments)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(AnswerError::InvalidInput(format!(
            "Tool arguments must be a JSON object, got {}",
            other
        ))),
    }
}

fn render_user_prompt(prompts: &Prompts, request: &GenerationRequest) -> String {
    let mut vars = HashMap::new();
    vars.insert("question".to_string(), request.question.clone());
    vars.insert(
        "history".to_string(),
        request
            .history
            .as_ref()
            .map(|h| format!("Conversation so far:\n{}\n\n", h))
            .unwrap_or_default(),
    );
    vars.insert(
        "context".to_string(),
        request
            .context_text()
            .map(|c| format!("Context:\n{}\n\n", c))
            .unwrap_or_default(),
    );

    prompts.render_with_custom(&prompts.answer.user, &vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FnTool, ToolOutput};

    #[test]
    fn test_parse_arguments() {
        let args = parse_arguments(r#"{"query": "moon", "limit": 3}"#).unwrap();
        assert_eq!(args["query"], "moon");
        assert_eq!(args["limit"], 3);

        assert!(parse_arguments("").unwrap().is_empty());
        assert!(parse_arguments("[1, 2]").is_err());
        assert!(parse_arguments("{not json").is_err());
    }

    #[test]
    fn test_choice_from_call_drops_bad_arguments() {
        let choice = choice_from_call("search".to_string(), r#"{"query": "moon"}"#).unwrap();
        assert_eq!(choice.tool_name, "search");
        assert_eq!(choice.args["query"], "moon");

        assert_eq!(choice_from_call("search".to_string(), "{\"query\": "), None);
        assert_eq!(choice_from_call("search".to_string(), "\"moon\""), None);
    }

    #[test]
    fn test_tool_definitions() {
        let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(
            FnTool::new("search", |_| async { Ok(ToolOutput::new("ok")) })
                .with_description("Search the knowledge base")
                .with_parameters(serde_json::json!({
                    "type": "object",
                    "properties": { "query": { "type": "string" } },
                    "required": ["query"]
                })),
        )];

        let defs = tool_definitions(&tools);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].function.name, "search");
        assert_eq!(
            defs[0].function.description.as_deref(),
            Some("Search the knowledge base")
        );
        assert_eq!(defs[0].function.parameters.as_ref().unwrap()["required"][0], "query");
    }

    #[test]
    fn test_render_user_prompt_sections() {
        let prompts = Prompts::default();

        let plain = render_user_prompt(&prompts, &GenerationRequest::new("Why is the sky blue?"));
        assert!(plain.contains("Why is the sky blue?"));
        assert!(!plain.contains("Conversation so far"));
        assert!(!plain.contains("{{"));

        let mut request = GenerationRequest::new("And at night?");
        request.history = Some("user: Why is the sky blue?".to_string());
        let with_history = render_user_prompt(&prompts, &request);
        assert!(with_history.contains("Conversation so far:\nuser: Why is the sky blue?"));
    }
}
