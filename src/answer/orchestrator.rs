//! Answer orchestrator.
//!
//! Runs the three phases of answering a question (tool-use decision, tool
//! execution, generation) and exposes them as one lazy event stream. Each
//! pull advances the phase cursor by at most one event, so a consumer that
//! stops pulling never triggers phases it has not reached.

use super::config::{AnswerConfig, ForceUseTool};
use super::events::{AnswerEvent, FinishReason, ToolOutcome};
use crate::error::{AnswerError, Result};
use crate::llm::{GenerationRequest, ModelStreamer, TokenStream, ToolContext};
use crate::tools::{find_tool, Tool, ToolArgs};
use futures::stream::{self, Stream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where an [`Answer`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Deciding whether a tool should run.
    Deciding,
    /// The tool call was announced and the tool runs on the next pull.
    ToolRunning,
    /// Generating (or skipping generation of) the answer.
    Generating,
    /// A terminal error is produced on the next pull.
    Failed,
    /// Nothing left to produce.
    Done,
}

enum State {
    Deciding,
    ToolRunning(PendingCall),
    Generating(Option<TokenStream>),
    /// A terminal error is produced on the next pull.
    Failing(AnswerError),
    Done,
}

struct PendingCall {
    call_id: String,
    tool: Arc<dyn Tool>,
    args: ToolArgs,
}

impl PendingCall {
    fn new(tool: Arc<dyn Tool>, args: ToolArgs) -> Self {
        Self {
            call_id: Uuid::new_v4().to_string(),
            tool,
            args,
        }
    }
}

/// Answers a single question.
///
/// One instance covers one question; its event stream can be consumed once.
pub struct Answer {
    question: String,
    history: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    force_use_tool: ForceUseTool,
    config: AnswerConfig,
    llm: Arc<dyn ModelStreamer>,
    forced: Option<(Arc<dyn Tool>, ToolArgs)>,
    tool_context: Option<ToolContext>,
    state: State,
}

impl Answer {
    /// Create an answer for `question`.
    pub fn new(
        question: impl Into<String>,
        tools: Vec<Arc<dyn Tool>>,
        force_use_tool: ForceUseTool,
        config: AnswerConfig,
        llm: Arc<dyn ModelStreamer>,
    ) -> Self {
        Self {
            question: question.into(),
            history: None,
            tools,
            force_use_tool,
            config,
            llm,
            forced: None,
            tool_context: None,
            state: State::Deciding,
        }
    }

    /// Set the free-text history of earlier turns.
    pub fn with_history(mut self, history: impl Into<String>) -> Self {
        self.history = Some(history.into());
        self
    }

    /// Current phase of the lifecycle.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Deciding => Phase::Deciding,
            State::ToolRunning(_) => Phase::ToolRunning,
            State::Generating(_) => Phase::Generating,
            State::Failing(_) => Phase::Failed,
            State::Done => Phase::Done,
        }
    }

    /// Stream the answer events.
    ///
    /// Fails with [`AnswerError::Configuration`] before producing anything if
    /// the forced tool is not in the tool set or tool names are not unique.
    /// Runtime failures end the stream with a single `Err` item; items already
    /// produced stay valid. Calling this again after the stream is exhausted
    /// yields an empty stream.
    pub fn processed_streamed_output(
        &mut self,
    ) -> Result<impl Stream<Item = Result<AnswerEvent>> + Send + '_> {
        if matches!(self.state, State::Deciding) {
            self.resolve_forced_tool()?;
        }

        Ok(stream::unfold(self, |answer| async move {
            let item = answer.next_event().await?;
            Some((item, answer))
        }))
    }

    fn resolve_forced_tool(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.name()) {
                return Err(AnswerError::Configuration(format!(
                    "Duplicate tool name '{}'",
                    tool.name()
                )));
            }
        }

        if !self.force_use_tool.force {
            return Ok(());
        }

        let tool = find_tool(&self.tools, &self.force_use_tool.tool_name)
            .ok_or_else(|| {
                AnswerError::Configuration(format!(
                    "Forced tool '{}' is not in the tool set",
                    self.force_use_tool.tool_name
                ))
            })?
            .clone();

        self.forced = Some((tool, self.force_use_tool.args.clone()));
        Ok(())
    }

    async fn next_event(&mut self) -> Option<Result<AnswerEvent>> {
        loop {
            match std::mem::replace(&mut self.state, State::Done) {
                State::Deciding => match self.decide().await {
                    Some(call) => {
                        info!("Calling tool: {} with args: {:?}", call.tool.name(), call.args);
                        let event = AnswerEvent::ToolCall {
                            call_id: call.call_id.clone(),
                            tool_name: call.tool.name().to_string(),
                            args: call.args.clone(),
                        };
                        self.state = State::ToolRunning(call);
                        return Some(Ok(event));
                    }
                    None => {
                        debug!("No tool selected");
                        self.state = State::Generating(None);
                    }
                },

                State::ToolRunning(call) => return Some(Ok(self.run_tool(call).await)),

                State::Generating(None) => {
                    if self.config.skip_gen_ai_answer_generation {
                        debug!("Answer generation skipped");
                        return Some(Ok(AnswerEvent::AnswerFinished {
                            finish_reason: FinishReason::GenerationSkipped,
                        }));
                    }

                    let request = self.generation_request();
                    match self.llm.stream(&request).await {
                        Ok(tokens) => self.state = State::Generating(Some(tokens)),
                        Err(e) => return Some(Err(into_generation_error(e))),
                    }
                }

                State::Generating(Some(mut tokens)) => match tokens.next().await {
                    Some(Ok(text)) => {
                        self.state = State::Generating(Some(tokens));
                        if !text.is_empty() {
                            return Some(Ok(AnswerEvent::AnswerToken { text }));
                        }
                    }
                    Some(Err(e)) => {
                        warn!("Answer stream failed: {}", e);
                        return Some(Err(into_generation_error(e)));
                    }
                    None => {
                        return Some(Ok(AnswerEvent::AnswerFinished {
                            finish_reason: FinishReason::Stop,
                        }))
                    }
                },

                State::Failing(e) => return Some(Err(e)),

                State::Done => return None,
            }
        }
    }

    /// Pick the tool to run, if any. Selection problems fall back to
    /// answering without a tool so generation still happens.
    async fn decide(&mut self) -> Option<PendingCall> {
        if let Some((tool, args)) = self.forced.take() {
            return Some(PendingCall::new(tool, args));
        }

        if self.config.skip_explicit_tool_calling || self.tools.is_empty() {
            return None;
        }

        let request = self.generation_request();
        let choice = match self.llm.select_tool(&request, &self.tools).await {
            Ok(choice) => choice?,
            Err(e) => {
                warn!("Tool selection failed, answering without a tool: {}", e);
                return None;
            }
        };

        match find_tool(&self.tools, &choice.tool_name) {
            Some(tool) => Some(PendingCall::new(tool.clone(), choice.args)),
            None => {
                warn!("Model selected unknown tool '{}', ignoring", choice.tool_name);
                None
            }
        }
    }

    /// Run the pending tool and record its outcome. Sets the next state.
    async fn run_tool(&mut self, call: PendingCall) -> AnswerEvent {
        let tool_name = call.tool.name().to_string();

        match call.tool.run(&call.args).await {
            Ok(output) => {
                debug!("Tool {} returned: {}", tool_name, output.summary);
                let event = AnswerEvent::ToolResult {
                    call_id: call.call_id,
                    tool_name: tool_name.clone(),
                    outcome: ToolOutcome::Success {
                        summary: output.summary.clone(),
                        payload: output.payload.clone(),
                    },
                    contexts: self.config.return_contexts.then(|| output.contexts.clone()),
                };
                self.tool_context = Some(ToolContext {
                    tool_name,
                    outcome: Ok(output),
                });
                self.state = State::Generating(None);
                event
            }
            Err(e) => {
                warn!("Tool {} failed: {}", tool_name, e);
                let message = e.to_string();
                let event = AnswerEvent::ToolResult {
                    call_id: call.call_id,
                    tool_name: tool_name.clone(),
                    outcome: ToolOutcome::Error {
                        message: message.clone(),
                    },
                    contexts: None,
                };

                self.state = if e.is_fatal() {
                    State::Failing(AnswerError::ToolExecution {
                        tool: tool_name,
                        message,
                    })
                } else {
                    self.tool_context = Some(ToolContext {
                        tool_name,
                        outcome: Err(message),
                    });
                    State::Generating(None)
                };
                event
            }
        }
    }

    fn generation_request(&self) -> GenerationRequest {
        GenerationRequest {
            question: self.question.clone(),
            history: self.history.clone(),
            tool_context: self.tool_context.clone(),
        }
    }
}

fn into_generation_error(e: AnswerError) -> AnswerError {
    match e {
        AnswerError::Generation(_) => e,
        other => AnswerError::Generation(other.to_string()),
    }
}
