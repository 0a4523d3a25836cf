//! The ReAct control loop.
//!
//! Each iteration renders the prompt from the steps so far, asks the model for
//! a completion, parses it, and either stops on a final answer or runs the
//! requested tool and records the observation. The loop never calls the model
//! more than `max_iterations` times.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::callbacks::AgentCallbacks;
use crate::core::budget::remaining_budget;
use crate::core::parser::{ParseError, parse};
use crate::core::scratchpad::format_scratchpad;
use crate::core::state::LoopState;
use crate::core::types::{AgentAction, Decision, LoopPhase, Step};
use crate::io::config::{AgentConfig, ToolErrorPolicy};
use crate::io::model::{CompletionRequest, LanguageModel};
use crate::io::prompt::PromptRenderer;
use crate::tools::{ToolNotFoundError, ToolRegistry};

/// Limits and policies for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    pub max_iterations: u32,
    pub stop: String,
    /// Budget for the whole run; each model call gets what is left of it.
    pub run_timeout: Duration,
    pub tool_errors: ToolErrorPolicy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from(&AgentConfig::default())
    }
}

impl From<&AgentConfig> for LoopConfig {
    fn from(cfg: &AgentConfig) -> Self {
        Self {
            max_iterations: cfg.max_iterations,
            stop: cfg.stop.clone(),
            run_timeout: Duration::from_secs(cfg.run_timeout_secs),
            tool_errors: cfg.tool_errors,
        }
    }
}

/// Why a run ended without a final answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AgentError {
    #[error(transparent)]
    ToolNotFound(#[from] ToolNotFoundError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("no final answer after {max_iterations} iterations")]
    IterationLimitExceeded { max_iterations: u32 },
    #[error("tool '{tool}' failed: {message}")]
    ToolFailed { tool: String, message: String },
}

/// Reason why `run_agent` stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    /// The model produced a final answer.
    Finished { return_value: String },
    /// The run ended without one.
    Failed(AgentError),
}

/// Summary of a run, including the full step transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub question: String,
    pub steps: Vec<Step>,
    /// Number of model calls made.
    pub iterations: u32,
    /// Phase the loop ended in; always terminal.
    pub phase: LoopPhase,
    pub stop: LoopStop,
}

impl RunOutcome {
    pub fn return_value(&self) -> Option<&str> {
        match &self.stop {
            LoopStop::Finished { return_value } => Some(return_value),
            LoopStop::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&AgentError> {
        match &self.stop {
            LoopStop::Finished { .. } => None,
            LoopStop::Failed(err) => Some(err),
        }
    }

    /// Steps rendered the same way the model saw them.
    pub fn transcript(&self) -> String {
        format_scratchpad(&self.steps)
    }
}

/// Answer `question` by alternating model calls and tool calls.
///
/// Parse failures, unknown tools, fatal tool errors and the iteration limit end
/// the run with [`LoopStop::Failed`]. Model transport failures, an exhausted
/// run deadline and template errors are returned as `Err`.
#[instrument(skip_all, fields(max_iterations = config.max_iterations))]
pub fn run_agent<M: LanguageModel, C: AgentCallbacks + ?Sized>(
    question: &str,
    model: &M,
    tools: &ToolRegistry,
    callbacks: &C,
    config: &LoopConfig,
) -> Result<RunOutcome> {
    let renderer = PromptRenderer::new()?;
    let deadline = Instant::now() + config.run_timeout;
    let mut state = LoopState::new(question);

    while state.iterations() < config.max_iterations {
        let iteration = state.begin_iteration();
        info!(iteration, steps = state.steps().len(), "iteration started");

        let prompt = renderer.render(state.question(), state.steps(), tools)?;
        match model.chat_messages(&prompt) {
            Some(messages) => callbacks.on_chat_model_start(&messages),
            None => callbacks.on_llm_start(&prompt),
        }

        let request = CompletionRequest {
            prompt,
            stop: config.stop.clone(),
            timeout: remaining_budget(deadline)?,
        };
        let text = model
            .complete(&request)
            .with_context(|| format!("model call failed in iteration {iteration}"))?;
        callbacks.on_llm_end(&text);

        let decision = match parse(&text) {
            Ok(decision) => decision,
            Err(err) => {
                warn!(iteration, err = %err, "unparseable model output");
                return Ok(failed(state, err.into()));
            }
        };
        callbacks.on_agent_step(iteration, &decision);

        match decision {
            Decision::Finish(finish) => {
                info!(iteration, "final answer reached");
                state.finish();
                return Ok(outcome(
                    state,
                    LoopStop::Finished {
                        return_value: finish.return_value,
                    },
                ));
            }
            Decision::Action(action) => {
                state.await_tool();
                let observation = match dispatch(tools, &action, config.tool_errors) {
                    Ok(observation) => observation,
                    Err(err) => return Ok(failed(state, err)),
                };
                callbacks.on_tool_end(&action, &observation);
                state.record_step(action, observation);
            }
        }
    }

    warn!(
        max_iterations = config.max_iterations,
        "iteration limit reached without a final answer"
    );
    let max_iterations = config.max_iterations;
    Ok(failed(
        state,
        AgentError::IterationLimitExceeded { max_iterations },
    ))
}

/// Look up and run the tool named by `action`, producing its observation.
fn dispatch(
    tools: &ToolRegistry,
    action: &AgentAction,
    policy: ToolErrorPolicy,
) -> Result<String, AgentError> {
    let tool = tools.lookup(&action.tool)?;
    debug!(tool = tool.name(), input = %action.tool_input, "invoking tool");
    match tool.invoke(&action.tool_input) {
        Ok(observation) => Ok(observation),
        Err(err) => {
            let message = format!("{err:#}");
            warn!(tool = tool.name(), err = %message, "tool failed");
            match policy {
                ToolErrorPolicy::Observe => Ok(format!("Error: {message}")),
                ToolErrorPolicy::Fail => Err(AgentError::ToolFailed {
                    tool: action.tool.clone(),
                    message,
                }),
            }
        }
    }
}

fn failed(mut state: LoopState, err: AgentError) -> RunOutcome {
    state.fail();
    outcome(state, LoopStop::Failed(err))
}

fn outcome(state: LoopState, stop: LoopStop) -> RunOutcome {
    let phase = state.phase();
    debug_assert!(phase.is_terminal());
    let iterations = state.iterations();
    let question = state.question().to_string();
    RunOutcome {
        question,
        steps: state.into_steps(),
        iterations,
        phase,
        stop,
    }
}
