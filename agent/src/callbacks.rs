//! Observability hooks invoked by the agent loop.
//!
//! Every hook defaults to a no-op, so handlers implement only what they need.
//! [`ConsoleCallbacks`] prints the trace the `run` command shows on stdout.

use crate::core::types::{AgentAction, Decision};
use crate::io::model::{ChatMessage, Role};

pub trait AgentCallbacks {
    /// Called with the rendered prompt before a text-completion model runs.
    fn on_llm_start(&self, _prompt: &str) {}

    /// Called instead of [`on_llm_start`](Self::on_llm_start) for chat models.
    ///
    /// Defaults to flattening the messages into one transcript and forwarding
    /// it to `on_llm_start`.
    fn on_chat_model_start(&self, messages: &[ChatMessage]) {
        self.on_llm_start(&buffer_string(messages));
    }

    /// Called with the (stop-truncated) model output.
    fn on_llm_end(&self, _text: &str) {}

    /// Called once per iteration with the parsed decision.
    fn on_agent_step(&self, _iteration: u32, _decision: &Decision) {}

    /// Called after a tool returned (or failed into) an observation.
    fn on_tool_end(&self, _action: &AgentAction, _observation: &str) {}
}

/// Handler that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallbacks;

impl AgentCallbacks for NoopCallbacks {}

/// Prints prompts, model responses, decisions and observations to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleCallbacks;

impl AgentCallbacks for ConsoleCallbacks {
    fn on_llm_start(&self, prompt: &str) {
        println!("***Prompt to LLM was:***\n{prompt}");
        println!("*********");
    }

    fn on_llm_end(&self, text: &str) {
        println!("***LLM Response:***\n{text}");
        println!("*********");
    }

    fn on_agent_step(&self, iteration: u32, decision: &Decision) {
        println!("=== agent_step {iteration} answer ===");
        match decision {
            Decision::Action(action) => println!(
                "action: tool={:?} tool_input={:?}\n",
                action.tool, action.tool_input
            ),
            Decision::Finish(finish) => {
                println!("finish: return_value={:?}\n", finish.return_value);
            }
        }
    }

    fn on_tool_end(&self, _action: &AgentAction, observation: &str) {
        println!("observation={observation:?}");
    }
}

/// Flatten chat messages into `Role: content` lines.
pub fn buffer_string(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|message| {
            let role = match message.role {
                Role::System => "System",
                Role::User => "Human",
            };
            format!("{role}: {}", message.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
