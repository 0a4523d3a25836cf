//! Test-only helpers: scripted models, recording callbacks and canned tools.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::{Result, anyhow};

use crate::callbacks::AgentCallbacks;
use crate::core::stop::truncate_at_stop;
use crate::core::types::{AgentAction, Decision};
use crate::io::model::{ChatMessage, CompletionRequest, LanguageModel};
use crate::tools::Tool;

/// Model that replays pre-recorded completions and captures every request.
///
/// Completions are cut at the request's stop marker like a real backend would.
pub struct ScriptedModel {
    responses: RefCell<VecDeque<String>>,
    repeat: Option<String>,
    chat: bool,
    requests: RefCell<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    /// Return `responses` in order, then fail.
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: RefCell::new(responses.into_iter().map(Into::into).collect()),
            repeat: None,
            chat: false,
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Return `response` for every call.
    pub fn repeating(response: impl Into<String>) -> Self {
        Self {
            repeat: Some(response.into()),
            ..Self::new(Vec::<String>::new())
        }
    }

    /// Behave like a chat backend (reports chat messages to callbacks).
    pub fn as_chat(mut self) -> Self {
        self.chat = true;
        self
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.borrow().clone()
    }
}

impl LanguageModel for ScriptedModel {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.borrow_mut().push(request.clone());
        let next = self
            .responses
            .borrow_mut()
            .pop_front()
            .or_else(|| self.repeat.clone())
            .ok_or_else(|| anyhow!("scripted model has no more responses"))?;
        Ok(truncate_at_stop(&next, &request.stop).to_string())
    }

    fn chat_messages(&self, prompt: &str) -> Option<Vec<ChatMessage>> {
        self.chat.then(|| vec![ChatMessage::user(prompt)])
    }
}

/// Callbacks that record a compact line per event.
#[derive(Debug, Default)]
pub struct RecordingCallbacks {
    events: RefCell<Vec<String>>,
}

impl RecordingCallbacks {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl AgentCallbacks for RecordingCallbacks {
    fn on_llm_start(&self, _prompt: &str) {
        self.push("llm_start".to_string());
    }

    fn on_chat_model_start(&self, messages: &[ChatMessage]) {
        self.push(format!("chat_model_start {}", messages.len()));
    }

    fn on_llm_end(&self, _text: &str) {
        self.push("llm_end".to_string());
    }

    fn on_agent_step(&self, iteration: u32, decision: &Decision) {
        let event = match decision {
            Decision::Action(action) => format!("step {iteration} action {}", action.tool),
            Decision::Finish(finish) => format!("step {iteration} finish {}", finish.return_value),
        };
        self.push(event);
    }

    fn on_tool_end(&self, _action: &AgentAction, observation: &str) {
        self.push(format!("tool_end {observation}"));
    }
}

/// Tool whose function always returns an error.
pub fn failing_tool(name: &str) -> Tool {
    let message = format!("{name} always fails");
    Tool::new(name, "Always fails", move |_| Err(anyhow!(message.clone())))
}
