//! Shared deterministic types for the agent loop.
//!
//! These types define stable contracts between the parser, the loop and the
//! prompt renderer. They carry no behavior beyond small accessors.

use serde::Serialize;

/// A tool call proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentAction {
    /// Name of the tool to invoke.
    pub tool: String,
    /// Single string argument passed to the tool.
    pub tool_input: String,
    /// Raw model text the action was parsed from.
    pub log: String,
}

/// The model's final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentFinish {
    pub return_value: String,
    /// Raw model text the answer was parsed from.
    pub log: String,
}

/// What the model decided to do in one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Decision {
    Action(AgentAction),
    Finish(AgentFinish),
}

/// An executed action paired with the observation it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub action: AgentAction,
    pub observation: String,
}

/// Where the control loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopPhase {
    /// Rendering, calling the model and parsing its output.
    Running,
    /// An action was parsed; its tool has not returned yet.
    AwaitingTool,
    /// The model produced a final answer.
    Finished,
    /// The run stopped without a final answer.
    Failed,
}

impl LoopPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, LoopPhase::Finished | LoopPhase::Failed)
    }
}
