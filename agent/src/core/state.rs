//! Loop state owned by the control loop.
//!
//! Transitions:
//!
//! ```text
//! Running --action--> AwaitingTool --observation--> Running
//! Running --finish--> Finished
//! Running | AwaitingTool --error / iteration limit--> Failed
//! ```

use crate::core::types::{AgentAction, LoopPhase, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopState {
    question: String,
    steps: Vec<Step>,
    iterations: u32,
    phase: LoopPhase,
}

impl LoopState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            steps: Vec::new(),
            iterations: 0,
            phase: LoopPhase::Running,
        }
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of model calls started so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    /// Start another iteration. Returns the 1-indexed iteration number.
    pub fn begin_iteration(&mut self) -> u32 {
        debug_assert_eq!(self.phase, LoopPhase::Running);
        self.iterations += 1;
        self.iterations
    }

    pub fn await_tool(&mut self) {
        debug_assert_eq!(self.phase, LoopPhase::Running);
        self.phase = LoopPhase::AwaitingTool;
    }

    /// Append the executed action and its observation, then resume running.
    pub fn record_step(&mut self, action: AgentAction, observation: String) {
        debug_assert_eq!(self.phase, LoopPhase::AwaitingTool);
        self.steps.push(Step {
            action,
            observation,
        });
        self.phase = LoopPhase::Running;
    }

    pub fn finish(&mut self) {
        self.phase = LoopPhase::Finished;
    }

    pub fn fail(&mut self) {
        self.phase = LoopPhase::Failed;
    }

    /// Consume the state, keeping the transcript.
    pub fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}
