//! Minimal ReAct ("Reason+Act") agent loop.
//!
//! A question is answered by repeatedly prompting a language model, parsing
//! the action it proposes, running the matching local tool, and feeding the
//! observation back into the next prompt until the model emits a final answer
//! or the iteration budget runs out.
//!
//! - **[`core`]**: Pure, deterministic logic (parsing, scratchpad, loop state).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting collaborators (config files, prompt templates,
//!   language-model backends, child processes).
//! - **[`tools`]**: The tool registry and the built-in tools.
//!
//! [`agent`] wires them together into the control loop.

pub mod agent;
pub mod callbacks;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod tools;
