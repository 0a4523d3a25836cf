//! Side-effecting collaborators of the agent loop.

pub mod command_model;
pub mod config;
pub mod model;
pub mod openai;
pub mod process;
pub mod prompt;
