//! Deterministic, pure logic shared by the agent loop.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod budget;
pub mod parser;
pub mod scratchpad;
pub mod state;
pub mod stop;
pub mod types;
