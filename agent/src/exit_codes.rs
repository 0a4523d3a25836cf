//! Stable exit codes for `react-agent` commands.

/// Command succeeded (for `run`: a final answer was reached).
pub const OK: i32 = 0;
/// Invalid configuration, missing credentials, or a model/transport error.
pub const INVALID: i32 = 1;
/// `react-agent run` ended without a final answer.
pub const NO_ANSWER: i32 = 2;
