//! Text parser turning raw model output into a [`Decision`].
//!
//! Recognizes two mutually exclusive shapes:
//!
//! ```text
//! Final Answer: <answer>
//! ```
//!
//! ```text
//! Action: <tool name>
//! Action Input: <tool input>
//! ```
//!
//! A final answer anywhere in the text wins over action markers.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::core::types::{AgentAction, AgentFinish, Decision};

/// Marker that introduces the model's final answer.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:\s*(.*?)\s*Action\s*\d*\s*Input\s*\d*\s*:\s*(.*)").unwrap()
});
static ACTION_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Action\s*\d*\s*:").unwrap());
static ACTION_INPUT_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Action\s*\d*\s*Input\s*\d*\s*:").unwrap());

/// Model output that matches neither a final answer nor an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid format: missing 'Action:' after 'Thought:' in model output {text:?}")]
    MissingAction { text: String },
    #[error("invalid format: missing 'Action Input:' after 'Action:' in model output {text:?}")]
    MissingActionInput { text: String },
    #[error("could not parse model output {text:?}")]
    Unrecognized { text: String },
}

impl ParseError {
    /// The model output that failed to parse.
    pub fn text(&self) -> &str {
        match self {
            ParseError::MissingAction { text }
            | ParseError::MissingActionInput { text }
            | ParseError::Unrecognized { text } => text,
        }
    }
}

/// Parse model output into a decision.
pub fn parse(text: &str) -> Result<Decision, ParseError> {
    if let Some((_, answer)) = text.rsplit_once(FINAL_ANSWER_MARKER) {
        return Ok(Decision::Finish(AgentFinish {
            return_value: answer.trim().to_string(),
            log: text.to_string(),
        }));
    }

    if let Some(caps) = ACTION_RE.captures(text) {
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim();
        let tool_input = caps.get(2).map_or("", |m| m.as_str());
        return Ok(Decision::Action(AgentAction {
            tool: tool.to_string(),
            tool_input: clean_tool_input(tool_input),
            log: text.to_string(),
        }));
    }

    let text = text.to_string();
    if !ACTION_MARKER_RE.is_match(&text) {
        Err(ParseError::MissingAction { text })
    } else if !ACTION_INPUT_MARKER_RE.is_match(&text) {
        Err(ParseError::MissingActionInput { text })
    } else {
        Err(ParseError::Unrecognized { text })
    }
}

/// Models often quote the input (`Action Input: "DOG"`); tools want the bare value.
fn clean_tool_input(raw: &str) -> String {
    raw.trim().trim_matches('"').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(text: &str) -> AgentAction {
        match parse(text).expect("parse") {
            Decision::Action(action) => action,
            other => panic!("expected action, got {other:?}"),
        }
    }

    #[test]
    fn final_answer_yields_finish() {
        let decision = parse("Final Answer: 42").expect("parse");
        assert_eq!(
            decision,
            Decision::Finish(AgentFinish {
                return_value: "42".to_string(),
                log: "Final Answer: 42".to_string(),
            })
        );
    }

    #[test]
    fn action_pair_yields_action() {
        let got = action("Action: get_text_length\nAction Input: DOG");
        assert_eq!(got.tool, "get_text_length");
        assert_eq!(got.tool_input, "DOG");
        assert_eq!(got.log, "Action: get_text_length\nAction Input: DOG");
    }

    #[test]
    fn action_tolerates_thought_and_extra_whitespace() {
        let text =
            "I should count the letters.\nAction:   get_text_length  \n\nAction Input:   DOG \n";
        let got = action(text);
        assert_eq!(got.tool, "get_text_length");
        assert_eq!(got.tool_input, "DOG");
    }

    #[test]
    fn quoted_tool_input_is_unquoted() {
        let got = action("Thought: count it\nAction: get_text_length\nAction Input: \"DOG\"");
        assert_eq!(got.tool_input, "DOG");
    }

    #[test]
    fn numbered_markers_are_accepted() {
        let got = action("Action 1: get_text_length\nAction 1 Input 1: cat");
        assert_eq!(got.tool, "get_text_length");
        assert_eq!(got.tool_input, "cat");
    }

    #[test]
    fn final_answer_takes_precedence_over_action() {
        let text = "Action: get_text_length\nAction Input: DOG\nFinal Answer: 3";
        let decision = parse(text).expect("parse");
        assert!(matches!(decision, Decision::Finish(ref f) if f.return_value == "3"));
    }

    #[test]
    fn final_answer_uses_text_after_last_marker() {
        let decision =
            parse("Final Answer: draft\nThought: wait\nFinal Answer:  3 \n").expect("parse");
        assert!(matches!(decision, Decision::Finish(ref f) if f.return_value == "3"));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse("garbage text").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingAction {
                text: "garbage text".to_string()
            }
        );
        assert_eq!(err.text(), "garbage text");
    }

    #[test]
    fn action_without_input_reports_missing_input() {
        let err = parse("Thought: hmm\nAction: get_text_length").unwrap_err();
        assert!(matches!(err, ParseError::MissingActionInput { .. }));
    }

    #[test]
    fn input_before_action_is_unrecognized() {
        let err = parse("Action Input: DOG\nAction: get_text_length").unwrap_err();
        assert!(matches!(err, ParseError::Unrecognized { .. }), "{err:?}");
    }
}
