//! ReAct prompt rendering.

use anyhow::{Context, Result};
use minijinja::{Environment, context};

use crate::core::scratchpad::format_scratchpad;
use crate::core::types::Step;
use crate::tools::ToolRegistry;

const REACT_TEMPLATE: &str = include_str!("prompts/react.md");

/// Template engine wrapper around minijinja.
pub struct PromptRenderer {
    env: Environment<'static>,
}

impl PromptRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("react", REACT_TEMPLATE)
            .context("parse react prompt template")?;
        Ok(Self { env })
    }

    /// Render the prompt for the next model call.
    ///
    /// Deterministic: identical inputs always yield identical text.
    pub fn render(&self, question: &str, steps: &[Step], tools: &ToolRegistry) -> Result<String> {
        let template = self.env.get_template("react")?;
        let rendered = template
            .render(context! {
                tools => tools.render_descriptions(),
                tool_names => tools.render_names(),
                input => question,
                agent_scratchpad => format_scratchpad(steps),
            })
            .context("render react prompt")?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgentAction;
    use crate::tools::builtin_registry;

    const QUESTION: &str = "What is the length in characters of the text DOG?";

    #[test]
    fn initial_prompt_has_question_and_empty_scratchpad() {
        let tools = builtin_registry().expect("tools");
        let prompt = PromptRenderer::new()
            .expect("renderer")
            .render(QUESTION, &[], &tools)
            .expect("render");

        assert!(prompt.contains(&format!("Question: {QUESTION}\n")));
        assert!(prompt.ends_with("Thought: "), "{prompt:?}");
        assert!(prompt.contains("get_text_length: Returns the length of a text by characters"));
        assert!(prompt.contains("should be one of [get_text_length]"));
        assert!(!prompt.contains("Observation: 3"));
    }

    #[test]
    fn rendering_is_idempotent() {
        let tools = builtin_registry().expect("tools");
        let renderer = PromptRenderer::new().expect("renderer");
        let first = renderer.render(QUESTION, &[], &tools).expect("render");
        let second = renderer.render(QUESTION, &[], &tools).expect("render");
        assert_eq!(first, second);
    }

    #[test]
    fn scratchpad_follows_the_question() {
        let tools = builtin_registry().expect("tools");
        let steps = vec![Step {
            action: AgentAction {
                tool: "get_text_length".to_string(),
                tool_input: "DOG".to_string(),
                log: "Action: get_text_length\nAction Input: DOG".to_string(),
            },
            observation: "3".to_string(),
        }];
        let prompt = PromptRenderer::new()
            .expect("renderer")
            .render(QUESTION, &steps, &tools)
            .expect("render");

        let question_pos = prompt.find("Question: What is").expect("question");
        let step_pos = prompt
            .find("Thought: Action: get_text_length\nAction Input: DOG\nObservation: 3\n")
            .expect("scratchpad");
        assert!(question_pos < step_pos);
    }

    #[test]
    fn question_text_is_not_escaped() {
        let tools = builtin_registry().expect("tools");
        let prompt = PromptRenderer::new()
            .expect("renderer")
            .render("Is <b>\"quoted\" & bold</b> long?", &[], &tools)
            .expect("render");
        assert!(prompt.contains("Question: Is <b>\"quoted\" & bold</b> long?"));
    }
}
