//! Scratchpad rendering: the transcript of past steps fed back to the model.

use crate::core::types::Step;

/// Serialize steps as repeating `Action` / `Action Input` / `Observation` blocks.
///
/// Blocks are concatenated in step order. No steps renders as an empty string.
pub fn format_scratchpad(steps: &[Step]) -> String {
    let mut out = String::new();
    for step in steps {
        out.push_str("Action: ");
        out.push_str(&step.action.tool);
        out.push_str("\nAction Input: ");
        out.push_str(&step.action.tool_input);
        out.push_str("\nObservation: ");
        out.push_str(&step.observation);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgentAction;

    fn step(tool: &str, input: &str, observation: &str) -> Step {
        Step {
            action: AgentAction {
                tool: tool.to_string(),
                tool_input: input.to_string(),
                log: String::new(),
            },
            observation: observation.to_string(),
        }
    }

    #[test]
    fn empty_steps_render_empty() {
        assert_eq!(format_scratchpad(&[]), "");
    }

    #[test]
    fn steps_render_in_order() {
        let steps = vec![
            step("get_text_length", "DOG", "3"),
            step("get_text_length", "CAT FISH", "8"),
        ];
        assert_eq!(
            format_scratchpad(&steps),
            "Action: get_text_length\nAction Input: DOG\nObservation: 3\n\
             Action: get_text_length\nAction Input: CAT FISH\nObservation: 8\n"
        );
    }
}
