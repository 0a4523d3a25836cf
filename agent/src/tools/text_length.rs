//! `get_text_length`: counts the characters of its input.

use anyhow::Result;
use tracing::debug;

use super::Tool;

pub const NAME: &str = "get_text_length";
pub const DESCRIPTION: &str = "Returns the length of a text by characters";

pub fn tool() -> Tool {
    Tool::new(NAME, DESCRIPTION, get_text_length)
}

fn get_text_length(text: &str) -> Result<String> {
    debug!(text, "get_text_length enter");
    Ok(text.chars().count().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(get_text_length("DOG").expect("len"), "3");
        assert_eq!(get_text_length("").expect("len"), "0");
        assert_eq!(get_text_length("héllo").expect("len"), "5");
    }

    #[test]
    fn tool_is_named_for_the_prompt() {
        let tool = tool();
        assert_eq!(tool.name(), "get_text_length");
        assert_eq!(tool.invoke("ABCD").expect("invoke"), "4");
    }
}
