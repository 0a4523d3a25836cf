//! Tool registry and built-in tools.
//!
//! Tools are registered explicitly when the registry is built; nothing
//! registers itself as a side effect of being defined.

use std::fmt;

use anyhow::{Result, bail};
use thiserror::Error;

pub mod text_length;

/// Function backing a tool: one string argument in, one string observation out.
pub type ToolFn = Box<dyn Fn(&str) -> Result<String>>;

/// A named capability exposed to the model.
pub struct Tool {
    name: String,
    description: String,
    func: ToolFn,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        func: impl Fn(&str) -> Result<String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            func: Box::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the tool. Any side effects are the tool's own.
    pub fn invoke(&self, input: &str) -> Result<String> {
        (self.func)(input)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// The model asked for a tool that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tool '{name}' not found (available: {available})")]
pub struct ToolNotFoundError {
    pub name: String,
    pub available: String,
}

/// Ordered set of tools with unique names.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Names must be unique so lookups are unambiguous.
    pub fn register(&mut self, tool: Tool) -> Result<()> {
        if self.tools.iter().any(|existing| existing.name == tool.name) {
            bail!("tool '{}' is already registered", tool.name);
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Find a tool by exact name, checking every entry before giving up.
    pub fn lookup(&self, name: &str) -> Result<&Tool, ToolNotFoundError> {
        self.tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| ToolNotFoundError {
                name: name.to_string(),
                available: self.render_names(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(Tool::name).collect()
    }

    /// Comma-joined tool names, as listed in the prompt.
    pub fn render_names(&self) -> String {
        self.names().join(", ")
    }

    /// One `name: description` line per tool, in registration order.
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|tool| format!("{}: {}", tool.name, tool.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Registry with every built-in tool.
pub fn builtin_registry() -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(text_length::tool())?;
    Ok(registry)
}
