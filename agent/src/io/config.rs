//! Agent configuration stored in `react-agent.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "react-agent.toml";

pub const DEFAULT_QUESTION: &str = "What is the length in characters of the text DOG?";

/// Agent configuration (TOML).
///
/// Missing fields default to the values the demo was built around, so an
/// empty or absent file runs the stock question against `gpt-3.5-turbo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    /// Question answered by `react-agent run` when `--question` is not given.
    pub question: String,

    /// Maximum number of model calls before the run gives up.
    pub max_iterations: u32,

    /// Wall-clock budget for the whole run in seconds. Every model call gets
    /// whatever is left of it as its timeout.
    pub run_timeout_secs: u64,

    /// Stop marker that cuts off generation before the model invents an observation.
    pub stop: String,

    /// What to do when a tool returns an error.
    pub tool_errors: ToolErrorPolicy,

    pub model: ModelConfig,
}

/// Handling of errors returned by a tool function.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolErrorPolicy {
    /// Feed `Error: <message>` back to the model as the observation.
    #[default]
    Observe,
    /// Stop the run.
    Fail,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// OpenAI-compatible Chat Completions endpoint.
    #[default]
    Openai,
    /// External command reading the prompt on stdin and writing the completion to stdout.
    Command,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub backend: ModelBackend,

    /// Model name sent to the `openai` backend.
    pub name: String,

    pub temperature: f64,

    /// Base URL of the `openai` backend, with or without a trailing `/v1`.
    pub base_url: String,

    /// Environment variable holding the API key for the `openai` backend.
    pub api_key_env: String,

    /// Command line of the `command` backend (e.g. `["ollama","run","llama3"]`).
    pub command: Vec<String>,

    /// Truncate `command` backend stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            backend: ModelBackend::Openai,
            name: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            command: vec![
                "ollama".to_string(),
                "run".to_string(),
                "llama3".to_string(),
            ],
            output_limit_bytes: 100_000,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            max_iterations: 5,
            run_timeout_secs: 5 * 60,
            stop: "\nObservation".to_string(),
            tool_errors: ToolErrorPolicy::Observe,
            model: ModelConfig::default(),
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(anyhow!("question must not be empty"));
        }
        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be > 0"));
        }
        if self.run_timeout_secs == 0 {
            return Err(anyhow!("run_timeout_secs must be > 0"));
        }
        if self.stop.is_empty() {
            return Err(anyhow!("stop must not be empty"));
        }
        self.model.validate()
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(anyhow!("model.temperature must be within 0.0..=2.0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("model.output_limit_bytes must be > 0"));
        }
        match self.backend {
            ModelBackend::Openai => {
                if self.name.trim().is_empty() {
                    return Err(anyhow!("model.name must not be empty"));
                }
                if self.base_url.trim().is_empty() {
                    return Err(anyhow!("model.base_url must not be empty"));
                }
                if self.api_key_env.trim().is_empty() {
                    return Err(anyhow!("model.api_key_env must not be empty"));
                }
            }
            ModelBackend::Command => {
                if self.command.is_empty() || self.command[0].trim().is_empty() {
                    return Err(anyhow!("model.command must be a non-empty array"));
                }
            }
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AgentConfig::default()`.
pub fn load_config(path: &Path) -> Result<AgentConfig> {
    if !path.exists() {
        let cfg = AgentConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AgentConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AgentConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
