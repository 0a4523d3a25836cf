//! Language-model abstraction for the agent loop.
//!
//! The [`LanguageModel`] trait decouples the control loop from the actual
//! completion backend. Tests use scripted models that return predetermined
//! completions without touching the network.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use crate::io::command_model::CommandModel;
use crate::io::config::{ModelBackend, ModelConfig};
use crate::io::openai::OpenAiChat;

/// Parameters for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Fully rendered prompt.
    pub prompt: String,
    /// Generation must stop before the first occurrence of this marker.
    pub stop: String,
    /// Maximum time to wait for the completion.
    pub timeout: Duration,
}

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Text completion capability consumed by the loop.
pub trait LanguageModel {
    /// Return generated text for `request.prompt`, cut before the first
    /// occurrence of `request.stop`.
    fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Chat messages this model sends for `prompt`, or `None` for plain
    /// text-completion backends.
    fn chat_messages(&self, _prompt: &str) -> Option<Vec<ChatMessage>> {
        None
    }
}

/// Backend chosen by configuration.
pub enum ConfiguredModel {
    OpenAi(OpenAiChat),
    Command(CommandModel),
}

impl ConfiguredModel {
    /// Build the configured backend. The `openai` backend needs its API key
    /// to be present in the environment.
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        match config.backend {
            ModelBackend::Openai => Ok(Self::OpenAi(OpenAiChat::from_config(config)?)),
            ModelBackend::Command => Ok(Self::Command(CommandModel::from_config(config)?)),
        }
    }
}

impl LanguageModel for ConfiguredModel {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        match self {
            Self::OpenAi(model) => model.complete(request),
            Self::Command(model) => model.complete(request),
        }
    }

    fn chat_messages(&self, prompt: &str) -> Option<Vec<ChatMessage>> {
        match self {
            Self::OpenAi(model) => model.chat_messages(prompt),
            Self::Command(model) => model.chat_messages(prompt),
        }
    }
}
