//! OpenAI-compatible Chat Completions backend.
//!
//! Sends the rendered prompt as a single user message with the stop marker in
//! the `stop` field. The API key is read from the environment variable named
//! by `model.api_key_env` (`OPENAI_API_KEY` by default); `main` loads a local
//! `.env` file before the backend is built.

use std::env;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::stop::truncate_at_stop;
use crate::io::config::ModelConfig;
use crate::io::model::{ChatMessage, CompletionRequest, LanguageModel};

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    stop: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Blocking Chat Completions client.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f64,
}

impl OpenAiChat {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
    ) -> Result<Self> {
        let client = Client::builder().build().context("build http client")?;
        Ok(Self {
            client,
            url: chat_completions_url(base_url),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env).with_context(|| {
            format!(
                "missing {} (set it in the environment or a .env file)",
                config.api_key_env
            )
        })?;
        Self::new(&config.base_url, api_key, &config.name, config.temperature)
    }
}

impl LanguageModel for OpenAiChat {
    #[instrument(skip_all, fields(model = %self.model, timeout_secs = request.timeout.as_secs()))]
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        info!(url = %self.url, "requesting chat completion");
        let body = ChatCompletionBody {
            model: &self.model,
            messages: vec![ChatMessage::user(request.prompt.as_str())],
            temperature: self.temperature,
            stop: vec![request.stop.as_str()],
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .with_context(|| format!("send chat completion request to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            warn!(%status, "chat completion failed");
            bail!("chat completion failed with status {status}: {}", detail.trim());
        }

        let parsed: ChatCompletionResponse =
            response.json().context("parse chat completion response")?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("chat completion returned no choices"))?
            .message
            .content
            .unwrap_or_default();

        // Compatible servers do not all honor `stop`.
        let completion = truncate_at_stop(&content, &request.stop).to_string();
        debug!(bytes = completion.len(), "chat completion received");
        Ok(completion)
    }

    fn chat_messages(&self, prompt: &str) -> Option<Vec<ChatMessage>> {
        Some(vec![ChatMessage::user(prompt)])
    }
}

/// Chat completions endpoint for `base`. Does not append `/v1` when base already ends with it.
fn chat_completions_url(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/chat/completions")
    } else {
        format!("{base}/v1/chat/completions")
    }
}
