//! Language model backed by an external command.
//!
//! The prompt is written to the command's stdin and its stdout is taken as the
//! completion. Local runners (`ollama run <model>`, `llm -m <model>`) fit this
//! shape. Such commands know nothing about stop markers, so the completion is
//! cut at the marker here.

use std::process::Command;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument, warn};

use crate::core::stop::truncate_at_stop;
use crate::io::config::ModelConfig;
use crate::io::model::{CompletionRequest, LanguageModel};
use crate::io::process::run_command_with_timeout;

#[derive(Debug, Clone)]
pub struct CommandModel {
    program: String,
    args: Vec<String>,
    output_limit_bytes: usize,
}

impl CommandModel {
    pub fn new(command: &[String], output_limit_bytes: usize) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .ok_or_else(|| anyhow!("model command must not be empty"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            output_limit_bytes,
        })
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Self::new(&config.command, config.output_limit_bytes)
    }
}

impl LanguageModel for CommandModel {
    #[instrument(
        skip_all,
        fields(program = %self.program, timeout_secs = request.timeout.as_secs())
    )]
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        info!("starting model command");
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        let output = run_command_with_timeout(
            cmd,
            Some(request.prompt.as_bytes()),
            request.timeout,
            self.output_limit_bytes,
        )
        .with_context(|| format!("run model command {}", self.program))?;

        if output.timed_out {
            warn!("model command timed out");
            return Err(anyhow!(
                "model command {} timed out after {:?}",
                self.program,
                request.timeout
            ));
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(exit_code = ?output.status.code(), "model command failed");
            return Err(anyhow!(
                "model command {} failed with status {:?}: {}",
                self.program,
                output.status.code(),
                stderr.trim()
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let completion = truncate_at_stop(&text, &request.stop);
        // Output dropped past the stop marker would have been cut anyway.
        if output.stdout_truncated > 0 && completion.len() == text.len() {
            warn!(
                stdout_truncated = output.stdout_truncated,
                "model output exceeded limit"
            );
            return Err(anyhow!(
                "model command {} output exceeded {} bytes ({} bytes dropped)",
                self.program,
                self.output_limit_bytes,
                output.stdout_truncated
            ));
        }
        let completion = completion.to_string();
        debug!(bytes = completion.len(), "model command completed");
        Ok(completion)
    }
}
