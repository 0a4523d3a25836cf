//! `react-agent`: answer a question with a ReAct loop.
//!
//! The model proposes actions, local tools execute them, and the observations
//! are fed back until the model gives a final answer or the iteration budget
//! runs out.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use react_agent::agent::{LoopConfig, LoopStop, RunOutcome, run_agent};
use react_agent::callbacks::{AgentCallbacks, ConsoleCallbacks, NoopCallbacks};
use react_agent::core::types::{LoopPhase, Step};
use react_agent::exit_codes;
use react_agent::io::config::{AgentConfig, DEFAULT_CONFIG_FILE, load_config, write_config};
use react_agent::io::model::ConfiguredModel;
use react_agent::io::prompt::PromptRenderer;
use react_agent::logging;
use react_agent::tools::builtin_registry;

#[derive(Parser)]
#[command(
    name = "react-agent",
    version,
    about = "Answer a question with a ReAct (reason + act) agent loop"
)]
struct Cli {
    /// Path to the TOML config file (defaults apply when it does not exist).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the agent loop until a final answer or the iteration limit.
    Run {
        /// Question to answer (overrides `question` in the config).
        #[arg(short, long)]
        question: Option<String>,
        /// Maximum number of model calls (overrides `max_iterations`).
        #[arg(long)]
        max_iterations: Option<u32>,
        /// Do not print the prompt / response trace.
        #[arg(long)]
        quiet: bool,
        /// Print the run outcome as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Print the initial prompt without calling the model.
    Prompt {
        #[arg(short, long)]
        question: Option<String>,
    },
    /// List the registered tools.
    Tools,
    /// Write the default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

/// JSON shape of `react-agent run --json`.
#[derive(Serialize)]
struct RunReport<'a> {
    question: &'a str,
    iterations: u32,
    finished: bool,
    phase: LoopPhase,
    return_value: Option<&'a str>,
    error: Option<String>,
    steps: &'a [Step],
}

impl<'a> From<&'a RunOutcome> for RunReport<'a> {
    fn from(outcome: &'a RunOutcome) -> Self {
        Self {
            question: &outcome.question,
            iterations: outcome.iterations,
            finished: outcome.return_value().is_some(),
            phase: outcome.phase,
            return_value: outcome.return_value(),
            error: outcome.error().map(ToString::to_string),
            steps: &outcome.steps,
        }
    }
}

fn main() {
    logging::init();
    // A missing .env file is fine; the credential may already be exported.
    dotenv::dotenv().ok();

    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            question,
            max_iterations,
            quiet,
            json,
        } => cmd_run(&cli.config, question, max_iterations, quiet, json),
        Command::Prompt { question } => cmd_prompt(&cli.config, question),
        Command::Tools => cmd_tools(),
        Command::Init { force } => cmd_init(&cli.config, force),
    }
}

fn cmd_run(
    config_path: &Path,
    question: Option<String>,
    max_iterations: Option<u32>,
    quiet: bool,
    json: bool,
) -> Result<i32> {
    let mut cfg = load_config(config_path)?;
    if let Some(question) = question {
        cfg.question = question;
    }
    if let Some(max_iterations) = max_iterations {
        cfg.max_iterations = max_iterations;
    }
    cfg.validate()?;

    let tools = builtin_registry()?;
    let model = ConfiguredModel::from_config(&cfg.model).context("configure model")?;
    let callbacks: &dyn AgentCallbacks = if quiet || json {
        &NoopCallbacks
    } else {
        &ConsoleCallbacks
    };

    let outcome = run_agent(
        &cfg.question,
        &model,
        &tools,
        callbacks,
        &LoopConfig::from(&cfg),
    )?;

    if json {
        let report = serde_json::to_string_pretty(&RunReport::from(&outcome))
            .context("serialize run outcome")?;
        println!("{report}");
    }

    match &outcome.stop {
        LoopStop::Finished { return_value } => {
            if !json {
                println!("{return_value}");
            }
            Ok(exit_codes::OK)
        }
        LoopStop::Failed(err) => {
            eprintln!(
                "run failed after {} iteration(s): {err}",
                outcome.iterations
            );
            let transcript = outcome.transcript();
            if !transcript.is_empty() {
                eprintln!("--- transcript ---\n{}", transcript.trim_end());
            }
            Ok(exit_codes::NO_ANSWER)
        }
    }
}

fn cmd_prompt(config_path: &Path, question: Option<String>) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let question = question.unwrap_or(cfg.question);
    let tools = builtin_registry()?;
    let prompt = PromptRenderer::new()?.render(&question, &[], &tools)?;
    println!("{prompt}");
    Ok(exit_codes::OK)
}

fn cmd_tools() -> Result<i32> {
    let tools = builtin_registry()?;
    for tool in tools.iter() {
        println!("{}: {}", tool.name(), tool.description());
    }
    Ok(exit_codes::OK)
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &AgentConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("wrote {}", config_path.display());
    Ok(exit_codes::OK)
}
