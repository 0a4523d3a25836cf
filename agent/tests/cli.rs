//! CLI tests for `react-agent`.
//!
//! Spawns the binary with the `command` model backend pointed at small shell
//! scripts, so no network access or credentials are needed.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use react_agent::exit_codes;
use react_agent::io::config::{AgentConfig, ModelBackend, ModelConfig, load_config, write_config};

/// Answers with a tool call until the prompt contains the observation, then finishes.
const TWO_STEP_SCRIPT: &str = r#"if grep -q "Observation: 3"; then echo "Final Answer: 3"; else printf 'Thought: count it\nAction: get_text_length\nAction Input: DOG\n'; fi"#;

fn write_command_config(dir: &Path, script: &str) -> std::path::PathBuf {
    let path = dir.join("react-agent.toml");
    let cfg = AgentConfig {
        model: ModelConfig {
            backend: ModelBackend::Command,
            command: vec!["sh".to_string(), "-c".to_string(), script.to_string()],
            ..ModelConfig::default()
        },
        ..AgentConfig::default()
    };
    write_config(&path, &cfg).expect("write config");
    path
}

fn react_agent(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_react-agent"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn react-agent")
}

#[test]
fn run_prints_trace_and_answer() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_command_config(temp.path(), TWO_STEP_SCRIPT);

    let output = react_agent(temp.path(), &["run"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(exit_codes::OK), "{stdout}");
    assert!(stdout.contains("***Prompt to LLM was:***"));
    assert!(stdout.contains("=== agent_step 1 answer ==="));
    assert!(stdout.contains("observation=\"3\""));
    assert!(stdout.trim_end().ends_with('3'));
}

#[test]
fn run_json_reports_steps() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_command_config(temp.path(), TWO_STEP_SCRIPT);

    let output = react_agent(temp.path(), &["run", "--json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(report["finished"], true);
    assert_eq!(report["phase"], "finished");
    assert_eq!(report["return_value"], "3");
    assert_eq!(report["iterations"], 2);
    assert_eq!(report["steps"][0]["action"]["tool"], "get_text_length");
    assert_eq!(report["steps"][0]["observation"], "3");
}

#[test]
fn run_without_final_answer_exits_with_no_answer_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_command_config(temp.path(), "cat >/dev/null; echo 'garbage text'");

    let output = react_agent(temp.path(), &["run", "--quiet"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(exit_codes::NO_ANSWER));
    assert!(stderr.contains("missing 'Action:'"), "{stderr}");
}

#[test]
fn run_respects_max_iterations_flag() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_command_config(
        temp.path(),
        "cat >/dev/null; printf 'Action: get_text_length\\nAction Input: DOG\\n'",
    );

    let output = react_agent(temp.path(), &["run", "--quiet", "--max-iterations", "2"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(exit_codes::NO_ANSWER));
    assert!(stderr.contains("no final answer after 2 iterations"), "{stderr}");
    assert!(stderr.contains("--- transcript ---"));
}

#[test]
fn failing_model_command_exits_invalid() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_command_config(temp.path(), "cat >/dev/null; exit 7");

    let output = react_agent(temp.path(), &["run", "--quiet"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
}

#[test]
fn prompt_renders_question_offline() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = react_agent(temp.path(), &["prompt", "--question", "How long is FISH?"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout.contains("Question: How long is FISH?"));
    assert!(stdout.contains("[get_text_length]"));
}

#[test]
fn tools_lists_builtin_tools() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = react_agent(temp.path(), &["tools"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout.trim(),
        "get_text_length: Returns the length of a text by characters"
    );
}

#[test]
fn init_writes_default_config_once() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = react_agent(temp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let path = temp.path().join("react-agent.toml");
    assert_eq!(load_config(&path).expect("load"), AgentConfig::default());

    fs::write(&path, "max_iterations = 3\n").expect("edit");
    let output = react_agent(temp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert_eq!(load_config(&path).expect("load").max_iterations, 3);

    let output = react_agent(temp.path(), &["init", "--force"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load").max_iterations, 5);
}
