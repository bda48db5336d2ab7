//! Headless commands that run without entering the TUI.

use std::time::Duration;

use clap::Subcommand;
use serde_json::{Value, json};

use crate::planner::Planner;
use crate::settings::Settings;

const SCHEMA_VERSION: &str = "cli.v1";

#[derive(Debug, Clone, Subcommand)]
pub enum RootCommand {
    /// Decompose a goal into tasks and print them without starting the TUI
    Plan {
        /// The goal to break down, given as one or more words
        goal: Vec<String>,
    },
}

pub fn run(command: RootCommand, settings: &Settings, json_output: bool) -> i32 {
    match execute(command, settings) {
        Ok(output) => {
            print_success(output, json_output);
            0
        }
        Err(err) => {
            print_error(&err, json_output);
            err.exit_code
        }
    }
}

#[derive(Debug)]
struct CommandOutput {
    command: &'static str,
    data: Value,
    text: String,
}

#[derive(Debug)]
struct CliError {
    exit_code: i32,
    code: &'static str,
    message: String,
}

type CliResult<T> = Result<T, CliError>;

fn execute(command: RootCommand, settings: &Settings) -> CliResult<CommandOutput> {
    match command {
        RootCommand::Plan { goal } => plan(settings, &goal.join(" ")),
    }
}

fn plan(settings: &Settings, goal: &str) -> CliResult<CommandOutput> {
    let goal = goal.trim();
    if goal.is_empty() {
        return Err(CliError {
            exit_code: 2,
            code: "GOAL_REQUIRED",
            message: "a non-empty goal is required".to_string(),
        });
    }

    let planner = Planner::new(
        settings.planner_model.clone(),
        Duration::from_millis(settings.plan_timeout_ms),
    );
    let tasks = planner.generate_plan(goal);

    let text = tasks
        .iter()
        .map(|task| format!("- {task}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(CommandOutput {
        command: "plan",
        data: json!({ "goal": goal, "tasks": tasks }),
        text,
    })
}

fn print_success(output: CommandOutput, json_output: bool) {
    if json_output {
        let envelope = json!({
            "schema": SCHEMA_VERSION,
            "ok": true,
            "command": output.command,
            "data": output.data,
        });
        println!("{envelope}");
    } else {
        println!("{}", output.text);
    }
}

fn print_error(err: &CliError, json_output: bool) {
    if json_output {
        let envelope = json!({
            "schema": SCHEMA_VERSION,
            "ok": false,
            "error": { "code": err.code, "message": err.message },
        });
        println!("{envelope}");
    } else {
        eprintln!("error[{}]: {}", err.code, err.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_rejects_an_empty_goal() {
        let err = plan(&Settings::default(), "   ").expect_err("empty goal should fail");
        assert_eq!(err.exit_code, 2);
        assert_eq!(err.code, "GOAL_REQUIRED");
    }

    #[test]
    fn plan_produces_listed_tasks() {
        // No API key in the test environment, so this exercises the
        // offline fallback path.
        let output = plan(&Settings::default(), "launch the site").expect("plan should succeed");
        assert_eq!(output.command, "plan");
        assert!(output.text.lines().all(|line| line.starts_with("- ")));
        let tasks = output.data["tasks"].as_array().expect("tasks array");
        assert!(!tasks.is_empty());
        assert!(tasks.len() <= 5);
    }
}
