//! `vehiclectl` – command-line harness for the vehicle controller engine.
//!
//! Drives the same engine the tests drive: one-shot command sequences,
//! an interactive prompt, YAML scenarios, and a socket daemon.

mod config;
mod logging;
mod serve;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use vehicle_engine::scenario::{load_scenario, run_scenario};
use vehicle_engine::types::*;
use vehicle_engine::{Controller, Dispatcher, VehicleSnapshot};

// ===========================================================================
// CLI definition
// ===========================================================================

#[derive(Parser)]
#[command(
    name = "vehiclectl",
    version,
    about = "Drive the vehicle controller from the command line"
)]
struct Cli {
    /// Configuration file (YAML). Defaults to ./vehiclectl.yaml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply command tags in order to a fresh vehicle and print the result.
    Call {
        /// Command tags (e.g. UNLOCK LEFT_DOOR_LOCK). Case-insensitive.
        #[arg(required = true)]
        tags: Vec<String>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },

    /// List every command tag.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactive prompt: type command tags, STATE to inspect, EXIT to leave.
    Repl,

    /// Run a scripted scenario from a YAML file.
    RunScenario {
        /// Path to the scenario YAML file.
        file: PathBuf,
        /// Directory for artifacts output.
        #[arg(long)]
        artifacts: Option<PathBuf>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Start daemon mode over a Unix socket.
    Serve {
        /// Path for the Unix domain socket.
        #[arg(long)]
        socket: PathBuf,
    },
}

// ===========================================================================
// Main
// ===========================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let cfg = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: cannot load configuration: {}", e);
            std::process::exit(2);
        }
    };
    logging::init_logging(&cfg.logging);

    let dispatcher = Dispatcher::new().case_insensitive(true);
    let output = &cfg.output;

    match cli.command {
        Commands::Call {
            tags,
            json,
            artifacts,
        } => cmd_call(
            &tags,
            json || output.json,
            artifacts.or_else(|| output.artifacts_dir.clone()),
            &dispatcher,
        ),
        Commands::List { json } => cmd_list(json || output.json, &dispatcher),
        Commands::Repl => cmd_repl(&dispatcher),
        Commands::RunScenario {
            file,
            artifacts,
            json,
        } => cmd_run_scenario(
            &file,
            json || output.json,
            artifacts.or_else(|| output.artifacts_dir.clone()),
            &dispatcher,
        ),
        Commands::Serve { socket } => {
            if let Err(e) = serve::run_daemon(&socket, dispatcher).await {
                eprintln!("error: daemon on {} failed: {}", socket.display(), e);
                std::process::exit(2);
            }
        }
    }
}

// ===========================================================================
// Subcommand implementations
// ===========================================================================

fn cmd_call(tags: &[String], json: bool, artifacts: Option<PathBuf>, dispatcher: &Dispatcher) {
    // An ad-hoc scenario without expectations.
    let scenario = Scenario {
        name: None,
        steps: tags
            .iter()
            .map(|t| {
                ScenarioStep::Command(CommandStep {
                    command: t.clone(),
                    expect_status: None,
                })
            })
            .collect(),
    };
    let mut controller = Controller::new();
    let result = run_scenario(&scenario, dispatcher, &mut controller);

    if let Some(ref dir) = artifacts {
        write_artifacts(dir, &result);
    }
    output_scenario(&result, json);
}

fn cmd_list(json: bool, dispatcher: &Dispatcher) {
    let names = dispatcher.list();
    if json {
        println!("{}", serde_json::to_string_pretty(&names).unwrap_or_default());
    } else {
        for name in names {
            println!("{}", name);
        }
    }
}

fn cmd_repl(dispatcher: &Dispatcher) {
    let mut controller = Controller::new();
    println!("vehiclectl – type a command tag, STATE, LIST or EXIT");

    loop {
        let line = match dialoguer::Input::<String>::new()
            .with_prompt("vehicle")
            .interact_text()
        {
            Ok(l) => l,
            // end of input or no terminal
            Err(_) => break,
        };

        match line.trim().to_ascii_uppercase().as_str() {
            "EXIT" | "QUIT" => break,
            "STATE" => print_state(&controller.snapshot()),
            "LIST" | "HELP" => println!("{}", dispatcher.list().join(" ")),
            tag => print_step(&dispatcher.execute(tag, &mut controller)),
        }
    }
}

fn cmd_run_scenario(
    file: &Path,
    json: bool,
    artifacts: Option<PathBuf>,
    dispatcher: &Dispatcher,
) {
    let yaml = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::IoError,
                format!("cannot read scenario file: {}", e),
            );
            output_error(&r, json);
        }
    };

    let scenario = match load_scenario(&yaml) {
        Ok(s) => s,
        Err(e) => {
            let r = result_err(
                "run-scenario",
                &file.display().to_string(),
                &new_run_id(),
                0,
                ErrorCode::InvalidInput,
                e.to_string(),
            );
            output_error(&r, json);
        }
    };

    let mut controller = Controller::new();
    let result = run_scenario(&scenario, dispatcher, &mut controller);

    if let Some(ref dir) = artifacts {
        write_artifacts(dir, &result);
    }
    output_scenario(&result, json);
}

// ===========================================================================
// Output helpers
// ===========================================================================

fn exit_code(status: Status) -> i32 {
    match status {
        Status::Pass | Status::Skip => 0,
        Status::Fail => 1,
        Status::Error => 2,
    }
}

fn output_scenario(result: &ScenarioResult, json: bool) {
    if json {
        let j = serde_json::to_string_pretty(result).unwrap_or_default();
        println!("{}", j);
    } else {
        if let Some(ref name) = result.name {
            println!("Scenario: {}", name);
            println!("Overall: {}", result.overall_status.as_str().to_uppercase());
        }
        for step in &result.step_results {
            print_step(step);
        }
        print_state(&result.final_state);
    }

    let code = exit_code(result.overall_status);
    if code != 0 {
        std::process::exit(code);
    }
}

fn output_error(result: &CommandResult, json: bool) -> ! {
    if json {
        let j = serde_json::to_string_pretty(result).unwrap_or_default();
        println!("{}", j);
    } else {
        print_step(result);
    }
    std::process::exit(exit_code(result.status).max(1))
}

fn print_step(r: &CommandResult) {
    let status_icon = match r.status {
        Status::Pass => "PASS",
        Status::Fail => "FAIL",
        Status::Skip => "SKIP",
        Status::Error => "ERROR",
    };

    match r.error {
        Some(ref err) => println!("[{}] {} – {}", status_icon, r.target, err.message),
        None => println!("[{}] {}", status_icon, r.target),
    }
}

fn print_state(s: &VehicleSnapshot) {
    println!("  speed:   {}", s.speed);
    println!("  engine:  {}", if s.engine_on { "ON" } else { "OFF" });
    println!(
        "  vehicle: {}",
        if s.vehicle_locked { "LOCKED" } else { "UNLOCKED" }
    );
    println!("  left:    {} / {}", s.left_door, s.left_door_lock);
    println!("  right:   {} / {}", s.right_door, s.right_door_lock);
    println!(
        "  trunk:   {}",
        if s.trunk_closed { "CLOSED" } else { "OPEN" }
    );
}

// ===========================================================================
// Artifact helpers
// ===========================================================================

fn write_artifacts(dir: &Path, result: &ScenarioResult) {
    let art_dir = dir.join(new_run_id());
    if let Err(e) = std::fs::create_dir_all(&art_dir) {
        tracing::warn!(dir = %art_dir.display(), error = %e, "failed to create artifacts dir");
        return;
    }

    // result.json
    let j = serde_json::to_string_pretty(result).unwrap_or_default();
    if let Err(e) = std::fs::write(art_dir.join("result.json"), j) {
        tracing::warn!(error = %e, "failed to write result.json");
    }

    // events.jsonl, one line per step
    let mut lines = String::new();
    for step in &result.step_results {
        if let Ok(line) = serde_json::to_string(step) {
            lines.push_str(&line);
            lines.push('\n');
        }
    }
    if let Err(e) = std::fs::write(art_dir.join("events.jsonl"), lines) {
        tracing::warn!(error = %e, "failed to write events.jsonl");
    }
}
