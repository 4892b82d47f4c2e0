use clap::{Parser, ValueEnum};
use itertools::Itertools;
use keiro::prelude::*;
use std::fs;
use std::time::Instant;

/// CLI-facing scheduling policy for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyCli {
    Eager,
    WaitForParents,
}

impl From<PolicyCli> for SchedulingPolicy {
    fn from(policy: PolicyCli) -> Self {
        match policy {
            PolicyCli::Eager => SchedulingPolicy::Eager,
            PolicyCli::WaitForParents => SchedulingPolicy::WaitForParents,
        }
    }
}

/// Evaluate a decision graph request file and print the response
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the request JSON file ({"content": {...}, "context": {...}})
    request_path: String,
    /// Scheduling policy for multi-parent nodes
    #[arg(long, value_enum, default_value_t = PolicyCli::Eager)]
    policy: PolicyCli,
    /// Pretty-print the response JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> keiro::prelude::Result<()> {
    let cli = Cli::parse();

    let body = fs::read_to_string(&cli.request_path)?;
    let engine = Engine::new().scheduling(cli.policy.into());

    let started = Instant::now();
    let response = engine.evaluate_json(&body)?;
    let wall = started.elapsed();

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{rendered}");

    eprintln!(
        "Visited nodes: {}",
        response.trace.keys().sorted().join(", ")
    );
    eprintln!("Engine time: {} (wall: {:.2?})", response.performance, wall);

    Ok(())
}
