//! Strategic deconfliction CLI.
//!
//! Loads mission scenarios, runs the conflict check, and prints the report.
//!
//! Usage:
//!   deconflict check --primary primary.json --flights flights.json
//!   deconflict demo --threshold 5 --step 1

mod loader;
mod scenarios;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use deconflict_core::{
    check_conflicts_parallel, check_conflicts_with_rules, ConflictReport, Mission, SafetyRules,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Strategic UAV mission deconfliction")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a primary mission against simulated traffic from JSON files
    Check {
        /// Primary mission file
        #[arg(long)]
        primary: PathBuf,

        /// Simulated flights file
        #[arg(long)]
        flights: PathBuf,

        #[command(flatten)]
        opts: CheckOpts,
    },
    /// Run the built-in sample scenario
    Demo {
        #[command(flatten)]
        opts: CheckOpts,
    },
}

#[derive(Args, Debug)]
struct CheckOpts {
    /// Minimum safe distance in meters
    #[arg(long, default_value_t = 10.0)]
    threshold: f64,

    /// Sampling step in seconds
    #[arg(long, default_value_t = 5)]
    step: i64,

    /// Evaluate traffic on the rayon thread pool
    #[arg(long)]
    parallel: bool,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deconflict_cli=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Check {
            primary,
            flights,
            opts,
        } => {
            let primary = loader::load_primary_mission(&primary)?;
            let others = loader::load_simulated_flights(&flights)?;
            run_check(&primary, &others, &opts)
        }
        Command::Demo { opts } => {
            let missions = scenarios::sample_missions(Utc::now())?;
            let (primary, others) = missions
                .split_first()
                .context("sample scenario is empty")?;
            run_check(primary, others, &opts)
        }
    }
}

fn run_check(primary: &Mission, others: &[Mission], opts: &CheckOpts) -> Result<()> {
    let rules = SafetyRules {
        distance_threshold_m: opts.threshold,
        time_step_secs: opts.step,
    };

    tracing::info!(
        "Checking `{}` against {} mission(s) (threshold {}m, step {}s)",
        primary.name(),
        others.len(),
        rules.distance_threshold_m,
        rules.time_step_secs
    );

    let report = if opts.parallel {
        check_conflicts_parallel(primary, others, &rules)
    } else {
        check_conflicts_with_rules(primary, others, &rules)
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &ConflictReport) {
    if report.is_empty() {
        println!("No conflicts detected. Flight plan is clear.");
        return;
    }

    println!("Conflicts detected with {} mission(s):", report.len());
    let mut names: Vec<&String> = report.keys().collect();
    names.sort();
    for name in names {
        let events = &report[name];
        println!(" - {} ({} conflict point(s))", name, events.len());
        for event in events {
            let (x, y, z) = event.location;
            println!(
                "     {}  at ({:.2}, {:.2}, {:.2})",
                event.time.format("%Y-%m-%d %H:%M:%S"),
                x,
                y,
                z
            );
        }
    }
}
