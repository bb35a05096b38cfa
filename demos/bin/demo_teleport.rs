//! Quantum Teleportation Demo
//!
//! Teleports a prepared qubit many times and verifies every run by
//! uncomputing the preparation on the receiving qubit.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kvant_demos::teleport::{DEFAULT_ANGLE, TrialSummary, record_trial, run_trial};
use kvant_demos::{
    create_progress_bar, print_failure, print_header, print_info, print_result, print_section,
    print_success,
};
use kvant_sim::{RecordedEvent, Simulator, SimulatorConfig};

#[derive(Parser, Debug)]
#[command(name = "demo-teleport")]
#[command(about = "Demonstrate quantum teleportation with uncompute verification")]
struct Args {
    /// Number of teleportation trials
    #[arg(short = 'n', long, default_value = "100")]
    trials: u64,

    /// Rz angle used to prepare the teleported state
    #[arg(short, long, default_value_t = DEFAULT_ANGLE)]
    angle: f64,

    /// RNG seed (overrides config file and KVANT_SEED)
    #[arg(short, long)]
    seed: Option<u64>,

    /// YAML simulator configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the circuit of one trial
    #[arg(long)]
    show_circuit: bool,

    /// Emit results as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    angle: f64,
    seed: Option<u64>,
    summary: &'a TrialSummary,
    verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    circuit: Option<Vec<RecordedEvent>>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut config = SimulatorConfig::load(args.config.as_deref())
        .context("failed to load simulator configuration")?;
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let circuit = if args.show_circuit {
        let (_, recorder) = record_trial(config.clone(), args.angle)
            .context("recorded teleportation trial failed")?;
        Some(recorder)
    } else {
        None
    };

    let mut sim =
        Simulator::with_config(config.clone()).context("invalid simulator configuration")?;
    let mut summary = TrialSummary::default();

    let pb = (!args.json).then(|| create_progress_bar(args.trials, "teleporting"));
    for _ in 0..args.trials {
        let result = run_trial(&mut sim, args.angle);
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Trial failed");
        }
        summary.record(&result);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let verified = summary.all_outcomes_verified();

    if args.json {
        let report = Report {
            angle: args.angle,
            seed: config.seed,
            summary: &summary,
            verified,
            circuit: circuit.map(|r| r.events()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_header("Quantum Teleportation Demo");

        print_section("Setup");
        print_result("Trials", args.trials);
        print_result("Prepared state", format!("Rz({}) H |0⟩", args.angle));
        print_result(
            "Seed",
            config
                .seed
                .map_or_else(|| "entropy".to_string(), |s| s.to_string()),
        );

        if let Some(recorder) = &circuit {
            print_section("Circuit (one trial)");
            for line in recorder.render().lines() {
                println!("  {line}");
            }
        }

        print_section("Outcomes");
        for (m0, row) in summary.counts.iter().enumerate() {
            for (m1, count) in row.iter().enumerate() {
                print_result(&format!("m0={m0} m1={m1}"), count);
            }
        }
        print_result("Failures", summary.failures);

        println!();
        if verified {
            print_success("Bob's qubit uncomputed to |0⟩ for every outcome");
        } else if summary.failures > 0 {
            print_failure("Uncomputation failed; teleportation is broken");
        } else {
            print_info("Not every outcome occurred; run more trials");
        }
    }

    if summary.failures > 0 {
        anyhow::bail!("{} of {} trials failed", summary.failures, summary.trials);
    }
    Ok(())
}
