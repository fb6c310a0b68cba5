use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use sched_sim::{
    Algorithm,
    core::{ProcessSet, Ticks},
    scheduler::DEFAULT_QUANTUM,
    sim::{self, WorkloadSpec, workload},
};
use tracing_subscriber::EnvFilter;

/// Simulate FCFS, SJF or Round-Robin scheduling over a batch of processes.
#[derive(Debug, Parser)]
#[command(name = "sched-sim", version)]
struct Args {
    /// Scheduling discipline
    #[arg(value_parser = ["fcfs", "sjf", "rr"])]
    algorithm: String,

    /// Round-Robin time quantum
    #[arg(short, long, default_value_t = DEFAULT_QUANTUM)]
    quantum: Ticks,

    /// File of `pid arrival burst` lines; stdin when omitted
    #[arg(short, long, conflicts_with = "generate")]
    input: Option<PathBuf>,

    /// Generate a random workload spanning this many ticks instead
    #[arg(long)]
    generate: Option<Ticks>,

    /// Seed for --generate
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let algorithm = Algorithm::parse(&args.algorithm, args.quantum)?;
    let processes = load_processes(&args)?;

    let report = sim::simulate(algorithm, processes)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn load_processes(args: &Args) -> Result<ProcessSet> {
    if let Some(ticks) = args.generate {
        let spec = WorkloadSpec {
            ticks,
            seed: args.seed,
            ..WorkloadSpec::default()
        };
        return Ok(workload::bernoulli(&spec)?);
    }

    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading processes from stdin")?;
            buf
        }
    };

    Ok(sim::parse_processes(&text)?)
}
