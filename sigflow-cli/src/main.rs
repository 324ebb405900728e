//! Command-line runner for `.sim` files: load, run for a horizon, print the
//! recorded scope traces.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sigflow_core::block::Block;
use tracing_subscriber::EnvFilter;

use error::{CliError, Result};

#[derive(Parser)]
#[command(name = "sigflow", about = "Run discrete-time signal-flow simulations")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a `.sim` file and run it for its declared (or overridden) horizon.
    Run(RunArgs),
    /// Load a `.sim` file and re-save it, exercising the round-trip path.
    Save(SaveArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Path to the `.sim` file to load.
    file: PathBuf,

    /// Override the file's `TIME` horizon.
    #[arg(long)]
    horizon: Option<f64>,

    /// Override the fixed-point iteration cap (default 20).
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Override the fixed-point convergence tolerance (default 1e-6).
    #[arg(long)]
    tolerance: Option<f64>,
}

#[derive(Parser)]
struct SaveArgs {
    /// Path to the `.sim` file to load.
    input: PathBuf,
    /// Path to write the re-serialized `.sim` file to.
    output: PathBuf,
    /// Horizon to record in the output file's `TIME` line.
    #[arg(long)]
    horizon: f64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::Save(args) => save(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut loaded = sigflow_fmt::load_simulation_from_file(&args.file)?;

    let mut config = loaded.simulation.config();
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = max_iterations;
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    loaded.simulation.set_config(config);

    let horizon = args
        .horizon
        .or(loaded.horizon)
        .ok_or_else(|| CliError::NoHorizon(args.file.display().to_string()))?;

    let trace = loaded.simulation.run(horizon)?;
    print_scope_traces(&loaded.simulation, &trace);
    Ok(())
}

fn save(args: SaveArgs) -> Result<()> {
    let loaded = sigflow_fmt::load_simulation_from_file(&args.input)?;
    sigflow_fmt::save(&loaded.simulation, &args.output, args.horizon)?;
    Ok(())
}

fn print_scope_traces(sim: &sigflow_core::Simulation, trace: &sigflow_core::Trace) {
    let scopes: Vec<(usize, &str)> = sim
        .blocks()
        .iter()
        .enumerate()
        .filter_map(|(idx, block)| match block {
            Block::Scope(scope) => Some((idx, scope.label.as_str())),
            _ => None,
        })
        .collect();

    print!("time");
    for (_, label) in &scopes {
        print!("\t{label}");
    }
    println!();

    for (tick, &t) in trace.time.iter().enumerate() {
        print!("{t}");
        for (idx, _) in &scopes {
            print!("\t{}", trace.samples[*idx][tick]);
        }
        println!();
    }
}
