use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use commands::{
    benchmark::{self, BenchmarkArgs},
    compose::{self, ComposeArgs},
    er::{self, ErArgs},
    scan::{self, ScanArgs},
    stc::{self, OptimalTimeArgs, StcArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "readout-sim", about = "Single-shot qubit readout fidelity CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Readout window maximising the state-to-charge visibility.
    OptimalTime(OptimalTimeArgs),
    /// State-to-charge fidelities at a given or optimised window.
    Stc(StcArgs),
    /// Electrical readout threshold sweep.
    Er(ErArgs),
    /// Compose state-to-charge and electrical readout fidelities.
    Compose(ComposeArgs),
    /// Run the end-to-end benchmark described by a configuration file.
    Benchmark(BenchmarkArgs),
    /// Benchmark a configuration over a log-spaced range of windows.
    Scan(ScanArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    match cli.command {
        Command::OptimalTime(args) => stc::run_optimal_time(&args),
        Command::Stc(args) => stc::run(&args),
        Command::Er(args) => er::run(&args),
        Command::Compose(args) => compose::run(&args),
        Command::Benchmark(args) => benchmark::run(&args),
        Command::Scan(args) => scan::run(&args),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", readout_fid::serde::to_pretty_json(value)?);
    Ok(())
}

fn write_json<P: AsRef<Path>, T: serde::Serialize>(
    path: P,
    value: &T,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    let json = readout_fid::serde::to_pretty_json(value)?;
    fs::write(path, json)?;
    Ok(())
}
