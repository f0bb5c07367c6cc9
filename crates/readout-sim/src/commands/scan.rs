use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use readout_fid::{load_config, log_spaced_times, scan_readout_times};

use crate::{print_json, write_json};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// YAML or JSON readout configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Shortest window in seconds.
    #[arg(long)]
    pub from: f64,
    /// Longest window in seconds.
    #[arg(long)]
    pub to: f64,
    /// Number of log-spaced windows.
    #[arg(long, default_value_t = 16)]
    pub steps: usize,
    /// Directory receiving `scan.json`; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &ScanArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let times = log_spaced_times(args.from, args.to, args.steps)?;
    let scan = scan_readout_times(&config, &times)?;
    let best = scan.best().ok_or("scan produced no reports")?;
    info!(
        "best window {:e} s with F_M={:.6}",
        best.readout_time, best.overall.f_m
    );
    match &args.out {
        Some(dir) => {
            write_json(dir.join("scan.json"), &scan)?;
            Ok(())
        }
        None => print_json(&scan),
    }
}
