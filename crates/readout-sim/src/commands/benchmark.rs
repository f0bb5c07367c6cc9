use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::info;
use readout_fid::{benchmark, load_config};

use crate::{print_json, write_json};

#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// YAML or JSON readout configuration.
    #[arg(long)]
    pub config: PathBuf,
    /// Directory receiving `report.json`; stdout when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &BenchmarkArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(&args.config)?;
    let report = benchmark(&config)?;
    match &args.out {
        Some(dir) => {
            let path = dir.join("report.json");
            write_json(&path, &report)?;
            info!("wrote {}", path.display());
            Ok(())
        }
        None => print_json(&report),
    }
}
