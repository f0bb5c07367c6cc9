use std::error::Error;

use clap::Args;
use readout_core::NoiseParams;
use readout_er::{sweep_thresholds, ErModel, SweepOpts, DEFAULT_THRESHOLD_NUM};

use super::RelaxationArgs;
use crate::print_json;

#[derive(Args, Debug)]
pub struct ErArgs {
    #[command(flatten)]
    pub relaxation: RelaxationArgs,
    /// Readout window in seconds.
    #[arg(long)]
    pub readout_time: f64,
    /// Signal-to-noise ratio of the charge levels.
    #[arg(long)]
    pub snr: f64,
    /// Digitiser sample rate in Hz.
    #[arg(long)]
    pub sample_rate: f64,
    /// Limiting filter cutoff in Hz.
    #[arg(long)]
    pub filter_cutoff: f64,
    /// Number of thresholds in the sweep.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD_NUM)]
    pub threshold_num: usize,
    /// Switch to the transient blip model with this tunnel-in time, in seconds.
    #[arg(long)]
    pub in_time_ground: Option<f64>,
    /// Minimum quadrature panels per axis for the transient model.
    #[arg(long, default_value_t = 24)]
    pub panels: usize,
    /// Print every threshold instead of only the best one.
    #[arg(long)]
    pub full: bool,
}

pub fn run(args: &ErArgs) -> Result<(), Box<dyn Error>> {
    let relaxation = args.relaxation.params()?;
    let noise = NoiseParams::new(
        args.snr,
        args.sample_rate,
        args.filter_cutoff,
        args.readout_time,
    )?;
    let model = match args.in_time_ground {
        Some(in_time_ground) => ErModel::Transient {
            in_time_ground,
            panels: args.panels,
        },
        None => ErModel::Averaged,
    };
    let opts = SweepOpts {
        threshold_num: args.threshold_num,
        model,
    };
    let sweep = sweep_thresholds(&relaxation, &noise, &opts)?;
    if args.full {
        print_json(&sweep)
    } else {
        let best = sweep.best().ok_or("threshold sweep produced no points")?;
        print_json(&serde_json::json!({
            "best_index": sweep.best_index,
            "threshold": best.threshold,
            "f0": best.f0,
            "f1": best.f1,
            "visibility": best.visibility(),
        }))
    }
}
