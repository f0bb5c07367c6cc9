use std::error::Error;

use clap::Args;
use readout_stc::StcOptimiser;

use super::RelaxationArgs;
use crate::print_json;

#[derive(Args, Debug)]
pub struct OptimalTimeArgs {
    #[command(flatten)]
    pub relaxation: RelaxationArgs,
}

#[derive(Args, Debug)]
pub struct StcArgs {
    #[command(flatten)]
    pub relaxation: RelaxationArgs,
    /// Readout window in seconds; the optimum when omitted.
    #[arg(long)]
    pub readout_time: Option<f64>,
}

pub fn run_optimal_time(args: &OptimalTimeArgs) -> Result<(), Box<dyn Error>> {
    let optimum = StcOptimiser::new(&args.relaxation.params()?)?.optimum()?;
    print_json(&optimum)
}

pub fn run(args: &StcArgs) -> Result<(), Box<dyn Error>> {
    let evaluation = StcOptimiser::new(&args.relaxation.params()?)?.evaluate(args.readout_time)?;
    print_json(&serde_json::json!({
        "readout_time": evaluation.readout_time,
        "optimised": evaluation.optimised,
        "f0": evaluation.fidelity.f0,
        "f1": evaluation.fidelity.f1,
        "visibility": evaluation.fidelity.visibility(),
    }))
}
