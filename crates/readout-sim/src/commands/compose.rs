use std::error::Error;

use clap::Args;
use readout_fid::overall_fidelity;

use crate::print_json;

/// Per-class fidelities of the two stages.
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// STC fidelity of a ground-prepared qubit (the no-event branch).
    #[arg(long)]
    pub f0_stc: f64,
    /// STC fidelity of an excited-prepared qubit (the event branch).
    #[arg(long)]
    pub f1_stc: f64,
    /// ER probability that a charge-neutral trace stays below the threshold.
    #[arg(long)]
    pub f0_er: f64,
    /// ER probability that a tunnel event crosses the threshold.
    #[arg(long)]
    pub f1_er: f64,
}

pub fn run(args: &ComposeArgs) -> Result<(), Box<dyn Error>> {
    let overall = overall_fidelity(args.f0_stc, args.f1_stc, args.f0_er, args.f1_er)?;
    print_json(&overall)
}
