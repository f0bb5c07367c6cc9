pub mod benchmark;
pub mod compose;
pub mod er;
pub mod scan;
pub mod stc;

use clap::Args;
use readout_core::{ReadoutError, RelaxationParams};

/// Transition times shared by every physics subcommand.
#[derive(Args, Debug, Clone, Copy)]
pub struct RelaxationArgs {
    /// Mean tunnel-out time of the excited state, in seconds.
    #[arg(long)]
    pub out_time_excited: f64,
    /// Mean tunnel-out time of the ground state, in seconds.
    #[arg(long)]
    pub out_time_ground: f64,
    /// Spin relaxation time, in seconds.
    #[arg(long)]
    pub relax_time: f64,
}

impl RelaxationArgs {
    pub fn params(&self) -> Result<RelaxationParams, ReadoutError> {
        RelaxationParams::new(self.out_time_excited, self.out_time_ground, self.relax_time)
    }
}
