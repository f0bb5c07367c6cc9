#![deny(missing_docs)]
#![doc = "State-to-charge conversion: exponential transition statistics, readout window optimisation and per-class STC fidelities."]

/// Per-class fidelities and the optimiser front end.
pub mod fidelity;
/// Closed-form and bisection readout window optimisation.
pub mod optimise;
/// Exponential transition probabilities.
pub mod relaxation;

pub use fidelity::{stc_fidelity, StcEvaluation, StcFidelityPair, StcOptimiser};
pub use optimise::{
    closed_form_read_time, optimal_read_time, optimise_read_time, BisectionOpts, OptimumSource,
    ReadTimeOptimum,
};
pub use relaxation::RelaxationModel;
