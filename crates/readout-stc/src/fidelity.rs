use log::debug;
use readout_core::{validate, ReadoutError, ReadoutTime, RelaxationParams};
use serde::{Deserialize, Serialize};

use crate::optimise::{optimise_read_time, BisectionOpts, OptimumSource, ReadTimeOptimum};
use crate::relaxation::RelaxationModel;

/// Per-class state-to-charge fidelities for one readout window.
///
/// `f1` is the no-event branch: the probability that no tunnel event is
/// registered, governed by `out_time_ground`. It starts at one for an empty
/// window and decays towards zero. `f0` is the event branch: the probability
/// that the excited state produces a tunnel event, zero for an empty window
/// and approaching one for long windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StcFidelityPair {
    /// Event-branch fidelity.
    pub f0: f64,
    /// No-event-branch fidelity.
    pub f1: f64,
}

impl StcFidelityPair {
    /// Contrast `f0 + f1 - 1`, the optimisation objective.
    pub fn visibility(&self) -> f64 {
        self.f0 + self.f1 - 1.0
    }
}

/// STC evaluation at a resolved readout window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StcEvaluation {
    /// Window at which the fidelities were evaluated.
    pub readout_time: ReadoutTime,
    /// Set when the window came from the optimiser rather than the caller.
    pub optimised: Option<OptimumSource>,
    /// Fidelities at the window.
    pub fidelity: StcFidelityPair,
}

/// State-to-charge optimiser bound to one set of transition times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StcOptimiser {
    model: RelaxationModel,
    bisection: BisectionOpts,
}

impl StcOptimiser {
    /// Validates the transition times and builds the optimiser.
    pub fn new(params: &RelaxationParams) -> Result<Self, ReadoutError> {
        Ok(Self {
            model: RelaxationModel::new(params)?,
            bisection: BisectionOpts::default(),
        })
    }

    /// Overrides the bisection fallback bounds.
    pub fn with_bisection(mut self, bisection: BisectionOpts) -> Self {
        self.bisection = bisection;
        self
    }

    /// Window maximising the STC visibility.
    pub fn optimum(&self) -> Result<ReadTimeOptimum, ReadoutError> {
        optimise_read_time(self.model.params(), &self.bisection)
    }

    /// Fidelities at an arbitrary non-negative window.
    pub fn fidelity_at(&self, readout_time: f64) -> Result<StcFidelityPair, ReadoutError> {
        let t = validate::non_negative("readout_time", readout_time)?;
        Ok(StcFidelityPair {
            f0: self.model.excited_event_probability(t)?,
            f1: 1.0 - self.model.ground_event_probability(t)?,
        })
    }

    /// Evaluates at the given window, or at the optimum when none is supplied.
    pub fn evaluate(&self, readout_time: Option<f64>) -> Result<StcEvaluation, ReadoutError> {
        let (readout_time, optimised) = match readout_time {
            Some(time) => (ReadoutTime::new(time)?, None),
            None => {
                let optimum = self.optimum()?;
                debug!(
                    "resolved readout window {:e} s via {:?}",
                    optimum.readout_time.seconds(),
                    optimum.source
                );
                (optimum.readout_time, Some(optimum.source))
            }
        };
        Ok(StcEvaluation {
            readout_time,
            optimised,
            fidelity: self.fidelity_at(readout_time.seconds())?,
        })
    }
}

/// State-to-charge fidelities at the supplied readout window.
pub fn stc_fidelity(
    out_time_excited: f64,
    out_time_ground: f64,
    relax_time: f64,
    readout_time: f64,
) -> Result<StcFidelityPair, ReadoutError> {
    let params = RelaxationParams::new(out_time_excited, out_time_ground, relax_time)?;
    StcOptimiser::new(&params)?.fidelity_at(readout_time)
}
