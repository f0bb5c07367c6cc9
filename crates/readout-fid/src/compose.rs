use readout_core::{validate, ReadoutError};
use readout_er::ErPoint;
use readout_stc::StcFidelityPair;
use serde::{Deserialize, Serialize};

/// End-to-end fidelities of the cascaded STC and ER stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallFidelity {
    /// Probability of reporting ground for a ground-prepared qubit.
    pub f0: f64,
    /// Probability of reporting excited for an excited-prepared qubit.
    pub f1: f64,
    /// Mean of the two class fidelities.
    pub f_m: f64,
}

impl OverallFidelity {
    /// Composes a state-to-charge pair with an electrical readout point.
    ///
    /// The ground-prepared qubit is read through the no-event branch (`stc.f1`)
    /// and the no-crossing electrical class (`er.f0`); the excited-prepared
    /// qubit through the event branch (`stc.f0`) and the crossing class (`er.f1`).
    pub fn compose(stc: &StcFidelityPair, er: &ErPoint) -> Result<Self, ReadoutError> {
        overall_fidelity(stc.f1, stc.f0, er.f0, er.f1)
    }

    /// Contrast `f0 + f1 - 1`.
    pub fn visibility(&self) -> f64 {
        self.f0 + self.f1 - 1.0
    }
}

/// Combines the per-class fidelities of both stages.
///
/// A class is reported correctly when both stages succeed, or when both fail
/// and the second error undoes the first. `f0_stc` and `f1_stc` are indexed
/// by the prepared qubit state, `f0_er` and `f1_er` by the charge class.
pub fn overall_fidelity(
    f0_stc: f64,
    f1_stc: f64,
    f0_er: f64,
    f1_er: f64,
) -> Result<OverallFidelity, ReadoutError> {
    let f0_stc = validate::probability("f0_stc", f0_stc)?;
    let f1_stc = validate::probability("f1_stc", f1_stc)?;
    let f0_er = validate::probability("f0_er", f0_er)?;
    let f1_er = validate::probability("f1_er", f1_er)?;
    let f0 = f0_stc * f0_er + (1.0 - f0_stc) * (1.0 - f1_er);
    let f1 = f1_stc * f1_er + (1.0 - f1_stc) * (1.0 - f0_er);
    Ok(OverallFidelity {
        f0,
        f1,
        f_m: (f0 + f1) / 2.0,
    })
}
