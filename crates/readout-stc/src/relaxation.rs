use readout_core::{validate, ReadoutError, RelaxationParams};
use serde::{Deserialize, Serialize};

/// Exponential transition statistics of the spin-to-charge conversion.
///
/// The excited state leaves the dot at rate `1/out_time_excited` while
/// competing with relaxation to ground at rate `1/relax_time`; the ground state
/// produces a spurious tunnel event at rate `1/out_time_ground`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxationModel {
    params: RelaxationParams,
}

impl RelaxationModel {
    /// Validates the time constants and builds the model.
    pub fn new(params: &RelaxationParams) -> Result<Self, ReadoutError> {
        Ok(Self {
            params: params.validated()?,
        })
    }

    /// Parameters backing the model.
    pub fn params(&self) -> &RelaxationParams {
        &self.params
    }

    /// Total escape rate of the excited state (tunnelling plus relaxation).
    pub fn excited_escape_rate(&self) -> f64 {
        1.0 / self.params.out_time_excited + 1.0 / self.params.relax_time
    }

    /// Probability that the excited state has tunnelled out by `t`, ignoring relaxation.
    pub fn excited_decay_probability(&self, t: f64) -> Result<f64, ReadoutError> {
        let t = validate::non_negative("t", t)?;
        Ok(-(-t / self.params.out_time_excited).exp_m1())
    }

    /// Probability that the ground state has produced a tunnel event by `t`.
    pub fn ground_event_probability(&self, t: f64) -> Result<f64, ReadoutError> {
        let t = validate::non_negative("t", t)?;
        Ok(-(-t / self.params.out_time_ground).exp_m1())
    }

    /// Probability that the excited state has relaxed to ground by `t`.
    pub fn relaxation_probability(&self, t: f64) -> Result<f64, ReadoutError> {
        let t = validate::non_negative("t", t)?;
        Ok(-(-t / self.params.relax_time).exp_m1())
    }

    /// Probability that an initially excited state produces a tunnel event by `t`.
    ///
    /// Either the excited state tunnels out directly, or it relaxes first and the
    /// resulting ground state tunnels out later in the window.
    pub fn excited_event_probability(&self, t: f64) -> Result<f64, ReadoutError> {
        let t = validate::non_negative("t", t)?;
        let k = self.excited_escape_rate();
        let tail = (-t / self.params.out_time_ground).exp() * self.relaxed_window(t)
            / self.params.relax_time;
        Ok((-(-k * t).exp_m1() - tail).clamp(0.0, 1.0))
    }

    /// Time derivative of the event-branch plus no-event-branch visibility.
    pub(crate) fn visibility_slope(&self, t: f64) -> f64 {
        let p = &self.params;
        let k = self.excited_escape_rate();
        let ground = (-t / p.out_time_ground).exp() / p.out_time_ground;
        (-k * t).exp() / p.out_time_excited
            - ground * (1.0 - self.relaxed_window(t) / p.relax_time)
    }

    /// `∫_0^t exp(-(k - 1/τg)·s) ds`, with the removable singularity at `k = 1/τg`.
    fn relaxed_window(&self, t: f64) -> f64 {
        let delta = self.excited_escape_rate() - 1.0 / self.params.out_time_ground;
        let exponent = delta * t;
        if exponent.abs() < 1e-12 {
            t
        } else {
            -(-exponent).exp_m1() / delta
        }
    }
}
