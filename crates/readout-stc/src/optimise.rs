use log::debug;
use readout_core::{ErrorInfo, ReadoutError, ReadoutTime, RelaxationParams};
use serde::{Deserialize, Serialize};

use crate::relaxation::RelaxationModel;

fn optimise_error(code: &str, message: impl Into<String>) -> ReadoutError {
    ReadoutError::InvalidParameter(ErrorInfo::new(code, message.into()))
}

/// Bounds on the bisection fallback used when the closed form degenerates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BisectionOpts {
    /// Maximum number of bracket halvings.
    pub max_iters: usize,
    /// Relative bracket width at which the search stops.
    pub rel_tolerance: f64,
}

impl Default for BisectionOpts {
    fn default() -> Self {
        Self {
            max_iters: 200,
            rel_tolerance: 1e-12,
        }
    }
}

/// Which path produced an optimised readout window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimumSource {
    /// Stationary point of the visibility derivative in closed form.
    ClosedForm,
    /// Bisection on the sign of the visibility derivative.
    Bisection,
}

/// Optimised readout window together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadTimeOptimum {
    /// Window maximising the state-to-charge visibility.
    pub readout_time: ReadoutTime,
    /// Path that produced the window.
    pub source: OptimumSource,
    /// Number of bisection steps taken, zero for the closed form.
    pub iterations: usize,
}

/// Closed-form stationary point of the visibility; `None` outside `(0, ∞)`.
///
/// The stationary point is a maximum only when the excited state leaves the
/// dot faster than the ground state; otherwise it is a minimum and rejected.
pub fn closed_form_read_time(params: &RelaxationParams) -> Option<f64> {
    let te = params.out_time_excited;
    let tg = params.out_time_ground;
    let t1 = params.relax_time;
    if te >= tg {
        return None;
    }
    let x = t1 * (tg - te) + te * tg;
    let time = (t1 * tg * te / x) * (tg * (t1 + te) / (t1 * te)).ln();
    (time.is_finite() && time > 0.0).then_some(time)
}

fn bisect_read_time(
    model: &RelaxationModel,
    opts: &BisectionOpts,
) -> Result<(f64, usize), ReadoutError> {
    let params = model.params();
    let mut lo = 1e-6 * params.min_time();
    let mut hi = 100.0 * params.out_time_excited.max(params.out_time_ground);
    let slope_lo = model.visibility_slope(lo);
    let slope_hi = model.visibility_slope(hi);
    if !(slope_lo > 0.0 && slope_hi < 0.0) {
        return Err(optimise_error(
            "no-interior-maximum",
            "state-to-charge visibility has no interior maximum for these transition times",
        ));
    }
    let mut iterations = 0;
    while iterations < opts.max_iters && hi / lo - 1.0 > opts.rel_tolerance {
        let mid = (lo * hi).sqrt();
        if model.visibility_slope(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
        iterations += 1;
    }
    Ok(((lo * hi).sqrt(), iterations))
}

/// Locates the window maximising visibility, falling back to bisection when needed.
pub fn optimise_read_time(
    params: &RelaxationParams,
    opts: &BisectionOpts,
) -> Result<ReadTimeOptimum, ReadoutError> {
    let model = RelaxationModel::new(params)?;
    if let Some(time) = closed_form_read_time(model.params()) {
        return Ok(ReadTimeOptimum {
            readout_time: ReadoutTime::new(time)?,
            source: OptimumSource::ClosedForm,
            iterations: 0,
        });
    }
    debug!(
        "closed-form read time degenerate for {:?}, bisecting",
        model.params()
    );
    let (time, iterations) = bisect_read_time(&model, opts)?;
    debug!("bisection converged to {time:e} s after {iterations} steps");
    Ok(ReadTimeOptimum {
        readout_time: ReadoutTime::new(time)?,
        source: OptimumSource::Bisection,
        iterations,
    })
}

/// Optimal single-shot readout window for the given transition times.
pub fn optimal_read_time(
    out_time_excited: f64,
    out_time_ground: f64,
    relax_time: f64,
) -> Result<ReadoutTime, ReadoutError> {
    let params = RelaxationParams::new(out_time_excited, out_time_ground, relax_time)?;
    Ok(optimise_read_time(&params, &BisectionOpts::default())?.readout_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisection_agrees_with_closed_form() {
        let params = RelaxationParams::new(5e-3, 100e-3, 10.0).unwrap();
        let model = RelaxationModel::new(&params).unwrap();
        let closed = closed_form_read_time(&params).unwrap();
        let (bisected, iterations) = bisect_read_time(&model, &BisectionOpts::default()).unwrap();
        assert!(iterations > 0);
        assert!((bisected - closed).abs() / closed < 1e-9);
    }

    #[test]
    fn closed_form_rejects_inverted_rates() {
        let params = RelaxationParams::new(100e-3, 5e-3, 10.0).unwrap();
        assert!(closed_form_read_time(&params).is_none());
    }

    #[test]
    fn iteration_cap_is_respected() {
        let params = RelaxationParams::new(5e-3, 100e-3, 10.0).unwrap();
        let model = RelaxationModel::new(&params).unwrap();
        let opts = BisectionOpts {
            max_iters: 3,
            rel_tolerance: 0.0,
        };
        let (_, iterations) = bisect_read_time(&model, &opts).unwrap();
        assert_eq!(iterations, 3);
    }
}
