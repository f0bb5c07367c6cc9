use std::f64::consts::SQRT_2;

use readout_core::{NoiseParams, ReadoutError};
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

/// Normalised signal level of the ground (no-event) charge state.
pub const GROUND_MEAN: f64 = 0.0;
/// Normalised signal level of the excited (event) charge state.
pub const EXCITED_MEAN: f64 = 1.0;

/// Gaussian distribution of the measured signal for one charge state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianLevel {
    /// Mean on the normalised signal axis.
    pub mean: f64,
    /// Standard deviation on the normalised signal axis.
    pub std_dev: f64,
}

impl GaussianLevel {
    /// `P(signal < x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        0.5 * erfc(-(x - self.mean) / (self.std_dev * SQRT_2))
    }

    /// `P(signal >= x)`.
    pub fn sf(&self, x: f64) -> f64 {
        0.5 * erfc((x - self.mean) / (self.std_dev * SQRT_2))
    }
}

/// Fraction of digitised samples that are statistically independent after filtering.
///
/// With `fr = 2·filter_cutoff / sample_rate` the fraction is `2·fr / (fr + 1)`,
/// reaching one when the filter sits at the Nyquist limit.
pub fn independent_fraction(sample_rate: f64, filter_cutoff: f64) -> f64 {
    let fr = 2.0 * filter_cutoff / sample_rate;
    if fr < 1.0 {
        2.0 * fr / (fr + 1.0)
    } else {
        1.0
    }
}

/// Bandwidth-limited averaging model of the two charge-state signal levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModel {
    /// Validated noise parameters.
    pub params: NoiseParams,
    /// Number of independent samples averaged within the window, at least one.
    pub effective_samples: f64,
    /// Signal distribution when no tunnel event is present.
    pub ground: GaussianLevel,
    /// Signal distribution when a tunnel event is present.
    pub excited: GaussianLevel,
}

impl NoiseModel {
    /// Derives the averaged signal distributions for the readout window.
    pub fn new(params: &NoiseParams) -> Result<Self, ReadoutError> {
        let params = params.validated()?;
        let raw = params.readout_time
            * params.sample_rate
            * independent_fraction(params.sample_rate, params.filter_cutoff);
        let effective_samples = raw.max(1.0);
        let std_dev = (1.0 / params.snr) / effective_samples.sqrt();
        Ok(Self {
            params,
            effective_samples,
            ground: GaussianLevel {
                mean: GROUND_MEAN,
                std_dev,
            },
            excited: GaussianLevel {
                mean: EXCITED_MEAN,
                std_dev,
            },
        })
    }

    /// Per-sample noise before averaging, `1 / snr`.
    pub fn sample_std_dev(&self) -> f64 {
        1.0 / self.params.snr
    }

    /// `(P(signal < τ | ground), P(signal >= τ | excited))`.
    pub fn fidelities_at(&self, threshold: f64) -> (f64, f64) {
        (self.ground.cdf(threshold), self.excited.sf(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nyquist_filter_keeps_every_sample() {
        assert_eq!(independent_fraction(10e3, 5e3), 1.0);
        assert!((independent_fraction(10e3, 1e3) - 2.0 * 0.2 / 1.2).abs() < 1e-15);
    }

    #[test]
    fn averaging_shrinks_the_spread() {
        let short = NoiseModel::new(&NoiseParams::new(5.0, 10e3, 5e3, 5e-5).unwrap()).unwrap();
        let long = NoiseModel::new(&NoiseParams::new(5.0, 10e3, 5e3, 1e-2).unwrap()).unwrap();
        assert_eq!(short.effective_samples, 1.0);
        assert!((long.effective_samples - 100.0).abs() < 1e-9);
        assert!((short.ground.std_dev - 0.2).abs() < 1e-15);
        assert!((long.ground.std_dev - 0.02).abs() < 1e-12);
    }

    #[test]
    fn sub_sample_windows_clamp_to_one_sample() {
        let model = NoiseModel::new(&NoiseParams::new(2.0, 1e3, 100.0, 1e-6).unwrap()).unwrap();
        assert_eq!(model.effective_samples, 1.0);
        assert_eq!(model.ground.std_dev, model.sample_std_dev());
    }

    #[test]
    fn midpoint_threshold_is_symmetric() {
        let model = NoiseModel::new(&NoiseParams::new(3.0, 10e3, 5e3, 1e-3).unwrap()).unwrap();
        let (f0, f1) = model.fidelities_at(0.5);
        assert!((f0 - f1).abs() < 1e-15);
        assert!(f0 > 0.5);
    }
}
