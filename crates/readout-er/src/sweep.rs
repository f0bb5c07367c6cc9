use log::debug;
use rayon::prelude::*;
use readout_core::{validate, NoiseParams, ReadoutError, RelaxationParams};
use serde::{Deserialize, Serialize};

use crate::noise::NoiseModel;
use crate::transient::TransientModel;

/// Number of thresholds evaluated when no resolution is configured.
pub const DEFAULT_THRESHOLD_NUM: usize = 1001;

fn default_threshold_num() -> usize {
    DEFAULT_THRESHOLD_NUM
}

fn default_panels() -> usize {
    24
}

/// Electrical readout model used to turn a threshold into class fidelities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErModel {
    /// Two Gaussians whose spread shrinks with the number of averaged samples.
    #[default]
    Averaged,
    /// Peak detection of a filtered tunnel blip on individual samples.
    Transient {
        /// Mean time for an electron to tunnel back into the dot, in seconds.
        in_time_ground: f64,
        /// Minimum quadrature panels per axis of the missed-blip integral;
        /// long windows get more.
        #[serde(default = "default_panels")]
        panels: usize,
    },
}

/// Threshold sweep configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepOpts {
    /// Number of evenly spaced thresholds strictly between the two levels.
    #[serde(default = "default_threshold_num")]
    pub threshold_num: usize,
    /// Readout model evaluated at each threshold.
    #[serde(default)]
    pub model: ErModel,
}

impl Default for SweepOpts {
    fn default() -> Self {
        Self {
            threshold_num: default_threshold_num(),
            model: ErModel::default(),
        }
    }
}

/// Class fidelities at a single threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErPoint {
    /// Normalised decision threshold.
    pub threshold: f64,
    /// `P(signal < τ | ground)`.
    pub f0: f64,
    /// `P(signal >= τ | excited)`.
    pub f1: f64,
}

impl ErPoint {
    /// Contrast `f0 + f1 - 1`.
    pub fn visibility(&self) -> f64 {
        self.f0 + self.f1 - 1.0
    }
}

/// Fidelity curves over the threshold grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSweep {
    /// Thresholds, strictly increasing inside `(0, 1)`.
    pub thresholds: Vec<f64>,
    /// Ground fidelity per threshold.
    pub f0: Vec<f64>,
    /// Excited fidelity per threshold.
    pub f1: Vec<f64>,
    /// Visibility per threshold.
    pub visibility: Vec<f64>,
    /// First index of the largest visibility.
    pub best_index: usize,
}

impl ThresholdSweep {
    fn from_points(points: Vec<ErPoint>) -> Self {
        let thresholds = points.iter().map(|p| p.threshold).collect();
        let f0 = points.iter().map(|p| p.f0).collect();
        let f1 = points.iter().map(|p| p.f1).collect();
        let visibility: Vec<f64> = points.iter().map(ErPoint::visibility).collect();
        let best_index = first_argmax(&visibility);
        Self {
            thresholds,
            f0,
            f1,
            visibility,
            best_index,
        }
    }

    /// Number of thresholds in the sweep.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether the sweep holds no thresholds.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Point at `index`, if every curve reaches it.
    pub fn point(&self, index: usize) -> Option<ErPoint> {
        Some(ErPoint {
            threshold: *self.thresholds.get(index)?,
            f0: *self.f0.get(index)?,
            f1: *self.f1.get(index)?,
        })
    }

    /// Point of maximal visibility; `None` only for an empty or ragged sweep.
    pub fn best(&self) -> Option<ErPoint> {
        self.point(self.best_index)
    }
}

fn first_argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (idx, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = idx;
        }
    }
    best
}

/// Evenly spaced thresholds `(i + 1) / (count + 1)` for `i` in `0..count`.
pub fn threshold_grid(count: usize) -> Vec<f64> {
    let denominator = (count + 1) as f64;
    (0..count).map(|i| (i + 1) as f64 / denominator).collect()
}

trait ThresholdClassifier: Sync {
    fn fidelities_at(&self, threshold: f64) -> (f64, f64);
}

impl ThresholdClassifier for NoiseModel {
    fn fidelities_at(&self, threshold: f64) -> (f64, f64) {
        NoiseModel::fidelities_at(self, threshold)
    }
}

impl ThresholdClassifier for TransientModel {
    fn fidelities_at(&self, threshold: f64) -> (f64, f64) {
        TransientModel::fidelities_at(self, threshold)
    }
}

fn sweep_with(classifier: &dyn ThresholdClassifier, count: usize) -> ThresholdSweep {
    let points = threshold_grid(count)
        .into_par_iter()
        .map(|threshold| {
            let (f0, f1) = classifier.fidelities_at(threshold);
            ErPoint { threshold, f0, f1 }
        })
        .collect();
    ThresholdSweep::from_points(points)
}

/// Sweeps the decision threshold for the configured electrical model.
pub fn sweep_thresholds(
    relaxation: &RelaxationParams,
    noise: &NoiseParams,
    opts: &SweepOpts,
) -> Result<ThresholdSweep, ReadoutError> {
    let relaxation = relaxation.validated()?;
    let count = validate::count("threshold_num", opts.threshold_num)?;
    let sweep = match opts.model {
        ErModel::Averaged => sweep_with(&NoiseModel::new(noise)?, count),
        ErModel::Transient {
            in_time_ground,
            panels,
        } => sweep_with(
            &TransientModel::new(&relaxation, noise, in_time_ground, panels)?,
            count,
        ),
    };
    if let Some(best) = sweep.best() {
        debug!(
            "threshold sweep over {count} points: best τ={:.4} (V={:.6})",
            best.threshold,
            best.visibility()
        );
    }
    Ok(sweep)
}

/// Electrical readout fidelities over the default threshold grid.
pub fn er_fidelity(
    out_time_excited: f64,
    out_time_ground: f64,
    relax_time: f64,
    readout_time: f64,
    snr: f64,
    sample_rate: f64,
    filter_cutoff: f64,
) -> Result<ThresholdSweep, ReadoutError> {
    let relaxation = RelaxationParams::new(out_time_excited, out_time_ground, relax_time)?;
    let noise = NoiseParams::new(snr, sample_rate, filter_cutoff, readout_time)?;
    sweep_thresholds(&relaxation, &noise, &SweepOpts::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_of_ties() {
        assert_eq!(first_argmax(&[0.1, 0.5, 0.5, 0.2]), 1);
        assert_eq!(first_argmax(&[0.7, 0.7]), 0);
        assert_eq!(first_argmax(&[0.3]), 0);
    }

    #[test]
    fn default_grid_hits_the_midpoint() {
        let grid = threshold_grid(DEFAULT_THRESHOLD_NUM);
        assert_eq!(grid.len(), DEFAULT_THRESHOLD_NUM);
        assert_eq!(grid[500], 0.5);
        assert!(grid[0] > 0.0 && grid[grid.len() - 1] < 1.0);
    }
}
