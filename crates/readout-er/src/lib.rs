#![deny(missing_docs)]
#![doc = "Electrical readout: bandwidth-limited noise model, threshold sweeps and the filtered-transient peak-detection model."]

/// Reverse Bessel polynomial low-pass used by the transient model.
pub mod bessel;
/// Averaged two-level Gaussian noise model.
pub mod noise;
pub mod quadrature;
/// Threshold grid, sweep driver and flat entry point.
pub mod sweep;
pub mod transient;

pub use bessel::{BesselLowPass, FILTER_ORDER};
pub use noise::{independent_fraction, GaussianLevel, NoiseModel, EXCITED_MEAN, GROUND_MEAN};
pub use sweep::{
    er_fidelity, sweep_thresholds, threshold_grid, ErModel, ErPoint, SweepOpts, ThresholdSweep,
    DEFAULT_THRESHOLD_NUM,
};
pub use transient::{TransientModel, TransientSummary};
