use std::f64::consts::PI;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Order of the limiting analog filter assumed in the readout chain.
pub const FILTER_ORDER: usize = 8;

/// Analog Bessel low-pass normalised so its phase midpoint sits at the cutoff.
///
/// The transfer function is `H(s) = a0 / θ(s · a0^(1/N) / ωc)` where `θ` is the
/// reverse Bessel polynomial of order `N` and `a0` its constant coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BesselLowPass {
    coefficients: Vec<f64>,
    cutoff_rad: f64,
    frequency_scale: f64,
}

fn reverse_bessel_coefficients(order: usize) -> Vec<f64> {
    (0..=order)
        .map(|k| {
            let rising: f64 = ((order - k + 1)..=(2 * order - k)).map(|v| v as f64).product();
            let factorial: f64 = (1..=k).map(|v| v as f64).product();
            rising / (2f64.powi((order - k) as i32) * factorial)
        })
        .collect()
}

impl BesselLowPass {
    /// Builds the filter from its -3 dB design frequency in Hz.
    pub fn new(order: usize, cutoff_hz: f64) -> Self {
        let coefficients = reverse_bessel_coefficients(order);
        let frequency_scale = coefficients[0].powf(1.0 / order as f64);
        Self {
            coefficients,
            cutoff_rad: 2.0 * PI * cutoff_hz,
            frequency_scale,
        }
    }

    /// Polynomial coefficients in ascending powers of `s`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// `|H(jω)|` at angular frequency `omega` in rad/s.
    pub fn magnitude(&self, omega: f64) -> f64 {
        let s = Complex64::new(0.0, omega * self.frequency_scale / self.cutoff_rad);
        let denominator = self
            .coefficients
            .iter()
            .rev()
            .fold(Complex64::new(0.0, 0.0), |acc, &c| acc * s + c);
        self.coefficients[0] / denominator.norm()
    }
}
