//! Peak-detection readout of a tunnel blip through a band-limited chain.
//!
//! A tunnel event shows up as a blip of finite length that the limiting filter
//! attenuates. The event is registered when any sample within the window crosses
//! the threshold, so the ground fidelity is the probability that none of the
//! `nr` independent samples of pure noise crosses it, while the excited
//! fidelity averages over blip start and blip length.

use std::f64::consts::SQRT_2;

use log::debug;
use readout_core::{validate, ErrorInfo, NoiseParams, ReadoutError, RelaxationParams};
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::bessel::{BesselLowPass, FILTER_ORDER};
use crate::noise::{independent_fraction, EXCITED_MEAN, GROUND_MEAN};
use crate::quadrature::graded_nodes;

/// Blip integrals extend to this many mean tunnel-in times.
const BLIP_TAIL_SPAN: f64 = 20.0;

fn normal_cdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    0.5 * erfc(-(x - mean) / (std_dev * SQRT_2))
}

#[derive(Debug, Clone, PartialEq)]
struct BlipNode {
    weight: f64,
    length: f64,
    height: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct StartNode {
    weight: f64,
    truncated_length: f64,
    truncated_height: f64,
    tail_mass: f64,
    blips: Vec<BlipNode>,
}

/// Sample-domain description of the transient readout, with the quadrature plan
/// for the missed-blip integral precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientModel {
    window_samples: f64,
    tunnel_in_samples: f64,
    tunnel_out_samples: f64,
    noise: f64,
    blip_fraction: f64,
    starts: Vec<StartNode>,
}

/// Scalar summary of the sample-domain quantities, useful for reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientSummary {
    /// Independent samples in the readout window.
    pub window_samples: f64,
    /// Mean tunnel-in time in samples.
    pub tunnel_in_samples: f64,
    /// Mean excited tunnel-out time in samples.
    pub tunnel_out_samples: f64,
    /// Probability weight given to blips too short to resolve.
    pub unresolved_fraction: f64,
}

impl TransientModel {
    /// Builds the model for one readout window and tunnel-in time.
    pub fn new(
        relaxation: &RelaxationParams,
        noise: &NoiseParams,
        in_time_ground: f64,
        panels: usize,
    ) -> Result<Self, ReadoutError> {
        let relaxation = relaxation.validated()?;
        let noise = noise.validated()?;
        let in_time_ground = validate::positive("in_time_ground", in_time_ground)?;
        let panels = validate::count("panels", panels)?;

        let sample_time = 1.0 / noise.sample_rate;
        let tnr = independent_fraction(noise.sample_rate, noise.filter_cutoff);
        let nr = noise.readout_time / sample_time * tnr;
        if nr <= 2.0 {
            return Err(ReadoutError::InvalidParameter(
                ErrorInfo::new(
                    "window-too-short",
                    "transient readout needs more than two independent samples in the window",
                )
                .with_context("window_samples", format!("{nr:e}"))
                .with_hint("lengthen readout_time or raise the sample rate"),
            ));
        }
        let nh = in_time_ground / sample_time;
        let nl = relaxation.out_time_excited / sample_time;

        let filter = BesselLowPass::new(FILTER_ORDER, noise.filter_cutoff);
        let blip_height =
            |length: f64| filter.magnitude(1.0 / (length * tnr * sample_time)) * EXCITED_MEAN;
        let start_density = |s: f64| ((1.0 - s) / nl).exp() / (1.0 - (-nr / nl).exp()) / nl;
        let length_density = |n: f64| ((1.0 - n) / nh).exp() / nh;
        let length_mass = |a: f64, b: f64| ((1.0 - a) / nh).exp() - ((1.0 - b) / nh).exp();

        // Finest structure: one independent sample, or a tunnel time if shorter.
        let scale = nh.min(nl).min(1.0);
        let tail_end = BLIP_TAIL_SPAN * nh;
        let starts = graded_nodes(1.0, nr - 1.0, scale, panels)
            .into_iter()
            .map(|(s, weight)| {
                let truncated_length = nr - s;
                let blips = graded_nodes(1.0, truncated_length, scale, panels)
                    .into_iter()
                    .map(|(n, w)| BlipNode {
                        weight: w * length_density(n),
                        length: n,
                        height: blip_height(n),
                    })
                    .collect();
                StartNode {
                    weight: weight * start_density(s),
                    truncated_length,
                    truncated_height: blip_height(truncated_length),
                    tail_mass: length_mass(truncated_length, tail_end.max(truncated_length)),
                    blips,
                }
            })
            .collect();

        let ri = tnr / nh;
        let mut ro = tnr / nl;
        if ro == ri {
            ro += 1e-4;
        }
        let blip_fraction = 1.0
            - ((1.0 - (ro / 2.0 - ri / 2.0).exp()) * ro) / ((1.0 - (ro / 2.0).exp()) * (ro - ri));

        debug!(
            "transient model: nr={nr:.3}, nh={nh:.3}, nl={nl:.3}, unresolved={blip_fraction:.3e}"
        );
        Ok(Self {
            window_samples: nr,
            tunnel_in_samples: nh,
            tunnel_out_samples: nl,
            noise: 1.0 / noise.snr,
            blip_fraction,
            starts,
        })
    }

    /// Independent samples in the readout window.
    pub fn window_samples(&self) -> f64 {
        self.window_samples
    }

    /// Probability that every sample of one blip configuration stays below `threshold`.
    fn miss_probability(&self, threshold: f64, ground_cdf: f64, length: f64, height: f64) -> f64 {
        let share = length / self.window_samples;
        let blip_cdf = normal_cdf(threshold, height, self.noise);
        (share * blip_cdf + (1.0 - share) * ground_cdf).powf(self.window_samples)
    }

    /// `(ground fidelity, excited fidelity)` at one threshold.
    pub fn fidelities_at(&self, threshold: f64) -> (f64, f64) {
        let ground_cdf = normal_cdf(threshold, GROUND_MEAN, self.noise);
        let clean = ground_cdf.powf(self.window_samples);
        let missed: f64 = self
            .starts
            .iter()
            .map(|start| {
                let inside: f64 = start
                    .blips
                    .iter()
                    .map(|blip| {
                        blip.weight
                            * self.miss_probability(threshold, ground_cdf, blip.length, blip.height)
                    })
                    .sum();
                let truncated = start.tail_mass
                    * self.miss_probability(
                        threshold,
                        ground_cdf,
                        start.truncated_length,
                        start.truncated_height,
                    );
                start.weight * (inside + truncated)
            })
            .sum();
        let excited =
            (1.0 - self.blip_fraction) * (1.0 - missed) + self.blip_fraction * (1.0 - clean);
        (clean.clamp(0.0, 1.0), excited.clamp(0.0, 1.0))
    }

    /// Scalar summary of the model.
    pub fn summary(&self) -> TransientSummary {
        TransientSummary {
            window_samples: self.window_samples,
            tunnel_in_samples: self.tunnel_in_samples,
            tunnel_out_samples: self.tunnel_out_samples,
            unresolved_fraction: self.blip_fraction,
        }
    }
}
