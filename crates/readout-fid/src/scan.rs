use log::debug;
use rayon::prelude::*;
use readout_core::{validate, ErrorInfo, ReadoutError};
use serde::{Deserialize, Serialize};

use crate::config::ReadoutConfig;
use crate::pipeline::{benchmark, ReadoutReport};

/// Benchmark reports over a list of readout windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// One report per window, in input order.
    pub reports: Vec<ReadoutReport>,
    /// First index with the largest overall `f_m`.
    pub best_index: usize,
}

impl ScanReport {
    /// Report with the largest overall fidelity; `None` for an empty scan.
    pub fn best(&self) -> Option<&ReadoutReport> {
        self.reports.get(self.best_index)
    }
}

/// Geometric grid of `steps` windows from `lo` to `hi` inclusive.
pub fn log_spaced_times(lo: f64, hi: f64, steps: usize) -> Result<Vec<f64>, ReadoutError> {
    let lo = validate::positive("from", lo)?;
    let hi = validate::positive("to", hi)?;
    let steps = validate::count("steps", steps)?;
    if hi < lo {
        return Err(ReadoutError::InvalidParameter(
            ErrorInfo::new("inverted-range", "scan upper bound lies below the lower bound")
                .with_context("from", format!("{lo:e}"))
                .with_context("to", format!("{hi:e}")),
        ));
    }
    if steps == 1 {
        return Ok(vec![lo]);
    }
    let ratio = (hi / lo).ln() / (steps - 1) as f64;
    Ok((0..steps)
        .map(|i| {
            if i == steps - 1 {
                hi
            } else {
                lo * (ratio * i as f64).exp()
            }
        })
        .collect())
}

/// Benchmarks `config` at every window in `times`.
///
/// The configured window is ignored. Curves are dropped from the per-window
/// reports regardless of `keep_curve`.
pub fn scan_readout_times(
    config: &ReadoutConfig,
    times: &[f64],
) -> Result<ScanReport, ReadoutError> {
    if times.is_empty() {
        return Err(ReadoutError::invalid(
            "empty-grid",
            "times must hold at least one readout window",
            "times",
            0.0,
        ));
    }
    let mut base = *config;
    base.sweep.keep_curve = false;
    let reports = times
        .par_iter()
        .map(|&time| benchmark(&base.with_readout_time(time)))
        .collect::<Result<Vec<_>, _>>()?;
    let mut best_index = 0;
    for (idx, report) in reports.iter().enumerate().skip(1) {
        if report.overall.f_m > reports[best_index].overall.f_m {
            best_index = idx;
        }
    }
    debug!(
        "scanned {} windows: best t={:e} s",
        reports.len(),
        reports[best_index].readout_time
    );
    Ok(ScanReport {
        reports,
        best_index,
    })
}
