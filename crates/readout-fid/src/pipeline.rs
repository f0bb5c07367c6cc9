use log::info;
use readout_core::{stable_hash_string, ReadoutError};
use readout_er::{sweep_thresholds, ErPoint, ThresholdSweep};
use readout_stc::{OptimumSource, StcFidelityPair, StcOptimiser};
use serde::{Deserialize, Serialize};

use crate::compose::OverallFidelity;
use crate::config::ReadoutConfig;

/// Result of one end-to-end readout benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadoutReport {
    /// Configuration that produced the report.
    pub config: ReadoutConfig,
    /// Readout window the stages were evaluated at, in seconds.
    pub readout_time: f64,
    /// How the window was found when it was not configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimised: Option<OptimumSource>,
    /// State-to-charge fidelities at the window.
    pub stc: StcFidelityPair,
    /// Electrical readout fidelities at the best threshold.
    pub er: ErPoint,
    /// Composed fidelities.
    pub overall: OverallFidelity,
    /// Full threshold curves, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<ThresholdSweep>,
    /// Stable hash of the configuration and results.
    pub report_hash: String,
}

/// Runs both stages and composes them at the best threshold.
pub fn benchmark(config: &ReadoutConfig) -> Result<ReadoutReport, ReadoutError> {
    let config = config.validated()?;
    let evaluation = StcOptimiser::new(&config.relaxation)?.evaluate(config.readout_time)?;
    let readout_time = evaluation.readout_time.seconds();
    let noise = config.noise.with_readout_time(readout_time);
    let sweep = sweep_thresholds(&config.relaxation, &noise, &config.sweep.opts())?;
    let er = sweep.best().ok_or_else(|| {
        ReadoutError::invalid(
            "empty-grid",
            "threshold sweep produced no points",
            "threshold_num",
            config.sweep.threshold_num as f64,
        )
    })?;
    let overall = OverallFidelity::compose(&evaluation.fidelity, &er)?;
    let sweep = config.sweep.keep_curve.then_some(sweep);
    let report_hash = stable_hash_string(&(
        &config,
        readout_time,
        &evaluation.fidelity,
        &er,
        &overall,
        &sweep,
    ))?;
    info!(
        "readout benchmark at t={readout_time:e} s: F0={:.6} F1={:.6} F_M={:.6}",
        overall.f0, overall.f1, overall.f_m
    );
    Ok(ReadoutReport {
        config,
        readout_time,
        optimised: evaluation.optimised,
        stc: evaluation.fidelity,
        er,
        overall,
        sweep,
        report_hash,
    })
}
