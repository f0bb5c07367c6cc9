use std::fs;
use std::path::Path;

use readout_core::{ErrorInfo, InstrumentParams, ReadoutError, ReadoutTime, RelaxationParams};
use readout_er::{ErModel, SweepOpts, DEFAULT_THRESHOLD_NUM};
use serde::{Deserialize, Serialize};

use crate::serde::{from_json_slice, from_yaml_slice, to_yaml_string};

fn default_threshold_num() -> usize {
    DEFAULT_THRESHOLD_NUM
}

fn default_keep_curve() -> bool {
    true
}

/// Threshold sweep settings of a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Number of thresholds between the two signal levels.
    #[serde(default = "default_threshold_num")]
    pub threshold_num: usize,
    /// Electrical readout model.
    #[serde(default)]
    pub model: ErModel,
    /// Whether the report carries the full threshold curves.
    #[serde(default = "default_keep_curve")]
    pub keep_curve: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            threshold_num: default_threshold_num(),
            model: ErModel::default(),
            keep_curve: default_keep_curve(),
        }
    }
}

impl SweepConfig {
    /// Sweep options handed to the threshold sweeper.
    pub fn opts(&self) -> SweepOpts {
        SweepOpts {
            threshold_num: self.threshold_num,
            model: self.model,
        }
    }
}

/// Physical description of one readout experiment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadoutConfig {
    /// Characteristic transition times.
    pub relaxation: RelaxationParams,
    /// Measurement chain without the readout window.
    pub noise: InstrumentParams,
    /// Fixed readout window in seconds; the STC optimum when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readout_time: Option<f64>,
    /// Threshold sweep settings.
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl ReadoutConfig {
    /// Builds a configuration that lets the optimiser pick the window.
    pub fn new(relaxation: RelaxationParams, noise: InstrumentParams) -> Self {
        Self {
            relaxation,
            noise,
            readout_time: None,
            sweep: SweepConfig::default(),
        }
    }

    /// Pins the readout window.
    pub fn with_readout_time(mut self, readout_time: f64) -> Self {
        self.readout_time = Some(readout_time);
        self
    }

    /// Replaces the sweep settings.
    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    /// Returns a copy after checking every physical field.
    pub fn validated(&self) -> Result<Self, ReadoutError> {
        self.relaxation.validated()?;
        self.noise.validated()?;
        if let Some(time) = self.readout_time {
            ReadoutTime::new(time)?;
        }
        readout_core::validate::count("threshold_num", self.sweep.threshold_num)?;
        if let ErModel::Transient {
            in_time_ground,
            panels,
        } = self.sweep.model
        {
            readout_core::validate::positive("in_time_ground", in_time_ground)?;
            readout_core::validate::count("panels", panels)?;
        }
        Ok(*self)
    }

    /// Parses a YAML document and validates it.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, ReadoutError> {
        from_yaml_slice::<Self>(data)?.validated()
    }

    /// Parses a JSON document and validates it.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, ReadoutError> {
        from_json_slice::<Self>(data)?.validated()
    }

    /// Serialises the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, ReadoutError> {
        to_yaml_string(self)
    }
}

fn io_error(code: &str, err: impl ToString) -> ReadoutError {
    ReadoutError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Loads a configuration file, choosing JSON for `.json` and YAML otherwise.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ReadoutConfig, ReadoutError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        ReadoutError::Serde(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        ReadoutConfig::from_json_slice(&bytes)
    } else {
        ReadoutConfig::from_yaml_slice(&bytes)
    }
}

/// Writes a configuration as YAML.
pub fn save_config<P: AsRef<Path>>(config: &ReadoutConfig, path: P) -> Result<(), ReadoutError> {
    let yaml = config.to_yaml_string()?;
    fs::write(path, yaml).map_err(|err| io_error("config-write", err))
}
