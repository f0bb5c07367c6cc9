use serde::{Deserialize, Serialize};

use crate::errors::ReadoutError;
use crate::validate;

/// Characteristic transition times of the two spin states, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxationParams {
    /// Time for the excited spin state to tunnel out of the dot into the reservoir.
    pub out_time_excited: f64,
    /// Time for the ground spin state to tunnel out of the dot into the reservoir.
    pub out_time_ground: f64,
    /// Relaxation time of the excited spin state to the ground state.
    pub relax_time: f64,
}

impl RelaxationParams {
    /// Builds a validated parameter set.
    pub fn new(
        out_time_excited: f64,
        out_time_ground: f64,
        relax_time: f64,
    ) -> Result<Self, ReadoutError> {
        Self {
            out_time_excited,
            out_time_ground,
            relax_time,
        }
        .validated()
    }

    /// Returns a copy after checking every time constant is finite and positive.
    pub fn validated(&self) -> Result<Self, ReadoutError> {
        validate::positive("out_time_excited", self.out_time_excited)?;
        validate::positive("out_time_ground", self.out_time_ground)?;
        validate::positive("relax_time", self.relax_time)?;
        Ok(*self)
    }

    /// Smallest of the three time constants.
    pub fn min_time(&self) -> f64 {
        self.out_time_excited
            .min(self.out_time_ground)
            .min(self.relax_time)
    }
}

/// Length of a single-shot measurement window, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadoutTime(f64);

impl ReadoutTime {
    /// Wraps a finite, non-negative window length.
    pub fn new(seconds: f64) -> Result<Self, ReadoutError> {
        validate::non_negative("readout_time", seconds).map(Self)
    }

    /// Window length in seconds.
    pub fn seconds(&self) -> f64 {
        self.0
    }
}

impl From<ReadoutTime> for f64 {
    fn from(time: ReadoutTime) -> Self {
        time.0
    }
}

/// Electrical chain characterisation independent of the readout window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentParams {
    /// Voltage signal-to-noise ratio between the two charge levels.
    pub snr: f64,
    /// Digitiser sample rate in Hz.
    pub sample_rate: f64,
    /// -3 dB point of the limiting low-pass filter in Hz.
    pub filter_cutoff: f64,
}

impl InstrumentParams {
    /// Returns a copy after checking positivity and the Nyquist bound.
    pub fn validated(&self) -> Result<Self, ReadoutError> {
        validate::positive("snr", self.snr)?;
        validate::positive("sample_rate", self.sample_rate)?;
        validate::positive("filter_cutoff", self.filter_cutoff)?;
        let nyquist = self.nyquist();
        if self.filter_cutoff > nyquist {
            return Err(ReadoutError::InvalidParameter(
                crate::ErrorInfo::new(
                    "cutoff-above-nyquist",
                    "filter_cutoff exceeds the Nyquist limit of the sample rate",
                )
                .with_context("filter_cutoff", format!("{:e}", self.filter_cutoff))
                .with_context("nyquist", format!("{nyquist:e}"))
                .with_hint("lower the filter cutoff or raise the sample rate"),
            ));
        }
        Ok(*self)
    }

    /// Half the sample rate.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Attaches a readout window to the instrument description.
    pub fn with_readout_time(&self, readout_time: f64) -> NoiseParams {
        NoiseParams {
            snr: self.snr,
            sample_rate: self.sample_rate,
            filter_cutoff: self.filter_cutoff,
            readout_time,
        }
    }
}

/// Full electrical noise characterisation for one readout window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseParams {
    /// Voltage signal-to-noise ratio between the two charge levels.
    pub snr: f64,
    /// Digitiser sample rate in Hz.
    pub sample_rate: f64,
    /// -3 dB point of the limiting low-pass filter in Hz.
    pub filter_cutoff: f64,
    /// Readout window in seconds.
    pub readout_time: f64,
}

impl NoiseParams {
    /// Builds a validated noise description.
    pub fn new(
        snr: f64,
        sample_rate: f64,
        filter_cutoff: f64,
        readout_time: f64,
    ) -> Result<Self, ReadoutError> {
        Self {
            snr,
            sample_rate,
            filter_cutoff,
            readout_time,
        }
        .validated()
    }

    /// Returns a copy after checking every field.
    pub fn validated(&self) -> Result<Self, ReadoutError> {
        self.instrument().validated()?;
        validate::positive("readout_time", self.readout_time)?;
        Ok(*self)
    }

    /// Instrument part of the description.
    pub fn instrument(&self) -> InstrumentParams {
        InstrumentParams {
            snr: self.snr,
            sample_rate: self.sample_rate,
            filter_cutoff: self.filter_cutoff,
        }
    }
}
