#![deny(missing_docs)]
#![doc = "Composition of state-to-charge and electrical readout fidelities, run configuration and the end-to-end benchmark pipeline."]

/// Two-stage fidelity composition.
pub mod compose;
/// Run configuration and its file formats.
pub mod config;
/// End-to-end benchmark of one configuration.
pub mod pipeline;
/// Readout window scans.
pub mod scan;
/// JSON and YAML helpers.
pub mod serde;

pub use compose::{overall_fidelity, OverallFidelity};
pub use config::{load_config, save_config, ReadoutConfig, SweepConfig};
pub use pipeline::{benchmark, ReadoutReport};
pub use scan::{log_spaced_times, scan_readout_times, ScanReport};
