#![deny(missing_docs)]
#![doc = "Shared parameter records, domain validation and the structured error type used by the readout fidelity crates."]

pub mod errors;
/// Canonical JSON encoding and stable hashing of result payloads.
pub mod hash;
mod params;
pub mod validate;

pub use errors::{ErrorInfo, ReadoutError};
pub use hash::{stable_hash_string, to_canonical_json_bytes};
pub use params::{InstrumentParams, NoiseParams, ReadoutTime, RelaxationParams};
