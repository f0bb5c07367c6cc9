use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, ReadoutError};

fn map_err(err: serde_json::Error, code: &str) -> ReadoutError {
    ReadoutError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Serialises a payload to compact JSON with object keys in sorted order.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, ReadoutError> {
    // Round-trip through `Value` so struct fields and maps share one ordering.
    let value = serde_json::to_value(value).map_err(|err| map_err(err, "canonical-encode"))?;
    serde_json::to_vec(&value).map_err(|err| map_err(err, "canonical-encode"))
}

/// Computes a stable hexadecimal SHA-256 hash of the canonical JSON payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, ReadoutError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
