use readout_core::{ErrorInfo, ReadoutError};
use serde::{de::DeserializeOwned, Serialize};

fn serde_error(code: &str, err: impl ToString) -> ReadoutError {
    ReadoutError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Deserialises a JSON payload.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, ReadoutError> {
    serde_json::from_slice(data).map_err(|err| serde_error("json-deserialize", err))
}

/// Serialises a value as indented JSON.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, ReadoutError> {
    serde_json::to_string_pretty(value).map_err(|err| serde_error("json-serialize", err))
}

/// Serialises a value as YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, ReadoutError> {
    serde_yaml::to_string(value).map_err(|err| serde_error("yaml-serialize", err))
}

/// Deserialises a YAML payload.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, ReadoutError> {
    serde_yaml::from_slice(data).map_err(|err| serde_error("yaml-deserialize", err))
}
