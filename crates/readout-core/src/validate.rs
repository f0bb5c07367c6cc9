//! Domain checks applied to every public entry point before any arithmetic.

use crate::errors::ReadoutError;

/// Requires a finite, strictly positive value.
pub fn positive(name: &str, value: f64) -> Result<f64, ReadoutError> {
    if !value.is_finite() {
        return Err(ReadoutError::invalid(
            "non-finite",
            format!("{name} must be finite"),
            name,
            value,
        ));
    }
    if value <= 0.0 {
        return Err(ReadoutError::invalid(
            "non-positive",
            format!("{name} must be strictly positive"),
            name,
            value,
        ));
    }
    Ok(value)
}

/// Requires a finite value that is zero or positive.
pub fn non_negative(name: &str, value: f64) -> Result<f64, ReadoutError> {
    if !value.is_finite() {
        return Err(ReadoutError::invalid(
            "non-finite",
            format!("{name} must be finite"),
            name,
            value,
        ));
    }
    if value < 0.0 {
        return Err(ReadoutError::invalid(
            "negative-time",
            format!("{name} must not be negative"),
            name,
            value,
        ));
    }
    Ok(value)
}

/// Requires a probability in the closed unit interval.
pub fn probability(name: &str, value: f64) -> Result<f64, ReadoutError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ReadoutError::invalid(
            "probability-out-of-range",
            format!("{name} must lie in [0, 1]"),
            name,
            value,
        ));
    }
    Ok(value)
}

/// Requires a non-zero count, used for grid resolutions.
pub fn count(name: &str, value: usize) -> Result<usize, ReadoutError> {
    if value == 0 {
        return Err(ReadoutError::invalid(
            "empty-grid",
            format!("{name} must be at least one"),
            name,
            0.0,
        ));
    }
    Ok(value)
}
