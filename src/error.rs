//! Simulation-specific error types.
//!
//! The simulation itself never fails: degenerate generation yields fewer
//! objects and invalid transitions are no-ops.  Errors only surface while
//! validating a [`crate::config::GameConfig`] loaded from disk.

use std::fmt;

/// Top-level error enum for the orbits game.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Config constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// A `min`/`max` pair is inverted.
    InvertedRange {
        name: &'static str,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::InvertedRange { name, min, max } => {
                write!(f, "range '{}' is inverted: min {} > max {}", name, min, max)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn validate_non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error if `value` is NaN or infinite.
pub fn validate_finite(name: &'static str, value: f64) -> SimResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "finite",
        })
    }
}

/// Returns an error unless `value` lies in `(0.0, 1.0]`.
pub fn validate_unit_fraction(name: &'static str, value: f64) -> SimResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

/// Returns an error unless `value` is a probability in `[0.0, 1.0]`.
pub fn validate_probability(name: &'static str, value: f64) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if the debris count range is inverted.
pub fn validate_count_range(min: usize, max: usize) -> SimResult<()> {
    if min <= max {
        Ok(())
    } else {
        Err(SimError::InvertedRange {
            name: "debris_count",
            min,
            max,
        })
    }
}
