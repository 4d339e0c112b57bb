//! Error types for signal analysis and engine configuration.
//!
//! Zero-magnitude harmonics are not errors: they are represented as a
//! coefficient with `amplitude = 0, phase = 0`.

use thiserror::Error;

/// Errors raised while building or analysing a signal.
///
/// All of these are configuration errors: they surface before the
/// render loop starts and are never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EpicycleError {
    /// A parameter is outside its valid domain (non-positive density,
    /// too few control points, non-increasing theta, ...).
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what's wrong with the parameter
        message: String,
    },

    /// A sample was requested outside the signal domain `[min, max)`.
    #[error("Theta {theta} outside signal domain [{min}, {max})")]
    OutOfRange {
        /// Requested position
        theta: f64,
        /// Inclusive lower bound of the domain
        min: f64,
        /// Exclusive upper bound of the domain
        max: f64,
    },
}

impl EpicycleError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(theta: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange { theta, min, max }
    }
}

pub type Result<T> = std::result::Result<T, EpicycleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EpicycleError::invalid_parameter("density must be > 0");
        assert_eq!(err.to_string(), "Invalid parameter: density must be > 0");

        let err = EpicycleError::out_of_range(1.5, 0.0, 1.0);
        assert_eq!(err.to_string(), "Theta 1.5 outside signal domain [0, 1)");
    }
}
