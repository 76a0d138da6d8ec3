//! Error types for the sampling path
//!
//! The taxonomy follows the recovery policy, not the hardware:
//!
//! - [`SensorError::CalibrationRead`] is fatal to that sensor. Without the
//!   coefficient block there is no way to compensate raw counts, so the
//!   error is surfaced instead of silently defaulting.
//! - [`SensorError::BusTimeout`] is recoverable: the caller skips this poll
//!   and retries at the next tick. Drivers never retry internally.
//! - [`SensorError::BusFault`] covers everything else the bus layer can
//!   report; treated like a timeout by callers.
//!
//! Errors are `Copy` and carry only scalars or `&'static str`, so they can
//! cross the loop boundary and sit in return paths without allocation.

use thiserror_no_std::Error;

/// Result type for sensor operations
pub type SensorResult<T> = Result<T, SensorError>;

/// Errors produced while talking to a sensor
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The fixed-size calibration block came back short
    #[error("calibration block short read: expected {expected} bytes, got {got}")]
    CalibrationRead {
        /// Size of the calibration register block
        expected: usize,
        /// Bytes the bus actually returned
        got: usize,
    },

    /// No response within the conversion wait window
    #[error("bus timeout waiting for conversion")]
    BusTimeout,

    /// Bus-level failure outside the timeout path
    #[error("bus fault: {0}")]
    BusFault(&'static str),
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::CalibrationRead { expected, got } =>
                defmt::write!(fmt, "calibration short read: expected {}, got {}", expected, got),
            Self::BusTimeout =>
                defmt::write!(fmt, "bus timeout"),
            Self::BusFault(reason) =>
                defmt::write!(fmt, "bus fault: {}", reason),
        }
    }
}
