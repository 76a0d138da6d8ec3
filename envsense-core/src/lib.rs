//! Sensor core for Envsense telemetry nodes
//!
//! Turns raw register traffic from the environmental sensors into physical
//! units and qualitative states. Designed for small edge devices:
//!
//! - No heap allocation anywhere in the sampling path
//! - Hardware reached only through the narrow [`traits::SensorBus`] and
//!   [`traits::DelaySource`] seams, so everything is testable on the host
//! - Compensation math kept in integer form until the final conversion
//!
//! ```no_run
//! use envsense_core::{classify, Classification, IdealRange};
//!
//! let range = IdealRange::new(20.0, 26.0);
//! match classify(23.5, range) {
//!     Classification::Ideal => {}      // in the comfort band
//!     Classification::Alert => {}      // below it
//!     Classification::Acceptable => {} // above it
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Optional logging, compiled out entirely when the `log` feature is off.
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod buffer;
pub mod classify;
pub mod errors;
pub mod reading;
pub mod sensors;
pub mod sound;
pub mod time;
pub mod traits;

// Public API
pub use classify::{classify, Classification, IdealRange};
pub use errors::{SensorError, SensorResult};
pub use reading::PhysicalReading;
pub use sound::SoundLevelEstimator;

/// Crate version, from the package manifest
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
