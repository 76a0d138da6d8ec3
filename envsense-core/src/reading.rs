//! The compensated reading flowing through the pipeline

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One complete set of compensated values
///
/// Built only from a fully successful sample cycle. A failed sensor read
/// short-circuits the cycle instead of mixing stale and fresh fields, so a
/// `PhysicalReading` is always internally consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhysicalReading {
    /// Air temperature in degrees Celsius
    pub temperature: f32,
    /// Relative humidity in percent
    pub humidity: f32,
    /// Ambient sound level in whole decibels
    pub sound_db: i16,
}

impl PhysicalReading {
    /// Construct a reading from already-compensated values
    pub const fn new(temperature: f32, humidity: f32, sound_db: i16) -> Self {
        Self { temperature, humidity, sound_db }
    }
}
