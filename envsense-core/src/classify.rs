//! Qualitative classification against ideal ranges
//!
//! Every channel has a closed comfort interval. A reading below it is an
//! alert, inside it is ideal, above it is merely acceptable. The mapping is
//! a pure function evaluated fresh each cycle; there is deliberately no
//! hysteresis, the display is expected to flicker at a boundary rather
//! than lag behind the measurement.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Qualitative state of a reading relative to its ideal range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Classification {
    /// Below the ideal range
    Alert = 0,
    /// Inside the ideal range (bounds inclusive)
    Ideal = 1,
    /// Above the ideal range
    Acceptable = 2,
}

impl Classification {
    /// Human-readable label for the status line
    pub const fn label(&self) -> &'static str {
        match self {
            Classification::Alert => "Alert",
            Classification::Ideal => "Ideal",
            Classification::Acceptable => "Acceptable",
        }
    }
}

/// Closed interval of preferred values for a channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdealRange {
    /// Lower bound, inclusive
    pub low: f32,
    /// Upper bound, inclusive
    pub high: f32,
}

impl IdealRange {
    /// Create a range, swapping the bounds if given in the wrong order
    pub fn new(low: f32, high: f32) -> Self {
        if low > high {
            Self { low: high, high: low }
        } else {
            Self { low, high }
        }
    }
}

/// Classify a value against its ideal range
pub fn classify(value: f32, range: IdealRange) -> Classification {
    if value < range.low {
        Classification::Alert
    } else if value <= range.high {
        Classification::Ideal
    } else {
        Classification::Acceptable
    }
}
