//! Sound level estimation from raw microphone samples
//!
//! A burst of ADC counts is reduced to a single decibel figure: mean, RMS
//! of the deviations from the mean, counts scaled to volts against the
//! full-scale reference, then `20 * log10(v / reference)`.
//!
//! The logarithm is never evaluated on a non-positive argument. A silent or
//! degenerate burst (zero variance, empty slice) is defined as 0 dB rather
//! than an error or NaN, so the display path never has to special-case it.

use libm::{log10f, sqrtf};

/// RMS-to-decibel estimator with fixed ADC calibration
#[derive(Debug, Clone)]
pub struct SoundLevelEstimator {
    /// Full-scale ADC count
    full_scale: f32,
    /// ADC reference voltage
    vref: f32,
    /// Voltage corresponding to 0 dB
    reference: f32,
}

impl Default for SoundLevelEstimator {
    fn default() -> Self {
        Self {
            // 12-bit effective samples (16-bit reads shifted down by 4)
            full_scale: 4095.0,
            vref: 3.3,
            // 20 uPa equivalent, the conventional hearing threshold
            reference: 0.000_02,
        }
    }
}

impl SoundLevelEstimator {
    /// Create an estimator with explicit ADC calibration
    pub fn new(full_scale: f32, vref: f32, reference: f32) -> Self {
        Self { full_scale, vref, reference }
    }

    /// Estimate the sound level of one sample burst in whole decibels
    pub fn estimate_db(&self, samples: &[u16]) -> i16 {
        if samples.is_empty() {
            return 0;
        }

        let len = samples.len() as f32;
        let mean = samples.iter().map(|&s| s as f32).sum::<f32>() / len;

        let mean_sq = samples
            .iter()
            .map(|&s| {
                let d = s as f32 - mean;
                d * d
            })
            .sum::<f32>()
            / len;
        let rms = sqrtf(mean_sq);

        let voltage = (rms / self.full_scale) * self.vref;
        if voltage <= 0.0 {
            return 0;
        }

        (20.0 * log10f(voltage / self.reference)) as i16
    }
}
