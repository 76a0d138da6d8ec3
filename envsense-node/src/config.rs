//! Node configuration
//!
//! All tunables in one place, owned by the node instead of scattered
//! module globals. Defaults mirror the reference hardware: a 5x5 LED
//! matrix, a 128x64 panel, a joystick axis on a 16-bit ADC and the
//! comfort bands for an indoor environment.

use crate::display::Rgb;

use envsense_core::IdealRange;

/// Static node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Comfort band for temperature in degrees Celsius
    pub temp_ideal: IdealRange,
    /// Comfort band for relative humidity in percent
    pub hum_ideal: IdealRange,
    /// Comfort band for sound level in decibels
    pub db_ideal: IdealRange,

    /// Axis value below which the controller steps to the previous mode
    pub axis_low: u16,
    /// Axis value above which the controller steps to the next mode
    pub axis_high: u16,
    /// Window after a mode change during which the axis is ignored
    pub debounce_ms: u64,

    /// Telemetry dispatch interval
    pub dispatch_interval_ms: u64,
    /// Microphone samples per sound estimate
    pub mic_burst: usize,
    /// Pause between loop ticks
    pub loop_period_ms: u32,

    /// Cold end of the temperature gradient
    pub color_cold: Rgb,
    /// Hot end of the temperature gradient
    pub color_hot: Rgb,
    /// Humidity fill color
    pub color_humidity: Rgb,
    /// Waiting-for-connection pattern color
    pub color_waiting: Rgb,
    /// Connected pattern color
    pub color_connected: Rgb,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            temp_ideal: IdealRange::new(20.0, 26.0),
            hum_ideal: IdealRange::new(40.0, 60.0),
            db_ideal: IdealRange::new(50.0, 80.0),

            axis_low: 24_000,
            axis_high: 41_000,
            debounce_ms: 300,

            dispatch_interval_ms: 2000,
            mic_burst: 500,
            loop_period_ms: 100,

            color_cold: Rgb(0, 0, 50),
            color_hot: Rgb(50, 0, 0),
            color_humidity: Rgb(0, 0, 50),
            color_waiting: Rgb(0, 0, 50),
            color_connected: Rgb(0, 50, 0),
        }
    }
}

impl NodeConfig {
    /// Ideal range for a display mode's channel
    pub fn ideal_for(&self, mode: crate::mode::DisplayMode) -> IdealRange {
        match mode {
            crate::mode::DisplayMode::Noise => self.db_ideal,
            crate::mode::DisplayMode::Temperature => self.temp_ideal,
            crate::mode::DisplayMode::Humidity => self.hum_ideal,
        }
    }
}
