//! Display-mode state machine
//!
//! Three modes cycle under control of one noisy analog axis. A push below
//! the low threshold steps backwards, a push above the high threshold
//! steps forwards, the dead zone between them does nothing. Every
//! transition arms a debounce window during which the axis is ignored, so
//! a held stick advances one mode per window instead of spinning.
//!
//! The boundary behavior is deliberately asymmetric: the backwards step is
//! refused while already in `Noise` and the forwards step while already in
//! `Humidity`, even though [`DisplayMode::next`] and [`DisplayMode::prev`]
//! themselves wrap around. The effect is a clamped sweep
//! Noise <-> Temperature <-> Humidity rather than a free ring. This quirk
//! is inherited behavior; tests pin it so it cannot change silently.

use crate::config::NodeConfig;

use envsense_core::time::Timestamp;
use envsense_core::PhysicalReading;

/// What the node currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    /// Concentric-ring sound level view
    Noise = 0,
    /// Color-gradient temperature view
    Temperature = 1,
    /// Proportional-fill humidity view
    Humidity = 2,
}

impl DisplayMode {
    /// Successor with wraparound (modulo 3)
    pub const fn next(self) -> DisplayMode {
        match self {
            DisplayMode::Noise => DisplayMode::Temperature,
            DisplayMode::Temperature => DisplayMode::Humidity,
            DisplayMode::Humidity => DisplayMode::Noise,
        }
    }

    /// Predecessor with wraparound (modulo 3)
    pub const fn prev(self) -> DisplayMode {
        match self {
            DisplayMode::Noise => DisplayMode::Humidity,
            DisplayMode::Temperature => DisplayMode::Noise,
            DisplayMode::Humidity => DisplayMode::Temperature,
        }
    }

    /// Title shown on the readout line
    pub const fn title(self) -> &'static str {
        match self {
            DisplayMode::Noise => "Noise",
            DisplayMode::Temperature => "Temp",
            DisplayMode::Humidity => "Humidity",
        }
    }

    /// Unit suffix for the readout line
    pub const fn unit(self) -> &'static str {
        match self {
            DisplayMode::Noise => "dB",
            DisplayMode::Temperature => "C",
            DisplayMode::Humidity => "%",
        }
    }

    /// The channel value this mode displays
    pub fn value_of(self, reading: &PhysicalReading) -> f32 {
        match self {
            DisplayMode::Noise => reading.sound_db as f32,
            DisplayMode::Temperature => reading.temperature,
            DisplayMode::Humidity => reading.humidity,
        }
    }
}

/// Debounced, hysteresis-guarded mode switcher
pub struct ModeController {
    mode: DisplayMode,
    axis_low: u16,
    axis_high: u16,
    debounce_ms: u64,
    /// Axis is ignored until this instant
    held_until: Timestamp,
}

impl ModeController {
    /// Build from the node configuration; initial mode is Noise
    pub fn new(config: &NodeConfig) -> Self {
        Self {
            mode: DisplayMode::Noise,
            axis_low: config.axis_low,
            axis_high: config.axis_high,
            debounce_ms: config.debounce_ms,
            held_until: 0,
        }
    }

    /// Current mode without sampling the axis
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Feed one axis sample; returns the (possibly new) mode
    pub fn update(&mut self, axis: u16, now: Timestamp) -> DisplayMode {
        if now < self.held_until {
            return self.mode;
        }

        if axis < self.axis_low && self.mode != DisplayMode::Noise {
            self.mode = self.mode.prev();
            self.held_until = now + self.debounce_ms;
        } else if axis > self.axis_high && self.mode != DisplayMode::Humidity {
            self.mode = self.mode.next();
            self.held_until = now + self.debounce_ms;
        }

        self.mode
    }
}
