//! Rolling per-channel history
//!
//! One fixed window per displayed channel, fed once per successful sample
//! and read back by the chart renderer for whichever mode is active.

use crate::mode::DisplayMode;

use envsense_core::buffer::{HistoryBuffer, HISTORY_LEN};
use envsense_core::PhysicalReading;

/// Mutable per-node state shared across loop ticks
#[derive(Debug)]
pub struct NodeContext {
    temperature: HistoryBuffer<HISTORY_LEN>,
    humidity: HistoryBuffer<HISTORY_LEN>,
    sound: HistoryBuffer<HISTORY_LEN>,
}

impl NodeContext {
    /// Empty histories
    pub const fn new() -> Self {
        Self {
            temperature: HistoryBuffer::new(),
            humidity: HistoryBuffer::new(),
            sound: HistoryBuffer::new(),
        }
    }

    /// Append one reading to all three windows
    pub fn push(&mut self, reading: &PhysicalReading) {
        self.temperature.push(reading.temperature);
        self.humidity.push(reading.humidity);
        self.sound.push(reading.sound_db as f32);
    }

    /// The window backing a display mode's chart
    pub fn history_for(&self, mode: DisplayMode) -> &HistoryBuffer<HISTORY_LEN> {
        match mode {
            DisplayMode::Noise => &self.sound,
            DisplayMode::Temperature => &self.temperature,
            DisplayMode::Humidity => &self.humidity,
        }
    }
}

impl Default for NodeContext {
    fn default() -> Self {
        Self::new()
    }
}
