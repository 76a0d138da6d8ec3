//! Mode-specific rendering
//!
//! Two output devices per tick: the LED matrix gets the glanceable
//! encoding (rings for noise, gradient rows for temperature, proportional
//! fill for humidity) and the monochrome panel gets the numeric readout,
//! the classification label and the rolling history chart with its
//! ideal-band markers.
//!
//! The encoders themselves are pure functions so the math is tested
//! without any drawing; [`Renderer`] only turns their results into trait
//! calls.

use crate::config::NodeConfig;
use crate::display::{FrameSurface, LedGrid, Rgb};
use crate::mode::DisplayMode;

use envsense_core::buffer::HistoryBuffer;
use envsense_core::{Classification, IdealRange};

use core::fmt::Write;

/// Strip indices of the 5x5 matrix in row-major display order
///
/// The physical strip snakes through the panel; this table flattens it so
/// row 0 is the top row as seen by the user.
pub const LED_MATRIX: [[usize; 5]; 5] = [
    [24, 23, 22, 21, 20],
    [15, 16, 17, 18, 19],
    [14, 13, 12, 11, 10],
    [5, 6, 7, 8, 9],
    [4, 3, 2, 1, 0],
];

/// Concentric rings around the center LED, innermost first
pub const NOISE_RINGS: [&[usize]; 5] = [
    &[12],
    &[11, 13, 7, 17],
    &[10, 14, 2, 16, 8, 18, 22, 6],
    &[9, 15, 1, 19, 3, 21, 5, 23],
    &[4, 20, 0, 24],
];

const RING_GREEN: Rgb = Rgb(0, 50, 0);
const RING_YELLOW: Rgb = Rgb(50, 50, 0);
const RING_RED: Rgb = Rgb(50, 0, 0);

/// Cold end of the temperature gradient band in degC
const TEMP_COLD: f32 = 15.0;
/// Hot end of the temperature gradient band in degC
const TEMP_HOT: f32 = 30.0;

/// Chart area on the 128x64 panel
const CHART_X_RANGE: i32 = 127;
const CHART_Y: i32 = 20;
const CHART_H: i32 = 40;
const PANEL_W: u32 = 128;

/// Number of lit rings for a sound level: clamp((db - 40) / 10, 0, 4)
pub fn ring_count(db: i16) -> usize {
    ((db as i32 - 40) / 10).clamp(0, 4) as usize
}

/// Ring color band: levels 0-1 green, 2-3 yellow, 4 red
pub fn ring_color(level: usize) -> Rgb {
    if level <= 1 {
        RING_GREEN
    } else if level <= 3 {
        RING_YELLOW
    } else {
        RING_RED
    }
}

/// Gradient color and lit-row count for a temperature
///
/// Linear blend from the cold color to the hot color across the fixed
/// 15-30 degC band, clamped outside it; row count sweeps 1..=5 with the
/// same ratio.
pub fn temperature_visual(temp: f32, config: &NodeConfig) -> (Rgb, usize) {
    if temp <= TEMP_COLD {
        return (config.color_cold, 1);
    }
    if temp >= TEMP_HOT {
        return (config.color_hot, 5);
    }

    let ratio = (temp - TEMP_COLD) / (TEMP_HOT - TEMP_COLD);
    let blend = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * ratio) as u8;
    let color = Rgb(
        blend(config.color_cold.0, config.color_hot.0),
        blend(config.color_cold.1, config.color_hot.1),
        blend(config.color_cold.2, config.color_hot.2),
    );
    let rows = 1 + (4.0 * ratio) as usize;
    (color, rows)
}

/// Number of lit LEDs for a humidity: floor(hum / 4), clamped to the grid
pub fn humidity_fill(hum: f32) -> usize {
    ((hum / 4.0) as usize).min(25)
}

/// Turns encoder results into draw calls on the two output devices
pub struct Renderer<F: FrameSurface, L: LedGrid> {
    surface: F,
    grid: L,
}

impl<F: FrameSurface, L: LedGrid> Renderer<F, L> {
    /// Bind the two output devices
    pub fn new(surface: F, grid: L) -> Self {
        Self { surface, grid }
    }

    /// Render one full frame for the current mode
    pub fn render<const N: usize>(
        &mut self,
        mode: DisplayMode,
        value: f32,
        classification: Classification,
        history: &HistoryBuffer<N>,
        config: &NodeConfig,
    ) {
        match mode {
            DisplayMode::Noise => self.draw_noise_rings(value as i16),
            DisplayMode::Temperature => self.draw_temperature_rows(value, config),
            DisplayMode::Humidity => self.draw_humidity_fill(value, config),
        }

        self.draw_panel(mode, value, classification, history, config.ideal_for(mode));
    }

    /// Waiting / connected pattern shown during startup
    ///
    /// Cross in the center while waiting, cross plus corners once a
    /// central is attached.
    pub fn draw_connection_status(&mut self, connected: bool, config: &NodeConfig) {
        let (color, pattern): (Rgb, &[usize]) = if connected {
            (config.color_connected, &[12, 6, 8, 16, 18, 0, 4, 20, 24])
        } else {
            (config.color_waiting, &[12, 6, 8, 16, 18])
        };

        self.fill_grid(Rgb::OFF);
        for &led in pattern {
            self.grid.set_pixel(led, color);
        }
        self.grid.flush();
    }

    /// Startup banner on the panel
    pub fn draw_banner(&mut self, line1: &str, line2: &str) {
        self.surface.clear();
        self.surface.draw_text(0, 10, line1);
        self.surface.draw_text(0, 25, line2);
        self.surface.present();
    }

    fn draw_noise_rings(&mut self, db: i16) {
        let level = ring_count(db);
        let color = ring_color(level);

        self.fill_grid(Rgb::OFF);
        for ring in NOISE_RINGS.iter().take(level + 1) {
            for &led in *ring {
                self.grid.set_pixel(led, color);
            }
        }
        self.grid.flush();
    }

    fn draw_temperature_rows(&mut self, temp: f32, config: &NodeConfig) {
        let (color, rows) = temperature_visual(temp, config);

        self.fill_grid(Rgb::OFF);
        // Fill bottom-up: row 4 of the table is the bottom row
        for row in 0..rows {
            for &led in &LED_MATRIX[4 - row] {
                self.grid.set_pixel(led, color);
            }
        }
        self.grid.flush();
    }

    fn draw_humidity_fill(&mut self, hum: f32, config: &NodeConfig) {
        let lit = humidity_fill(hum);

        let mut index = 0;
        for row in &LED_MATRIX {
            for &led in row {
                let color = if index < lit { config.color_humidity } else { Rgb::OFF };
                self.grid.set_pixel(led, color);
                index += 1;
            }
        }
        self.grid.flush();
    }

    fn draw_panel<const N: usize>(
        &mut self,
        mode: DisplayMode,
        value: f32,
        classification: Classification,
        history: &HistoryBuffer<N>,
        ideal: IdealRange,
    ) {
        self.surface.clear();

        let mut line: heapless::String<32> = heapless::String::new();
        let _ = write!(line, "{}: {:.1}{}", mode.title(), value, mode.unit());
        self.surface.draw_text(0, 0, &line);

        line.clear();
        let _ = write!(line, "Status: {}", classification.label());
        self.surface.draw_text(0, 12, &line);

        self.draw_chart(history, ideal);
        self.surface.present();
    }

    /// Rolling polyline scaled to the window min/max, with one horizontal
    /// marker per ideal bound when it falls inside the visible range
    fn draw_chart<const N: usize>(&mut self, history: &HistoryBuffer<N>, ideal: IdealRange) {
        let len = history.len();
        if len < 2 {
            return;
        }

        // min/max are Some because the buffer is non-empty
        let min = history.min().unwrap_or(0.0);
        let max = history.max().unwrap_or(0.0);
        // Flat window degenerates to a flat line, not a division by zero
        let range = if max > min { max - min } else { 1.0 };

        let x_of = |i: usize| (i as i32 * CHART_X_RANGE) / (len as i32 - 1);
        let y_of = |v: f32| CHART_Y + CHART_H - ((v - min) * CHART_H as f32 / range) as i32;

        let mut prev: Option<(i32, i32)> = None;
        for (i, v) in history.iter().enumerate() {
            let point = (x_of(i), y_of(v));
            if let Some((px, py)) = prev {
                self.surface.draw_line(px, py, point.0, point.1);
            }
            prev = Some(point);
        }

        for bound in [ideal.low, ideal.high] {
            if bound >= min && bound <= max && max > min {
                self.surface.draw_hline(0, y_of(bound), PANEL_W);
            }
        }
    }

    fn fill_grid(&mut self, color: Rgb) {
        for index in 0..25 {
            self.grid.set_pixel(index, color);
        }
    }

    /// The panel half, for error reporting at the top level
    pub fn surface_mut(&mut self) -> &mut F {
        &mut self.surface
    }
}
