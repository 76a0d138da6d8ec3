//! Base-station display helper
//!
//! The receiving end of the radio link shows whatever arrives: a payload
//! that parses as a telemetry frame becomes three labelled lines, anything
//! else is shown raw so a misbehaving sender is still visible.
//!
//! Besides telemetry, the sender can transmit single-byte commands that
//! drive the station's three status LEDs, used for link checks from the
//! field. Commands are also shown on the display (through the raw
//! fallback), matching the rest of the anything-arrives-gets-shown policy.

use crate::display::FrameSurface;

use envsense_link::frame;

use core::fmt::Write;

/// State of the station's discrete status LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Red LED on, others off
    Red,
    /// Green LED on, others off
    Green,
    /// Blue LED on, others off
    Blue,
    /// All LEDs off
    Off,
}

/// Collaborator seam for the three station LEDs
pub trait StatusLeds {
    /// Switch to the given state; at most one LED is lit at a time
    fn set(&mut self, color: StatusColor);
}

/// Decode a single-byte status command, if the payload is one
pub fn parse_command(payload: &[u8]) -> Option<StatusColor> {
    match payload {
        b"1" => Some(StatusColor::Red),
        b"2" => Some(StatusColor::Green),
        b"3" => Some(StatusColor::Blue),
        b"4" => Some(StatusColor::Off),
        _ => None,
    }
}

/// Handle one received payload: display it, then apply any LED command
pub fn handle_payload<F: FrameSurface, L: StatusLeds>(
    surface: &mut F,
    leds: &mut L,
    payload: &[u8],
) {
    show_frame(surface, payload);
    if let Some(color) = parse_command(payload) {
        leds.set(color);
    }
}

/// Render one received payload on the station display
pub fn show_frame<F: FrameSurface>(surface: &mut F, payload: &[u8]) {
    surface.clear();

    match core::str::from_utf8(payload).ok().and_then(|text| frame::parse(text).ok()) {
        Some(reading) => {
            let mut line: heapless::String<32> = heapless::String::new();
            let _ = write!(line, "Temp: {:.1}C", reading.temperature);
            surface.draw_text(0, 0, &line);

            line.clear();
            let _ = write!(line, "Humidity: {:.1}%", reading.humidity);
            surface.draw_text(0, 15, &line);

            line.clear();
            let _ = write!(line, "Noise: {:.1}dB", reading.sound_db);
            surface.draw_text(0, 30, &line);
        }
        None => {
            let raw = core::str::from_utf8(payload).unwrap_or("<binary>");
            surface.draw_text(0, 0, raw);
        }
    }

    surface.present();
}
