//! Collaborator traits for the local feedback hardware
//!
//! Rendering code computes what to draw; these traits carry the result to
//! the actual 128x64 monochrome display and the 25-LED matrix. Keeping the
//! primitives this narrow lets tests record draw calls instead of pixels.

/// One RGB color on the LED matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// All channels off
    pub const OFF: Rgb = Rgb(0, 0, 0);
}

/// Monochrome frame display (128x64 in the reference hardware)
pub trait FrameSurface {
    /// Blank the frame buffer
    fn clear(&mut self);

    /// Draw text with the top-left corner at (x, y)
    fn draw_text(&mut self, x: i32, y: i32, text: &str);

    /// Draw a line between two points
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Draw a horizontal line of `len` pixels starting at (x, y)
    fn draw_hline(&mut self, x: i32, y: i32, len: u32);

    /// Push the frame buffer to the panel
    fn present(&mut self);
}

/// Addressable LED matrix, indexed in strip order
pub trait LedGrid {
    /// Set one LED; takes effect on the next flush
    fn set_pixel(&mut self, index: usize, color: Rgb);

    /// Latch all pixels set since the last flush
    fn flush(&mut self);
}

/// Single-channel analog input (joystick axis, microphone)
pub trait AnalogInput {
    /// Read one raw sample
    fn read_raw(&mut self) -> u16;
}
