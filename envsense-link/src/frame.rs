//! ASCII wire frame for the long-range link
//!
//! Exact grammar, one decimal place per field, comma separated, no
//! trailing delimiter:
//!
//! ```text
//! T:<temp>,H:<hum>,D:<db>
//! ```
//!
//! The same codec serves both ends: the transmitter encodes, the receiver
//! parses. Anything that deviates from the grammar (wrong tag, wrong field
//! count, unparsable number) is [`FrameError::Malformed`]; the receiver is
//! expected to fall back to showing the raw payload, never to fail.

use envsense_core::PhysicalReading;

use core::fmt::Write;
use thiserror_no_std::Error;

/// Longest well-formed frame: `T:-xx.x,H:xxx.x,D:xxxxx.x` plus margin
pub const MAX_FRAME_LEN: usize = 32;

/// Errors from the frame codec
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Payload does not match the `T:..,H:..,D:..` grammar
    #[error("malformed telemetry frame")]
    Malformed,
    /// Frame would exceed the fixed buffer (cannot happen for real readings)
    #[error("frame too long")]
    Overflow,
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Malformed => defmt::write!(fmt, "malformed frame"),
            Self::Overflow => defmt::write!(fmt, "frame too long"),
        }
    }
}

/// Parsed contents of a well-formed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryFrame {
    /// Temperature field in degrees Celsius
    pub temperature: f32,
    /// Humidity field in percent
    pub humidity: f32,
    /// Sound field in decibels
    pub sound_db: f32,
}

/// Encode a reading into the wire grammar
pub fn encode(reading: &PhysicalReading) -> Result<heapless::String<MAX_FRAME_LEN>, FrameError> {
    let mut out = heapless::String::new();
    write!(
        out,
        "T:{:.1},H:{:.1},D:{:.1}",
        reading.temperature,
        reading.humidity,
        reading.sound_db as f32,
    )
    .map_err(|_| FrameError::Overflow)?;
    Ok(out)
}

/// Parse a frame, rejecting anything outside the grammar
pub fn parse(input: &str) -> Result<TelemetryFrame, FrameError> {
    let mut fields = input.split(',');

    let temperature = field(fields.next(), "T")?;
    let humidity = field(fields.next(), "H")?;
    let sound_db = field(fields.next(), "D")?;

    if fields.next().is_some() {
        return Err(FrameError::Malformed);
    }

    Ok(TelemetryFrame { temperature, humidity, sound_db })
}

fn field(part: Option<&str>, tag: &str) -> Result<f32, FrameError> {
    let part = part.ok_or(FrameError::Malformed)?;
    let (name, value) = part.split_once(':').ok_or(FrameError::Malformed)?;
    if name != tag {
        return Err(FrameError::Malformed);
    }
    value.parse().map_err(|_| FrameError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_one_decimal_place() {
        let reading = PhysicalReading::new(25.34, 60.06, 75);
        let frame = encode(&reading).unwrap();
        assert_eq!(frame.as_str(), "T:25.3,H:60.1,D:75.0");
    }

    #[test]
    fn encodes_negative_temperature() {
        let reading = PhysicalReading::new(-3.25, 80.0, 40);
        let frame = encode(&reading).unwrap();
        assert_eq!(frame.as_str(), "T:-3.2,H:80.0,D:40.0");
    }

    #[test]
    fn parses_its_own_output() {
        let reading = PhysicalReading::new(25.3, 60.1, 75);
        let frame = encode(&reading).unwrap();

        let parsed = parse(&frame).unwrap();
        assert_eq!(parsed.temperature, 25.3);
        assert_eq!(parsed.humidity, 60.1);
        assert_eq!(parsed.sound_db, 75.0);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse("garbage"), Err(FrameError::Malformed));
        assert_eq!(parse(""), Err(FrameError::Malformed));
        assert_eq!(parse("T:25.0,H:60.0"), Err(FrameError::Malformed));
        assert_eq!(parse("T:25.0,H:60.0,D:70.0,X:1"), Err(FrameError::Malformed));
        assert_eq!(parse("T:25.0,X:60.0,D:70.0"), Err(FrameError::Malformed));
        assert_eq!(parse("T:abc,H:60.0,D:70.0"), Err(FrameError::Malformed));
    }
}
