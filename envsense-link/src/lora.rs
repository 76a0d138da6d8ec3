//! Long-range radio link
//!
//! Best-effort acknowledged delivery of the ASCII telemetry frame to a
//! fixed peer address. Success and failure are logged only; the caller
//! never sees an error from this path. A node whose radio failed to
//! initialize simply holds no [`LoraLink`] at all and the dispatcher
//! degrades the long-range path to a no-op.

use crate::frame;
use crate::LoraRadio;

use envsense_core::PhysicalReading;

/// Transmit half of the long-range link
pub struct LoraLink<R: LoraRadio> {
    radio: R,
    dest: u8,
}

impl<R: LoraRadio> LoraLink<R> {
    /// Bind a radio to a fixed peer address
    pub fn new(radio: R, dest: u8) -> Self {
        Self { radio, dest }
    }

    /// Send one reading; returns whether the peer acknowledged
    pub fn send(&mut self, reading: &PhysicalReading) -> bool {
        let payload = match frame::encode(reading) {
            Ok(payload) => payload,
            Err(e) => {
                log_warn!("lora: frame encode failed: {e}");
                return false;
            }
        };

        let acked = self.radio.send_acked(payload.as_bytes(), self.dest);
        if acked {
            log_debug!("lora: sent {payload}");
        } else {
            log_warn!("lora: no ack from peer {}", self.dest);
        }
        acked
    }
}
