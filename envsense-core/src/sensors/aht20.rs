//! AHT20 humidity/temperature driver
//!
//! The device has no calibration block; raw counts map to physical units
//! through fixed formulas over 20-bit fields:
//!
//! ```text
//! result bytes: [status, h0, h1, h2|t0, t1, t2]
//! raw_hum  = ((h0 << 16) | (h1 << 8) | h2) >> 4          (top 20 bits)
//! raw_temp = ((h2 & 0x0F) << 16) | (t1 << 8) | t2        (low 20 bits)
//!
//! humidity    = raw_hum  / 2^20 * 100          [%RH]
//! temperature = raw_temp / 2^20 * 200 - 50     [degC]
//! ```
//!
//! The raw field is assembled entirely with integer shifts; the single
//! float division happens once at the end to avoid precision loss.

use crate::errors::{SensorError, SensorResult};
use crate::traits::{DelaySource, SensorBus};

/// Default I2C address
pub const AHT20_ADDR: u8 = 0x38;

const CMD_INIT: [u8; 1] = [0xBE];
const CMD_TRIGGER: [u8; 3] = [0xAC, 0x33, 0x00];

/// Wait between conversion trigger and result read
const CONVERSION_WAIT_MS: u32 = 80;
/// Settle time before the device accepts commands after power-on
const POWER_ON_WAIT_MS: u32 = 20;
const INIT_WAIT_MS: u32 = 10;

const RESULT_LEN: usize = 6;
const FULL_SCALE: f32 = 1_048_576.0; // 2^20

/// AHT20 device handle
///
/// Holds only the bus address; bus and delay are passed per call.
#[derive(Debug, Clone)]
pub struct Aht20 {
    addr: u8,
}

impl Default for Aht20 {
    fn default() -> Self {
        Self { addr: AHT20_ADDR }
    }
}

impl Aht20 {
    /// Create a handle at a non-default address
    pub const fn with_address(addr: u8) -> Self {
        Self { addr }
    }

    /// Soft-initialize the device
    pub fn init<B: SensorBus, D: DelaySource>(
        &self,
        bus: &mut B,
        delay: &mut D,
    ) -> SensorResult<()> {
        delay.delay_ms(POWER_ON_WAIT_MS);
        bus.write(self.addr, &CMD_INIT)?;
        delay.delay_ms(INIT_WAIT_MS);
        Ok(())
    }

    /// Run one conversion cycle and return (temperature degC, humidity %RH)
    ///
    /// Triggers the conversion, waits the fixed window, reads the six
    /// result bytes and decodes both channels from the one read. A short
    /// read means the device did not answer in time.
    pub fn read<B: SensorBus, D: DelaySource>(
        &self,
        bus: &mut B,
        delay: &mut D,
    ) -> SensorResult<(f32, f32)> {
        bus.write(self.addr, &CMD_TRIGGER)?;
        delay.delay_ms(CONVERSION_WAIT_MS);

        let mut data = [0u8; RESULT_LEN];
        let got = bus.read(self.addr, &mut data)?;
        if got != RESULT_LEN {
            log_warn!("aht20: short result read ({got}/{RESULT_LEN} bytes)");
            return Err(SensorError::BusTimeout);
        }

        Ok(decode(&data))
    }
}

/// Decode a 6-byte result frame into (temperature, humidity)
pub fn decode(data: &[u8; RESULT_LEN]) -> (f32, f32) {
    let raw_hum =
        (((data[1] as u32) << 16) | ((data[2] as u32) << 8) | data[3] as u32) >> 4;
    let raw_temp =
        (((data[3] & 0x0F) as u32) << 16) | ((data[4] as u32) << 8) | data[5] as u32;

    let humidity = (raw_hum as f32 / FULL_SCALE) * 100.0;
    let temperature = (raw_temp as f32 / FULL_SCALE) * 200.0 - 50.0;

    (temperature, humidity)
}
