//! BMP280 pressure/temperature driver
//!
//! Compensation is the classic two-stage fixed-point algorithm:
//!
//! 1. Temperature stage: raw ADC temperature plus the three T coefficients
//!    yield the compensated temperature and the intermediate
//!    "fine temperature" integer.
//! 2. Pressure stage: raw ADC pressure, the nine P coefficients and the
//!    fine-temperature term, carried through 64-bit intermediates.
//!
//! The two stages share `t_fine`; it is computed once per poll and handed
//! to the pressure stage so the value cannot drift between the stages.
//! The pressure formula divides by a calibration-dependent denominator
//! that can legitimately be zero; in that case the result is defined as
//! 0 Pa, not an error.
//!
//! The compensation routines are pure methods on [`CalibrationConstants`],
//! so the math is testable without any bus traffic.

use crate::errors::{SensorError, SensorResult};
use crate::traits::{DelaySource, SensorBus};

/// Default I2C address
pub const BMP280_ADDR: u8 = 0x76;

const REG_CALIBRATION: u8 = 0x88;
const REG_CONTROL: u8 = 0xF4;
const REG_DATA: u8 = 0xF7;

/// Normal mode, temperature and pressure oversampling x1
const CTRL_NORMAL_X1: u8 = 0x27;

const CALIBRATION_LEN: usize = 24;
const DATA_LEN: usize = 6;

/// Calibration coefficients read once from the fixed register block
///
/// Loaded at init and never mutated afterwards; the block layout is
/// little-endian, one unsigned leading word per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationConstants {
    dig_t1: u16,
    dig_t2: i16,
    dig_t3: i16,
    dig_p1: u16,
    dig_p2: i16,
    dig_p3: i16,
    dig_p4: i16,
    dig_p5: i16,
    dig_p6: i16,
    dig_p7: i16,
    dig_p8: i16,
    dig_p9: i16,
}

impl CalibrationConstants {
    /// Parse the 24-byte calibration block
    pub fn from_block(block: &[u8; CALIBRATION_LEN]) -> Self {
        let u = |i: usize| u16::from_le_bytes([block[i], block[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([block[i], block[i + 1]]);

        Self {
            dig_t1: u(0),
            dig_t2: s(2),
            dig_t3: s(4),
            dig_p1: u(6),
            dig_p2: s(8),
            dig_p3: s(10),
            dig_p4: s(12),
            dig_p5: s(14),
            dig_p6: s(16),
            dig_p7: s(18),
            dig_p8: s(20),
            dig_p9: s(22),
        }
    }

    /// Build constants directly, for tests and golden vectors
    #[allow(clippy::too_many_arguments)]
    pub const fn from_coefficients(
        dig_t1: u16, dig_t2: i16, dig_t3: i16,
        dig_p1: u16, dig_p2: i16, dig_p3: i16,
        dig_p4: i16, dig_p5: i16, dig_p6: i16,
        dig_p7: i16, dig_p8: i16, dig_p9: i16,
    ) -> Self {
        Self {
            dig_t1, dig_t2, dig_t3,
            dig_p1, dig_p2, dig_p3,
            dig_p4, dig_p5, dig_p6,
            dig_p7, dig_p8, dig_p9,
        }
    }

    /// Temperature stage: returns (temperature degC, fine-temperature term)
    pub fn compensate_temperature(&self, adc_t: i32) -> (f32, i32) {
        let t1 = self.dig_t1 as i32;
        let var1 = (((adc_t >> 3) - (t1 << 1)) * self.dig_t2 as i32) >> 11;
        let var2 = (((((adc_t >> 4) - t1) * ((adc_t >> 4) - t1)) >> 12)
            * self.dig_t3 as i32)
            >> 14;

        let t_fine = var1 + var2;
        let temp = ((t_fine * 5 + 128) >> 8) as f32 / 100.0;
        (temp, t_fine)
    }

    /// Pressure stage in Pa, reusing the fine-temperature term
    ///
    /// All intermediates are i64 so the shifted products cannot overflow.
    /// A zero denominator yields exactly 0.0.
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> f32 {
        let mut var1 = t_fine as i64 - 128_000;
        let mut var2 = var1 * var1 * self.dig_p6 as i64;
        var2 += (var1 * self.dig_p5 as i64) << 17;
        var2 += (self.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * self.dig_p3 as i64) >> 8)
            + ((var1 * self.dig_p2 as i64) << 12);
        var1 = (((1i64 << 47) + var1) * self.dig_p1 as i64) >> 33;

        if var1 == 0 {
            return 0.0;
        }

        let mut p = 1_048_576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        let var1 = ((self.dig_p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
        let var2 = ((self.dig_p8 as i64) * p) >> 19;
        p = ((p + var1 + var2) >> 8) + ((self.dig_p7 as i64) << 4);

        p as f32 / 256.0
    }
}

/// Compensated pressure/temperature pair from one poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaroReading {
    /// Temperature in degrees Celsius
    pub temperature: f32,
    /// Pressure in Pascal (0.0 when the denominator degenerates)
    pub pressure: f32,
}

/// BMP280 device handle
#[derive(Debug, Clone)]
pub struct Bmp280 {
    addr: u8,
    calibration: Option<CalibrationConstants>,
}

impl Default for Bmp280 {
    fn default() -> Self {
        Self { addr: BMP280_ADDR, calibration: None }
    }
}

impl Bmp280 {
    /// Create a handle at a non-default address
    pub const fn with_address(addr: u8) -> Self {
        Self { addr, calibration: None }
    }

    /// Load the calibration block and configure continuous conversion
    ///
    /// Fails with [`SensorError::CalibrationRead`] when the block comes
    /// back short; without the coefficients no reading can be compensated.
    pub fn init<B: SensorBus, D: DelaySource>(
        &mut self,
        bus: &mut B,
        _delay: &mut D,
    ) -> SensorResult<()> {
        let mut block = [0u8; CALIBRATION_LEN];
        let got = bus.read_register(self.addr, REG_CALIBRATION, &mut block)?;
        if got != CALIBRATION_LEN {
            return Err(SensorError::CalibrationRead {
                expected: CALIBRATION_LEN,
                got,
            });
        }

        self.calibration = Some(CalibrationConstants::from_block(&block));
        bus.write_register(self.addr, REG_CONTROL, &[CTRL_NORMAL_X1])?;
        Ok(())
    }

    /// Calibration constants, once loaded
    pub fn calibration(&self) -> Option<&CalibrationConstants> {
        self.calibration.as_ref()
    }

    /// Read and compensate one pressure/temperature sample
    ///
    /// Temperature is always compensated first; its fine-temperature term
    /// feeds the pressure stage.
    pub fn read<B: SensorBus>(&self, bus: &mut B) -> SensorResult<BaroReading> {
        let calibration = self
            .calibration
            .ok_or(SensorError::BusFault("bmp280 not initialized"))?;

        let mut data = [0u8; DATA_LEN];
        let got = bus.read_register(self.addr, REG_DATA, &mut data)?;
        if got != DATA_LEN {
            return Err(SensorError::BusTimeout);
        }

        let (adc_p, adc_t) = split_raw(&data);
        let (temperature, t_fine) = calibration.compensate_temperature(adc_t);
        let pressure = calibration.compensate_pressure(adc_p, t_fine);

        Ok(BaroReading { temperature, pressure })
    }
}

/// Split the 6-byte data block into 20-bit (pressure, temperature) counts
fn split_raw(data: &[u8; DATA_LEN]) -> (i32, i32) {
    let adc_p =
        ((data[0] as i32) << 12) | ((data[1] as i32) << 4) | ((data[2] as i32) >> 4);
    let adc_t =
        ((data[3] as i32) << 12) | ((data[4] as i32) << 4) | ((data[5] as i32) >> 4);
    (adc_p, adc_t)
}
