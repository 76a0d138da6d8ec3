//! Collaborator seams for the sampling path
//!
//! The core never owns hardware. Register I/O and timed waits go through
//! these two traits so drivers run unchanged against a MCU bus peripheral,
//! a Linux i2c-dev handle, or a scripted mock in tests. Keep implementations
//! thin - drivers encode the device protocol, the bus only moves bytes.

use crate::errors::SensorResult;

/// Byte-level bus access for register-mapped sensors
///
/// `read` and `read_register` return the number of bytes actually
/// transferred; drivers compare it against the expected block size rather
/// than trusting the buffer length.
pub trait SensorBus {
    /// Write raw bytes to a device address
    fn write(&mut self, addr: u8, bytes: &[u8]) -> SensorResult<()>;

    /// Read into `buf` from a device address, returning the byte count
    fn read(&mut self, addr: u8, buf: &mut [u8]) -> SensorResult<usize>;

    /// Write bytes to a register of a device
    fn write_register(&mut self, addr: u8, reg: u8, bytes: &[u8]) -> SensorResult<()>;

    /// Read from a register of a device, returning the byte count
    fn read_register(&mut self, addr: u8, reg: u8, buf: &mut [u8]) -> SensorResult<usize>;
}

/// Blocking delay used for conversion waits
///
/// Sensor conversion cycles need fixed settle times between the trigger
/// write and the result read. These are plain blocking sleeps, not
/// cancellable.
pub trait DelaySource {
    /// Sleep for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Delay backed by the OS scheduler
#[cfg(feature = "std")]
#[derive(Debug, Clone, Default)]
pub struct ThreadDelay;

#[cfg(feature = "std")]
impl DelaySource for ThreadDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(ms as u64));
    }
}

/// Delay that returns immediately, for host-side tests
#[derive(Debug, Clone, Default)]
pub struct NoopDelay;

impl DelaySource for NoopDelay {
    fn delay_ms(&mut self, _ms: u32) {}
}
