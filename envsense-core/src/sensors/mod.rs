//! Calibrated sensor drivers
//!
//! Two register-mapped devices feed the node:
//!
//! - [`Aht20`]: humidity/temperature, 20-bit packed fields, no calibration
//!   block. One triggered conversion yields both values.
//! - [`Bmp280`]: pressure/temperature with the classic two-stage fixed-point
//!   compensation. The temperature stage produces a "fine temperature" term
//!   that the pressure stage reuses; it is computed once per poll and passed
//!   along, never recomputed.
//!
//! Drivers own only device state (address, calibration constants). The bus
//! and delay collaborators are passed into each call so several devices can
//! share one bus without interior mutability tricks.

pub mod aht20;
pub mod bmp280;

pub use aht20::Aht20;
pub use bmp280::{BaroReading, Bmp280, CalibrationConstants};
