//! Node logic for Envsense telemetry devices
//!
//! Ties the sensor core and the telemetry transports to the local user
//! interface: a three-mode display state machine driven by a noisy analog
//! axis, mode-specific LED-matrix encodings, a rolling history chart on
//! the monochrome display, and the main loop with its single fatal-error
//! path.
//!
//! All hardware sits behind traits ([`display::FrameSurface`],
//! [`display::LedGrid`], [`display::AnalogInput`],
//! [`node::DeviceControl`]) so the whole node runs tick by tick in host
//! tests with scripted collaborators.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Optional logging, compiled out entirely when the `log` feature is off.
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod config;
pub mod context;
pub mod display;
pub mod mode;
pub mod node;
pub mod receiver;
pub mod render;

pub use config::NodeConfig;
pub use context::NodeContext;
pub use mode::{DisplayMode, ModeController};
pub use node::{FatalError, Node};
