//! Telemetry transports for Envsense nodes
//!
//! Two independent paths carry every compensated reading off the node:
//!
//! - A local GATT environmental service ([`gatt::EnvService`]) with three
//!   characteristics and a two-state connection lifecycle.
//! - A long-range acknowledged radio link ([`lora::LoraLink`]) pushing a
//!   compact ASCII frame to a fixed peer.
//!
//! [`dispatch::TelemetryDispatcher`] owns both and fires them together on a
//! fixed interval. The transports never touch each other: a failed notify
//! cannot delay or skip the radio frame and vice versa. Failures are logged
//! at the narrowest scope and absorbed; nothing in this crate retries
//! mid-cycle.
//!
//! The actual wireless stacks stay outside the crate. [`GattStack`] and
//! [`LoraRadio`] are the seams a platform implements; connection events
//! cross from the stack's callback context into the main loop through a
//! [`LinkEvents`] source, typically the consumer half of a
//! `heapless::spsc::Queue`.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

// Optional logging, compiled out entirely when the `log` feature is off.
#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

pub mod dispatch;
pub mod events;
pub mod frame;
pub mod gatt;
pub mod lora;

pub use dispatch::TelemetryDispatcher;
pub use events::{LinkEvent, SessionHandle, ValueHandle};
pub use frame::{FrameError, TelemetryFrame};
pub use gatt::{CharacteristicHandles, ConnectionState, EnvService, ServiceConfig};
pub use lora::LoraLink;

use core::fmt::Debug;

/// Platform seam for the local wireless (GATT) stack
///
/// The platform registers the environmental service up front and hands the
/// resulting characteristic handles to [`gatt::EnvService`]; this trait only
/// covers the per-cycle operations.
pub trait GattStack {
    /// Stack-specific error, logged but never propagated past the service
    type Error: Debug;

    /// Write the local value of a characteristic
    fn write_characteristic(
        &mut self,
        handle: ValueHandle,
        data: &[u8],
    ) -> Result<(), Self::Error>;

    /// Notify the connected peer that a characteristic changed
    fn notify(
        &mut self,
        session: SessionHandle,
        handle: ValueHandle,
    ) -> Result<(), Self::Error>;

    /// Start advertising with the given interval and device name
    fn advertise(&mut self, interval_us: u32, name: &str) -> Result<(), Self::Error>;

    /// Stop advertising (called once a central connects)
    fn stop_advertising(&mut self);
}

/// Platform seam for the long-range radio
pub trait LoraRadio {
    /// Acknowledged send to a peer address; false when no ack arrived
    fn send_acked(&mut self, payload: &[u8], dest: u8) -> bool;
}

/// Source of connection events, drained once per loop tick
///
/// Implemented for the consumer half of a `heapless` SPSC queue so the
/// wireless callback can enqueue from interrupt context while the main
/// loop drains on its own schedule.
pub trait LinkEvents {
    /// Next pending event, if any
    fn next_event(&mut self) -> Option<LinkEvent>;
}

impl<const N: usize> LinkEvents for heapless::spsc::Consumer<'_, LinkEvent, N> {
    fn next_event(&mut self) -> Option<LinkEvent> {
        self.dequeue()
    }
}
