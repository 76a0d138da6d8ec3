//! Interval-gated dual-transport dispatch
//!
//! One dispatcher owns both telemetry paths and a monotonic interval gate.
//! Every loop tick offers it the latest reading; it fires the GATT publish
//! and the long-range send together exactly once per elapsed interval, no
//! matter how much faster the loop runs. The two sends are independent:
//! each one logs and absorbs its own failures, so a dead radio never
//! delays or skips the local service and vice versa.

use crate::gatt::EnvService;
use crate::lora::LoraLink;
use crate::{GattStack, LinkEvents, LoraRadio};

use envsense_core::time::Timestamp;
use envsense_core::PhysicalReading;

/// Default dispatch interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Owns both transports and the dispatch gate
pub struct TelemetryDispatcher<S: GattStack, R: LoraRadio> {
    service: EnvService<S>,
    lora: Option<LoraLink<R>>,
    interval_ms: u64,
    last_dispatch: Timestamp,
}

impl<S: GattStack, R: LoraRadio> TelemetryDispatcher<S, R> {
    /// Combine the transports; `lora` is None when the radio failed to
    /// initialize, degrading the long-range path to a no-op
    pub fn new(service: EnvService<S>, lora: Option<LoraLink<R>>, now: Timestamp) -> Self {
        Self {
            service,
            lora,
            interval_ms: DEFAULT_INTERVAL_MS,
            last_dispatch: now,
        }
    }

    /// Override the dispatch interval
    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Drain pending connection events into the state machine
    ///
    /// Called once per loop tick, before the dispatch decision, so a
    /// connect that raced the previous cycle takes effect now.
    pub fn poll_events<E: LinkEvents>(&mut self, events: &mut E) {
        while let Some(event) = events.next_event() {
            self.service.handle_event(event);
        }
    }

    /// Offer the latest reading; returns true when a dispatch fired
    ///
    /// Both transports run back to back within the same tick. The gate
    /// re-arms from the dispatch time, so sub-interval ticks can never
    /// produce a second dispatch for the same elapsed interval.
    pub fn tick(&mut self, reading: &PhysicalReading, now: Timestamp) -> bool {
        if now.saturating_sub(self.last_dispatch) < self.interval_ms {
            return false;
        }
        self.last_dispatch = now;

        self.service.publish(reading);
        if let Some(lora) = self.lora.as_mut() {
            lora.send(reading);
        }
        true
    }

    /// The GATT service half
    pub fn service(&self) -> &EnvService<S> {
        &self.service
    }

    /// Mutable access to the GATT service half
    pub fn service_mut(&mut self) -> &mut EnvService<S> {
        &mut self.service
    }

    /// Whether the long-range path is present
    pub fn has_lora(&self) -> bool {
        self.lora.is_some()
    }
}
