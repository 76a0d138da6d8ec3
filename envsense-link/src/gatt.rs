//! Local GATT environmental service
//!
//! Connection lifecycle and local delivery for the three environmental
//! characteristics. The state machine has exactly two states:
//!
//! ```text
//!            connect(session)
//! Advertising ----------------> Connected(session)
//!      ^                              |
//!      +------------------------------+
//!            disconnect
//! ```
//!
//! Connecting stops advertising and stores the session handle; a
//! disconnect clears it and restarts advertising. There is never more than
//! one active session.
//!
//! [`EnvService::publish`] always refreshes the local characteristic
//! values, so a freshly connected central reads current data even before
//! the first notification. Notifications go out only while connected, and
//! every stack failure is logged and absorbed. No retry happens inside a
//! cycle; the next interval carries fresh data anyway.

use crate::events::{LinkEvent, SessionHandle, ValueHandle};
use crate::GattStack;

use envsense_core::PhysicalReading;

/// Connection lifecycle state; the session handle exists only in
/// [`ConnectionState::Connected`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No central attached, advertising runs
    Advertising,
    /// One central attached, notifications enabled
    Connected(SessionHandle),
}

/// Handles of the three registered characteristics
///
/// The platform registers the service and passes the handles in; the
/// service never registers anything itself.
#[derive(Debug, Clone, Copy)]
pub struct CharacteristicHandles {
    /// Temperature, i16 little-endian, hundredths of a degree
    pub temperature: ValueHandle,
    /// Humidity, i16 little-endian, hundredths of a percent
    pub humidity: ValueHandle,
    /// Sound level, i16 little-endian, whole decibels
    pub sound: ValueHandle,
}

/// Advertising parameters
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Device name carried in the advertising payload
    pub name: &'static str,
    /// Advertising interval in microseconds
    pub advertise_interval_us: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "envsense-node",
            advertise_interval_us: 100_000,
        }
    }
}

/// The environmental sensing service
pub struct EnvService<S: GattStack> {
    stack: S,
    handles: CharacteristicHandles,
    config: ServiceConfig,
    state: ConnectionState,
}

impl<S: GattStack> EnvService<S> {
    /// Wrap a registered service; the initial state is Advertising
    pub fn new(stack: S, handles: CharacteristicHandles, config: ServiceConfig) -> Self {
        Self {
            stack,
            handles,
            config,
            state: ConnectionState::Advertising,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Begin advertising; called once at startup and after disconnects
    pub fn start_advertising(&mut self) {
        if let Err(e) = self
            .stack
            .advertise(self.config.advertise_interval_us, self.config.name)
        {
            log_warn!("gatt: failed to start advertising: {e:?}");
        }
    }

    /// Apply one link-layer event to the state machine
    pub fn handle_event(&mut self, event: LinkEvent) {
        match event {
            LinkEvent::Connected(session) => {
                self.stack.stop_advertising();
                self.state = ConnectionState::Connected(session);
                log_info!("gatt: central connected (session {})", session.0);
            }
            LinkEvent::Disconnected => {
                self.state = ConnectionState::Advertising;
                log_info!("gatt: central disconnected, advertising again");
                self.start_advertising();
            }
        }
    }

    /// Push a reading into the three characteristics
    ///
    /// Encodings: temperature x100, humidity x100, sound as-is, each a
    /// 2-byte little-endian signed integer.
    pub fn publish(&mut self, reading: &PhysicalReading) {
        let temp = (reading.temperature * 100.0) as i16;
        let hum = (reading.humidity * 100.0) as i16;
        let sound = reading.sound_db;

        self.write_value(self.handles.temperature, temp);
        self.write_value(self.handles.humidity, hum);
        self.write_value(self.handles.sound, sound);

        if let ConnectionState::Connected(session) = self.state {
            self.notify_value(session, self.handles.temperature);
            self.notify_value(session, self.handles.humidity);
            self.notify_value(session, self.handles.sound);
        }
    }

    fn write_value(&mut self, handle: ValueHandle, value: i16) {
        if let Err(e) = self.stack.write_characteristic(handle, &value.to_le_bytes()) {
            log_warn!("gatt: characteristic write failed: {e:?}");
        }
    }

    fn notify_value(&mut self, session: SessionHandle, handle: ValueHandle) {
        if let Err(e) = self.stack.notify(session, handle) {
            log_warn!("gatt: notify failed: {e:?}");
        }
    }

    /// Access the underlying stack (used by tests)
    pub fn stack(&self) -> &S {
        &self.stack
    }
}
