//! Connection events crossing the callback boundary
//!
//! The wireless stack reports connects and disconnects asynchronously.
//! Handlers must stay short and must not do bus I/O, so the callback only
//! converts the stack's raw event into a [`LinkEvent`] and enqueues it;
//! the main loop drains the queue once per tick and feeds the events into
//! the connection state machine.

/// Opaque identifier for an active connection
///
/// Valid only while the link is up; cleared on disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionHandle(pub u16);

/// Handle of a registered GATT characteristic value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueHandle(pub u16);

/// Link-layer connection event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// A central connected; carries the session handle for notifications
    Connected(SessionHandle),
    /// The central went away
    Disconnected,
}

#[cfg(feature = "defmt")]
impl defmt::Format for LinkEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Connected(SessionHandle(h)) => defmt::write!(fmt, "connected({})", h),
            Self::Disconnected => defmt::write!(fmt, "disconnected"),
        }
    }
}
