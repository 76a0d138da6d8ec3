//! Main loop orchestration
//!
//! One [`Node`] owns every collaborator and runs the cycle:
//! drain link events, sample the sensors, extend the histories, offer the
//! reading to the telemetry dispatcher, feed the joystick axis to the mode
//! controller, classify and render. A recoverable sensor error logs, skips
//! the rest of the cycle and leaves the last frame on screen; the next
//! tick starts fresh.
//!
//! The only fatal path is initialization. A sensor that cannot be brought
//! up (most importantly a short barometer calibration read) yields a
//! [`FatalError`]; [`Node::run`] shows it on the panel and asks the
//! platform for a reset instead of limping on with garbage compensation.

use crate::config::NodeConfig;
use crate::context::NodeContext;
use crate::display::{AnalogInput, FrameSurface, LedGrid};
use crate::mode::{DisplayMode, ModeController};
use crate::render::Renderer;

use envsense_core::sensors::{Aht20, BaroReading, Bmp280};
use envsense_core::time::TimeSource;
use envsense_core::traits::{DelaySource, SensorBus};
use envsense_core::{classify, PhysicalReading, SensorError, SoundLevelEstimator};
use envsense_link::{ConnectionState, GattStack, LinkEvents, LoraRadio, TelemetryDispatcher};

use core::fmt::Write;
use thiserror_no_std::Error;

/// Hard cap on microphone burst length, independent of configuration
pub const MIC_BURST_MAX: usize = 512;

/// Longest error text the panel shows before the reset
const FATAL_TEXT_LEN: usize = 20;

/// Platform reset hook, the end of the fatal path
pub trait DeviceControl {
    /// Reboot the device; expected not to return on real hardware
    fn reset(&mut self);
}

/// Unrecoverable startup failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// The temperature/humidity sensor did not come up
    #[error("thermo init: {0}")]
    ThermoInit(SensorError),
    /// The barometer did not come up, usually a short calibration read
    #[error("baro init: {0}")]
    BaroInit(SensorError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for FatalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::ThermoInit(e) => defmt::write!(fmt, "thermo init: {}", e),
            Self::BaroInit(e) => defmt::write!(fmt, "baro init: {}", e),
        }
    }
}

/// The complete telemetry node
pub struct Node<B, D, S, R, E, F, L, J, M, C, X>
where
    B: SensorBus,
    D: DelaySource,
    S: GattStack,
    R: LoraRadio,
    E: LinkEvents,
    F: FrameSurface,
    L: LedGrid,
    J: AnalogInput,
    M: AnalogInput,
    C: TimeSource,
    X: DeviceControl,
{
    bus: B,
    delay: D,
    aht: Aht20,
    bmp: Bmp280,
    estimator: SoundLevelEstimator,
    dispatcher: TelemetryDispatcher<S, R>,
    events: E,
    renderer: Renderer<F, L>,
    joystick: J,
    mic: M,
    clock: C,
    device: X,
    controller: ModeController,
    context: NodeContext,
    config: NodeConfig,
    last_baro: Option<BaroReading>,
}

impl<B, D, S, R, E, F, L, J, M, C, X> Node<B, D, S, R, E, F, L, J, M, C, X>
where
    B: SensorBus,
    D: DelaySource,
    S: GattStack,
    R: LoraRadio,
    E: LinkEvents,
    F: FrameSurface,
    L: LedGrid,
    J: AnalogInput,
    M: AnalogInput,
    C: TimeSource,
    X: DeviceControl,
{
    /// Assemble a node from its collaborators
    ///
    /// The dispatcher arrives pre-built so the platform decides whether a
    /// long-range radio is present and what interval to gate on.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bus: B,
        delay: D,
        dispatcher: TelemetryDispatcher<S, R>,
        events: E,
        renderer: Renderer<F, L>,
        joystick: J,
        mic: M,
        clock: C,
        device: X,
        config: NodeConfig,
    ) -> Self {
        let controller = ModeController::new(&config);
        Self {
            bus,
            delay,
            aht: Aht20::default(),
            bmp: Bmp280::default(),
            estimator: SoundLevelEstimator::default(),
            dispatcher,
            events,
            renderer,
            joystick,
            mic,
            clock,
            device,
            controller,
            context: NodeContext::new(),
            config,
            last_baro: None,
        }
    }

    /// Bring up the sensors and the local service
    ///
    /// Any sensor that fails here is fatal: without the AHT20 there is no
    /// telemetry to send, and without the barometer calibration block every
    /// compensated value would be garbage.
    pub fn init(&mut self) -> Result<(), FatalError> {
        self.aht
            .init(&mut self.bus, &mut self.delay)
            .map_err(FatalError::ThermoInit)?;
        self.bmp
            .init(&mut self.bus, &mut self.delay)
            .map_err(FatalError::BaroInit)?;

        self.dispatcher.service_mut().start_advertising();
        self.renderer.draw_connection_status(false, &self.config);
        Ok(())
    }

    /// Run one loop cycle
    pub fn tick(&mut self) {
        let was_connected = self.connected();
        self.dispatcher.poll_events(&mut self.events);
        let connected = self.connected();
        if connected != was_connected {
            self.renderer.draw_connection_status(connected, &self.config);
        }

        let reading = match self.sample() {
            Ok(reading) => reading,
            Err(e) => {
                log_warn!("node: sample failed, skipping cycle: {e:?}");
                return;
            }
        };

        let now = self.clock.now();
        self.context.push(&reading);
        self.dispatcher.tick(&reading, now);

        let axis = self.joystick.read_raw();
        let mode = self.controller.update(axis, now);
        let value = mode.value_of(&reading);
        let classification = classify(value, self.config.ideal_for(mode));

        self.renderer.render(
            mode,
            value,
            classification,
            self.context.history_for(mode),
            &self.config,
        );
    }

    /// Initialize, then tick forever at the configured loop period
    ///
    /// Returns only after the fatal path has already requested a reset;
    /// on real hardware the reset does not return.
    pub fn run(&mut self) {
        if let Err(fatal) = self.init() {
            self.fail(&fatal);
            return;
        }

        loop {
            self.tick();
            let period = self.config.loop_period_ms;
            self.delay.delay_ms(period);
        }
    }

    fn sample(&mut self) -> Result<PhysicalReading, SensorError> {
        let (temperature, humidity) = self.aht.read(&mut self.bus, &mut self.delay)?;

        // Barometer data is logged and kept around but never displayed or
        // sent; losing it does not invalidate the cycle.
        match self.bmp.read(&mut self.bus) {
            Ok(baro) => {
                log_debug!("bmp280: {} Pa at {} C", baro.pressure, baro.temperature);
                self.last_baro = Some(baro);
            }
            Err(e) => {
                log_warn!("bmp280: read failed: {e:?}");
                self.last_baro = None;
            }
        }

        let mut samples: heapless::Vec<u16, MIC_BURST_MAX> = heapless::Vec::new();
        for _ in 0..self.config.mic_burst.min(MIC_BURST_MAX) {
            if samples.push(self.mic.read_raw()).is_err() {
                break;
            }
        }
        let sound_db = self.estimator.estimate_db(&samples);

        Ok(PhysicalReading::new(temperature, humidity, sound_db))
    }

    fn fail(&mut self, fatal: &FatalError) {
        let mut text: heapless::String<64> = heapless::String::new();
        let _ = write!(text, "{fatal}");
        let shown = &text[..text.len().min(FATAL_TEXT_LEN)];

        self.renderer.draw_banner("FATAL", shown);
        self.device.reset();
    }

    fn connected(&self) -> bool {
        matches!(
            self.dispatcher.service().state(),
            ConnectionState::Connected(_)
        )
    }

    /// Current display mode
    pub fn mode(&self) -> DisplayMode {
        self.controller.mode()
    }

    /// Rolling histories
    pub fn context(&self) -> &NodeContext {
        &self.context
    }

    /// The telemetry side
    pub fn dispatcher(&self) -> &TelemetryDispatcher<S, R> {
        &self.dispatcher
    }

    /// Last successful barometer sample, if the previous cycle had one
    pub fn last_baro(&self) -> Option<BaroReading> {
        self.last_baro
    }
}
