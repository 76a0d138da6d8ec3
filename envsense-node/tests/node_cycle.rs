//! Whole-node cycle tests with scripted collaborators
//!
//! Every piece of hardware is a probe that records what the node did to
//! it, so these tests drive full ticks through sampling, dispatch, mode
//! control and rendering without any device attached.

use envsense_core::errors::SensorResult;
use envsense_core::time::{TimeSource, Timestamp};
use envsense_core::traits::{NoopDelay, SensorBus};
use envsense_link::gatt::{CharacteristicHandles, ServiceConfig};
use envsense_link::{
    ConnectionState, EnvService, GattStack, LinkEvent, LinkEvents, LoraLink, LoraRadio,
    SessionHandle, TelemetryDispatcher, ValueHandle,
};
use envsense_node::display::{AnalogInput, FrameSurface, LedGrid, Rgb};
use envsense_node::node::DeviceControl;
use envsense_node::render::Renderer;
use envsense_node::{DisplayMode, Node, NodeConfig};

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Bosch datasheet coefficients, packed the way the device serves them
fn calibration_block() -> [u8; 24] {
    let words: [i32; 12] = [
        27504, 26435, -1000, 36477, -10685, 3024, 2855, 140, -7, 15500, -14600, 6000,
    ];
    let mut block = [0u8; 24];
    for (slot, word) in words.iter().enumerate() {
        block[slot * 2..slot * 2 + 2].copy_from_slice(&(*word as u16).to_le_bytes());
    }
    block
}

/// Fixed-response bus: golden AHT20 frame, datasheet BMP280 data
struct BenchBus {
    aht_frame: Option<[u8; 6]>,
    calibration_ok: bool,
}

impl BenchBus {
    fn healthy() -> Self {
        Self {
            aht_frame: Some([0x00, 0x19, 0x99, 0x99, 0x33, 0x33]),
            calibration_ok: true,
        }
    }
}

impl SensorBus for BenchBus {
    fn write(&mut self, _addr: u8, _bytes: &[u8]) -> SensorResult<()> {
        Ok(())
    }

    fn read(&mut self, _addr: u8, buf: &mut [u8]) -> SensorResult<usize> {
        match self.aht_frame {
            Some(frame) => {
                buf[..frame.len()].copy_from_slice(&frame);
                Ok(frame.len())
            }
            None => Ok(0),
        }
    }

    fn write_register(&mut self, _addr: u8, _reg: u8, _bytes: &[u8]) -> SensorResult<()> {
        Ok(())
    }

    fn read_register(&mut self, _addr: u8, reg: u8, buf: &mut [u8]) -> SensorResult<usize> {
        match reg {
            0x88 => {
                if !self.calibration_ok {
                    return Ok(10);
                }
                buf[..24].copy_from_slice(&calibration_block());
                Ok(24)
            }
            0xF7 => {
                buf[..6].copy_from_slice(&[0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00]);
                Ok(6)
            }
            _ => Ok(0),
        }
    }
}

#[derive(Default)]
struct StackState {
    writes: Vec<(u16, Vec<u8>)>,
    notifies: usize,
    advertising: bool,
}

#[derive(Clone, Default)]
struct StackProbe(Rc<RefCell<StackState>>);

impl GattStack for StackProbe {
    type Error = &'static str;

    fn write_characteristic(&mut self, handle: ValueHandle, data: &[u8]) -> Result<(), &'static str> {
        self.0.borrow_mut().writes.push((handle.0, data.to_vec()));
        Ok(())
    }

    fn notify(&mut self, _session: SessionHandle, _handle: ValueHandle) -> Result<(), &'static str> {
        self.0.borrow_mut().notifies += 1;
        Ok(())
    }

    fn advertise(&mut self, _interval_us: u32, _name: &str) -> Result<(), &'static str> {
        self.0.borrow_mut().advertising = true;
        Ok(())
    }

    fn stop_advertising(&mut self) {
        self.0.borrow_mut().advertising = false;
    }
}

#[derive(Clone, Default)]
struct RadioProbe(Rc<RefCell<Vec<Vec<u8>>>>);

impl LoraRadio for RadioProbe {
    fn send_acked(&mut self, payload: &[u8], _dest: u8) -> bool {
        self.0.borrow_mut().push(payload.to_vec());
        true
    }
}

#[derive(Clone, Default)]
struct EventPipe(Rc<RefCell<VecDeque<LinkEvent>>>);

impl EventPipe {
    fn push(&self, event: LinkEvent) {
        self.0.borrow_mut().push_back(event);
    }
}

impl LinkEvents for EventPipe {
    fn next_event(&mut self) -> Option<LinkEvent> {
        self.0.borrow_mut().pop_front()
    }
}

#[derive(Default)]
struct PanelState {
    texts: Vec<String>,
    presents: usize,
}

#[derive(Clone, Default)]
struct PanelProbe(Rc<RefCell<PanelState>>);

impl FrameSurface for PanelProbe {
    fn clear(&mut self) {}
    fn draw_text(&mut self, _x: i32, _y: i32, text: &str) {
        self.0.borrow_mut().texts.push(text.to_owned());
    }
    fn draw_line(&mut self, _x1: i32, _y1: i32, _x2: i32, _y2: i32) {}
    fn draw_hline(&mut self, _x: i32, _y: i32, _len: u32) {}
    fn present(&mut self) {
        self.0.borrow_mut().presents += 1;
    }
}

struct GridState {
    pixels: [Rgb; 25],
    flushes: Vec<[Rgb; 25]>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            pixels: [Rgb::OFF; 25],
            flushes: Vec::new(),
        }
    }
}

#[derive(Clone, Default)]
struct GridProbe(Rc<RefCell<GridState>>);

impl LedGrid for GridProbe {
    fn set_pixel(&mut self, index: usize, color: Rgb) {
        self.0.borrow_mut().pixels[index] = color;
    }
    fn flush(&mut self) {
        let mut state = self.0.borrow_mut();
        let snapshot = state.pixels;
        state.flushes.push(snapshot);
    }
}

#[derive(Clone)]
struct Axis(Rc<Cell<u16>>);

impl AnalogInput for Axis {
    fn read_raw(&mut self) -> u16 {
        self.0.get()
    }
}

struct ConstMic(u16);

impl AnalogInput for ConstMic {
    fn read_raw(&mut self) -> u16 {
        self.0
    }
}

#[derive(Clone)]
struct TestClock(Rc<Cell<Timestamp>>);

impl TimeSource for TestClock {
    fn now(&self) -> Timestamp {
        self.0.get()
    }
}

#[derive(Clone, Default)]
struct ResetProbe(Rc<Cell<bool>>);

impl DeviceControl for ResetProbe {
    fn reset(&mut self) {
        self.0.set(true);
    }
}

type BenchNode = Node<
    BenchBus,
    NoopDelay,
    StackProbe,
    RadioProbe,
    EventPipe,
    PanelProbe,
    GridProbe,
    Axis,
    ConstMic,
    TestClock,
    ResetProbe,
>;

struct Bench {
    node: BenchNode,
    stack: Rc<RefCell<StackState>>,
    radio: Rc<RefCell<Vec<Vec<u8>>>>,
    events: EventPipe,
    panel: Rc<RefCell<PanelState>>,
    grid: Rc<RefCell<GridState>>,
    axis: Rc<Cell<u16>>,
    clock: Rc<Cell<Timestamp>>,
    reset: Rc<Cell<bool>>,
}

fn bench_with_bus(bus: BenchBus) -> Bench {
    let stack = StackProbe::default();
    let radio = RadioProbe::default();
    let events = EventPipe::default();
    let panel = PanelProbe::default();
    let grid = GridProbe::default();
    let axis = Rc::new(Cell::new(32_000u16));
    // Past the first interval so the first tick dispatches
    let clock = Rc::new(Cell::new(5000u64));
    let reset = ResetProbe::default();

    let handles = CharacteristicHandles {
        temperature: ValueHandle(1),
        humidity: ValueHandle(2),
        sound: ValueHandle(3),
    };
    let service = EnvService::new(stack.clone(), handles, ServiceConfig::default());
    let lora = LoraLink::new(radio.clone(), 2);
    let dispatcher = TelemetryDispatcher::new(service, Some(lora), 0);

    let node = Node::new(
        bus,
        NoopDelay,
        dispatcher,
        events.clone(),
        Renderer::new(panel.clone(), grid.clone()),
        Axis(axis.clone()),
        ConstMic(2048),
        TestClock(clock.clone()),
        reset.clone(),
        NodeConfig::default(),
    );

    Bench {
        node,
        stack: stack.0,
        radio: radio.0,
        events,
        panel: panel.0,
        grid: grid.0,
        axis,
        clock,
        reset: reset.0,
    }
}

fn bench() -> Bench {
    bench_with_bus(BenchBus::healthy())
}

#[test]
fn first_tick_samples_dispatches_and_renders() {
    let mut b = bench();
    b.node.init().unwrap();
    assert!(b.stack.borrow().advertising);

    b.node.tick();

    // Golden AHT20 frame decodes to roughly 65.0 C / 10.0 %RH
    let temps = b.node.context().history_for(DisplayMode::Temperature);
    let temp = temps.last().unwrap();
    assert!((temp - 65.0).abs() < 0.01, "temperature was {temp}");
    assert_eq!(temps.len(), 1);

    // All three characteristics written, hundredths little-endian
    let stack = b.stack.borrow();
    assert_eq!(stack.writes.len(), 3);
    let t = i16::from_le_bytes([stack.writes[0].1[0], stack.writes[0].1[1]]);
    assert!((6499..=6500).contains(&t), "encoded temperature was {t}");

    // The long-range frame carries the same reading, one decimal place
    let radio = b.radio.borrow();
    assert_eq!(radio.len(), 1);
    assert_eq!(radio[0], b"T:65.0,H:10.0,D:0.0");

    // Panel presented a frame: waiting grid flush from init plus the
    // noise rings from the tick
    assert_eq!(b.panel.borrow().presents, 1);
    assert!(b.grid.borrow().flushes.len() >= 2);
}

#[test]
fn dispatch_is_gated_but_rendering_is_not() {
    let mut b = bench();
    b.node.init().unwrap();

    b.node.tick();
    b.clock.set(5100);
    b.node.tick();
    b.clock.set(5200);
    b.node.tick();

    // Three renders, one dispatch: the interval has not elapsed again
    assert_eq!(b.panel.borrow().presents, 3);
    assert_eq!(b.radio.borrow().len(), 1);

    b.clock.set(7000);
    b.node.tick();
    assert_eq!(b.radio.borrow().len(), 2);
}

#[test]
fn sample_failure_skips_the_cycle_but_drains_events() {
    let mut bus = BenchBus::healthy();
    bus.aht_frame = None;
    let mut b = bench_with_bus(bus);
    b.node.init().unwrap();

    b.events.push(LinkEvent::Connected(SessionHandle(9)));
    b.node.tick();

    // No history, no dispatch, no frame
    assert!(b.node.context().history_for(DisplayMode::Noise).is_empty());
    assert!(b.radio.borrow().is_empty());
    assert_eq!(b.panel.borrow().presents, 0);

    // The connect was still applied
    assert_eq!(
        b.node.dispatcher().service().state(),
        ConnectionState::Connected(SessionHandle(9))
    );
    assert!(!b.stack.borrow().advertising);
}

#[test]
fn joystick_sweeps_the_modes() {
    let mut b = bench();
    b.node.init().unwrap();
    assert_eq!(b.node.mode(), DisplayMode::Noise);

    b.axis.set(60_000);
    b.node.tick();
    assert_eq!(b.node.mode(), DisplayMode::Temperature);

    // Inside the debounce window the axis is ignored
    b.clock.set(5100);
    b.node.tick();
    assert_eq!(b.node.mode(), DisplayMode::Temperature);

    b.clock.set(5400);
    b.node.tick();
    assert_eq!(b.node.mode(), DisplayMode::Humidity);

    // Held high at the far end: stays put
    b.clock.set(5800);
    b.node.tick();
    assert_eq!(b.node.mode(), DisplayMode::Humidity);
}

#[test]
fn connect_flashes_the_connected_pattern() {
    let mut b = bench();
    b.node.init().unwrap();

    // Init leaves the waiting cross on the grid
    {
        let grid = b.grid.borrow();
        let waiting = grid.flushes.last().unwrap();
        let config = NodeConfig::default();
        for led in [12, 6, 8, 16, 18] {
            assert_eq!(waiting[led], config.color_waiting);
        }
        assert_eq!(waiting[0], Rgb::OFF);
    }

    b.events.push(LinkEvent::Connected(SessionHandle(3)));
    b.node.tick();

    // Second-to-last flush is the connected pattern; the tick's mode
    // visual lands after it
    let grid = b.grid.borrow();
    let connected = grid.flushes[grid.flushes.len() - 2];
    let config = NodeConfig::default();
    for led in [12, 6, 8, 16, 18, 0, 4, 20, 24] {
        assert_eq!(connected[led], config.color_connected);
    }
}

#[test]
fn short_calibration_block_is_fatal() {
    let mut bus = BenchBus::healthy();
    bus.calibration_ok = false;
    let mut b = bench_with_bus(bus);

    b.node.run();

    assert!(b.reset.get());
    let panel = b.panel.borrow();
    assert!(panel.texts.iter().any(|t| t == "FATAL"));
    // Error text is truncated to fit the panel
    assert!(panel
        .texts
        .iter()
        .any(|t| t == "baro init: calibrati"));
}

#[test]
fn barometer_read_failure_is_not_fatal() {
    let mut b = bench();
    b.node.init().unwrap();
    b.node.tick();
    assert!(b.node.last_baro().is_some());

    let baro = b.node.last_baro().unwrap();
    assert!((baro.temperature - 25.08).abs() < 0.01);
    assert!((baro.pressure - 100_653.0).abs() < 20.0);
}
