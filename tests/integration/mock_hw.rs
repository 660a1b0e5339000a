//! Mock hardware adapter for integration tests.
//!
//! Records every valve call so tests can assert on the full command
//! history, and replays a scripted queue of sensor results, without
//! touching real GPIO or I²C.

use std::collections::VecDeque;

use plantbed::app::events::AppEvent;
use plantbed::app::ports::{EventSink, SensorPort, ValvePort};
use plantbed::control::hysteresis::ValveState;
use plantbed::error::SensorFault;
use plantbed::fsm::context::SensorSample;

// ── Valve call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveCall {
    Open,
    Close,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    scripted: VecDeque<Result<SensorSample, SensorFault>>,
    pub calls: Vec<ValveCall>,
    /// Simulated pin level; starts closed like a freshly bound relay.
    closed: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            scripted: VecDeque::new(),
            calls: Vec::new(),
            closed: true,
        }
    }

    pub fn push_sample(&mut self, humidity_pct: f32) {
        self.scripted.push_back(Ok(SensorSample {
            temperature_f: 72.5,
            humidity_pct,
            captured_at_us: 1_000 * (self.scripted.len() as u64 + 1),
        }));
    }

    pub fn push_fault(&mut self, fault: SensorFault) {
        self.scripted.push_back(Err(fault));
    }

    /// Force the simulated pin from outside the port, as a bench jumper
    /// would.
    pub fn force_level(&mut self, closed: bool) {
        self.closed = closed;
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read(&mut self) -> Result<SensorSample, SensorFault> {
        self.scripted.pop_front().expect("unscripted sensor read")
    }
}

impl ValvePort for MockHardware {
    fn open(&mut self) {
        self.calls.push(ValveCall::Open);
        self.closed = false;
    }

    fn close(&mut self) {
        self.calls.push(ValveCall::Close);
        self.closed = true;
    }

    fn state(&self) -> ValveState {
        if self.closed {
            ValveState::Closed
        } else {
            ValveState::Open
        }
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }

    pub fn fault_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SensorFault(_)))
            .count()
    }

    pub fn valve_changes(&self) -> Vec<(ValveState, ValveState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ValveChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
