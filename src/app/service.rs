//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the phase machine and the hysteresis controller
//! and exposes a clean, hardware-agnostic API. All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │       AppService       │
//!  ValvePort  ◀── │  Phase FSM · Hysteresis│
//!                 └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::BedConfig;
use crate::control::hysteresis::{ThresholdPolicy, ValveState};
use crate::fsm::context::LoopContext;
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, SensorPort, ValvePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// Orchestrates one bed's read→decide→actuate→report cycle.
pub struct AppService {
    fsm: Fsm,
    ctx: LoopContext,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the phase machine — call [`start`] next.
    ///
    /// [`start`]: Self::start
    pub fn new(config: &BedConfig) -> Self {
        let policy = ThresholdPolicy::new(
            config.water_thresholds.start,
            config.water_thresholds.stop,
        );
        let ctx = LoopContext::new(policy);
        let fsm = Fsm::new(build_state_table(), StateId::Initializing);

        Self {
            fsm,
            ctx,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run initialization and park the machine at the sampling phase.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        self.fsm.tick(&mut self.ctx); // Initializing -> Sampling
        sink.emit(&AppEvent::Started(self.fsm.current_state()));
        info!("AppService started in {:?}", self.fsm.current_state());
    }

    /// Terminate the loop and drive the actuator to its safe state.
    ///
    /// Idempotent; the runner calls this exactly once on shutdown. The
    /// valve is left closed so an interrupted process never floods a bed.
    pub fn shutdown(&mut self, hw: &mut impl ValvePort, sink: &mut impl EventSink) {
        self.fsm.force_transition(StateId::Terminated, &mut self.ctx);
        hw.close();
        sink.emit(&AppEvent::Stopped);
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ValvePort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit. The walk performs the bus transaction
    /// first, then steps the phase machine, applying the valve command
    /// during the actuating phase and publishing telemetry during the
    /// reporting phase.
    pub fn tick(&mut self, hw: &mut (impl SensorPort + ValvePort), sink: &mut impl EventSink) {
        self.tick_count += 1;

        // 1. Sampling — the only bus transaction of the cycle.
        self.ctx.sample = match hw.read() {
            Ok(sample) => {
                self.ctx.last_fault = None;
                Some(sample)
            }
            Err(fault) => {
                warn!("sensor read failed: {fault}");
                self.ctx.last_fault = Some(fault);
                sink.emit(&AppEvent::SensorFault(fault));
                None
            }
        };

        // 2. Walk the phases until the cycle parks for the next tick.
        loop {
            match self.fsm.current_state() {
                StateId::Actuating => {
                    self.apply_valve(hw, sink);
                    self.fsm.tick(&mut self.ctx);
                }
                StateId::Reporting => {
                    self.report(hw, sink);
                    self.fsm.tick(&mut self.ctx); // park at Sampling
                    break;
                }
                StateId::Terminated => break,
                _ => self.fsm.tick(&mut self.ctx),
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current phase of the control loop.
    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// The controller's logical valve state.
    pub fn valve_state(&self) -> ValveState {
        self.ctx.valve()
    }

    /// Total control cycles executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The fault that voided the most recent cycle, if it faulted.
    pub fn last_fault(&self) -> Option<crate::error::SensorFault> {
        self.ctx.last_fault
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drive the valve port to the decided target — both directions are
    /// wired to hardware, not just logged. Repeat drives of the held
    /// state are harmless (the port contract makes them no-ops).
    fn apply_valve(&mut self, hw: &mut impl ValvePort, sink: &mut impl EventSink) {
        let Some(target) = self.ctx.command.target else {
            return;
        };
        let before = hw.state();
        match target {
            ValveState::Open => hw.open(),
            ValveState::Closed => hw.close(),
        }
        if before != target {
            info!("valve {:?} -> {:?}", before, target);
            sink.emit(&AppEvent::ValveChanged {
                from: before,
                to: target,
            });
        }
    }

    /// Publish the cycle's snapshot. Faulted cycles publish nothing
    /// here — the fault event already went out during sampling, and no
    /// sentinel temperature/humidity values are fabricated.
    fn report(&mut self, hw: &mut (impl SensorPort + ValvePort), sink: &mut impl EventSink) {
        if let Some(sample) = self.ctx.sample {
            sink.emit(&AppEvent::Telemetry(TelemetryData {
                temperature_f: sample.temperature_f,
                humidity_pct: sample.humidity_pct,
                valve: hw.state(),
                tick: self.tick_count,
            }));
        }
    }
}
