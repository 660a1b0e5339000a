//! Shared mutable context threaded through every phase handler.
//!
//! `LoopContext` is the single struct the phase handlers read from and
//! write to: the tick's sensor sample (if any), the hysteresis
//! controller with its logical valve state, and the actuator command the
//! cycle produced. The service fills `sample` before walking the machine
//! and applies `command` when the walk reaches the actuation phase.

use crate::control::hysteresis::{HysteresisController, ThresholdPolicy, ValveState};
use crate::error::SensorFault;

// ---------------------------------------------------------------------------
// Sensor sample (written by the service; read-only to handlers)
// ---------------------------------------------------------------------------

/// One calibrated reading, produced fresh every cycle and never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Temperature in degrees Fahrenheit (the sensor's native transfer
    /// function; no unit conversion is introduced).
    pub temperature_f: f32,
    /// Relative humidity in percent, 0-100 by the sensor's guarantee.
    pub humidity_pct: f32,
    /// Monotonic capture timestamp, microseconds since boot.
    pub captured_at_us: u64,
}

// ---------------------------------------------------------------------------
// Actuator command (written by handlers; applied by the service)
// ---------------------------------------------------------------------------

/// The cycle's valve command. `None` = do not touch the valve (fault
/// ticks hold the previous physical state).
#[derive(Debug, Clone, Copy, Default)]
pub struct ValveCommand {
    pub target: Option<ValveState>,
}

// ---------------------------------------------------------------------------
// LoopContext
// ---------------------------------------------------------------------------

/// The shared context passed to every phase handler function.
pub struct LoopContext {
    // -- Timing (maintained by the engine) --
    /// Steps elapsed since the current state was entered.
    pub steps_in_state: u64,
    /// Monotonic total step count.
    pub total_steps: u64,

    // -- Per-cycle data --
    /// This cycle's sample; `None` when the read faulted.
    pub sample: Option<SensorSample>,
    /// The fault that voided this cycle's sample, if any.
    pub last_fault: Option<SensorFault>,
    /// Valve command produced by the deciding phase.
    pub command: ValveCommand,

    // -- Process-lifetime state --
    /// Dead-band controller; owns the logical valve state.
    pub controller: HysteresisController,
}

impl LoopContext {
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self {
            steps_in_state: 0,
            total_steps: 0,
            sample: None,
            last_fault: None,
            command: ValveCommand::default(),
            controller: HysteresisController::new(policy),
        }
    }

    /// The controller's logical valve state.
    pub fn valve(&self) -> ValveState {
        self.controller.valve()
    }
}
