//! Dead-band hysteresis controller for valve actuation.
//!
//! Two thresholds instead of one: the valve opens when humidity falls to
//! the `start` threshold and closes when it rises to the `stop`
//! threshold. Samples strictly between the two hold the prior state, so
//! sensor noise near a single setpoint cannot chatter the relay.
//!
//! ```text
//!        0%        start          stop        100%
//!         ├──────────┼──── hold ────┼───────────┤
//!            open ◀──┘              └──▶ close
//! ```

/// Physical state of the water valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveState {
    Open,
    Closed,
}

impl ValveState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Humidity thresholds in percent RH, `start <= stop`.
///
/// Ordering is enforced at configuration load; the controller itself
/// only asserts it in debug builds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    start: f32,
    stop: f32,
}

impl ThresholdPolicy {
    pub fn new(start: f32, stop: f32) -> Self {
        debug_assert!(start <= stop, "threshold policy inverted: {start} > {stop}");
        Self { start, stop }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn stop(&self) -> f32 {
        self.stop
    }
}

/// Owns the valve's logical state and applies the dead-band transition
/// function to each humidity sample.
///
/// The controller never fails and never touches hardware; it only
/// computes the target state. Driving the relay — in both directions —
/// is the service's job.
pub struct HysteresisController {
    policy: ThresholdPolicy,
    valve: ValveState,
}

impl HysteresisController {
    /// Starts `Closed`: a freshly booted controller must not water until
    /// a sample says the soil is dry.
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self {
            policy,
            valve: ValveState::Closed,
        }
    }

    /// Consume one humidity sample and return the target valve state.
    ///
    /// Boundary inclusions: `h == start` opens, `h == stop` closes. For
    /// the degenerate `start == stop` policy the open rule wins at the
    /// shared point. A NaN sample compares false on both sides and holds.
    pub fn decide(&mut self, humidity_pct: f32) -> ValveState {
        if humidity_pct <= self.policy.start {
            self.valve = ValveState::Open;
        } else if humidity_pct >= self.policy.stop {
            self.valve = ValveState::Closed;
        }
        self.valve
    }

    /// Current logical valve state.
    pub fn valve(&self) -> ValveState {
        self.valve
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }
}
