//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — write a log line, update the
//! scrape gauges, or both.

use crate::control::hysteresis::ValveState;
use crate::error::SensorFault;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Per-cycle telemetry snapshot (only on cycles with a valid sample).
    Telemetry(TelemetryData),

    /// The physical valve state changed.
    ValveChanged { from: ValveState, to: ValveState },

    /// This cycle's sensor read failed; the valve was left untouched.
    SensorFault(SensorFault),

    /// The application service has started (carries initial phase).
    Started(StateId),

    /// The control loop has terminated and released its hardware.
    Stopped,
}

/// A point-in-time snapshot suitable for logging or scraping.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    pub temperature_f: f32,
    pub humidity_pct: f32,
    /// Physical valve state, read back from the pin.
    pub valve: ValveState,
    /// Control cycle ordinal since startup.
    pub tick: u64,
}
