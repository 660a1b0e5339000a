//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). The metrics sink is the
//! other standard consumer of the same stream.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!(
                    "TELEM | T={:.2}\u{00b0}F | RH={:.2}% | valve={:?} | tick={}",
                    t.temperature_f, t.humidity_pct, t.valve, t.tick,
                );
            }
            AppEvent::ValveChanged { from, to } => {
                info!("VALVE | {from:?} -> {to:?}");
            }
            AppEvent::SensorFault(fault) => {
                warn!("FAULT | {fault}");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={state:?}");
            }
            AppEvent::Stopped => {
                info!("STOP  | control loop terminated");
            }
        }
    }
}
