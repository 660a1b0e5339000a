//! Metrics event sink adapter.
//!
//! Implements [`EventSink`] by folding the event stream into the scrape
//! gauges. Faulted cycles raise the fault gauge and leave the last good
//! temperature/humidity values in place — no sentinel substitution.

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::metrics::BedMetrics;

pub struct MetricsEventSink<'a> {
    metrics: &'a BedMetrics,
}

impl<'a> MetricsEventSink<'a> {
    pub fn new(metrics: &'a BedMetrics) -> Self {
        Self { metrics }
    }
}

impl EventSink for MetricsEventSink<'_> {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                self.metrics.temperature_f.set(t.temperature_f);
                self.metrics.humidity_pct.set(t.humidity_pct);
                self.metrics.valve_open.set(if t.valve.is_open() { 1.0 } else { 0.0 });
                self.metrics.sensor_fault.set(0.0);
            }
            AppEvent::SensorFault(_) => {
                self.metrics.sensor_fault.set(1.0);
            }
            AppEvent::ValveChanged { to, .. } => {
                self.metrics.valve_open.set(if to.is_open() { 1.0 } else { 0.0 });
            }
            AppEvent::Started(_) | AppEvent::Stopped => {}
        }
    }
}
