//! Scrape-oriented metrics.
//!
//! Const-constructible gauges (an `f32` stored as `AtomicU32` bits, so a
//! `static` registry needs no locks and no allocation) rendered in the
//! Prometheus text exposition format. The HTTP adapter serves the
//! rendered text; the metrics event sink keeps the values current.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU32, Ordering};

/// A single scalar gauge.
#[derive(Debug)]
pub struct Gauge {
    name: &'static str,
    help: &'static str,
    bits: AtomicU32,
}

impl Gauge {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            help: "",
            bits: AtomicU32::new(0),
        }
    }

    pub const fn with_help(mut self, help: &'static str) -> Self {
        self.help = help;
        self
    }

    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn render_prometheus(&self, writer: &mut impl Write) -> fmt::Result {
        if !self.help.is_empty() {
            writeln!(writer, "# HELP {} {}", self.name, self.help)?;
        }
        writeln!(writer, "# TYPE {} gauge", self.name)?;
        writeln!(writer, "{} {}", self.name, self.get())
    }
}

/// Every gauge the controller exposes, updated once per control cycle.
#[derive(Debug)]
pub struct BedMetrics {
    pub temperature_f: Gauge,
    pub humidity_pct: Gauge,
    /// 1 = open/watering, 0 = closed.
    pub valve_open: Gauge,
    /// 1 while the most recent cycle's sensor read failed. Raised instead
    /// of substituting sentinel temperature/humidity values.
    pub sensor_fault: Gauge,
}

impl BedMetrics {
    pub const fn new() -> Self {
        Self {
            temperature_f: Gauge::new("bed_temperature_fahrenheit")
                .with_help("SHT31 temperature in degrees Fahrenheit."),
            humidity_pct: Gauge::new("bed_humidity_percent")
                .with_help("SHT31 relative humidity in percent."),
            valve_open: Gauge::new("bed_valve_open")
                .with_help("Water valve state: 1 = open, 0 = closed."),
            sensor_fault: Gauge::new("bed_sensor_fault")
                .with_help("1 while the last sensor read failed."),
        }
    }

    pub fn render_prometheus(&self, writer: &mut impl Write) -> fmt::Result {
        self.temperature_f.render_prometheus(writer)?;
        self.humidity_pct.render_prometheus(writer)?;
        self.valve_open.render_prometheus(writer)?;
        self.sensor_fault.render_prometheus(writer)?;
        Ok(())
    }
}

impl Default for BedMetrics {
    fn default() -> Self {
        Self::new()
    }
}
