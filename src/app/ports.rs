//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (bus, sensor, valve, event sinks, config storage)
//! implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::{BedConfig, ConfigError};
use crate::control::hysteresis::ValveState;
use crate::error::{BusError, SensorFault};
use crate::fsm::context::SensorSample;

// ───────────────────────────────────────────────────────────────
// Bus transport port (driven adapter: two-wire bus → sensor driver)
// ───────────────────────────────────────────────────────────────

/// Point-to-point synchronous device bus, addressed by 7-bit address.
///
/// Implementations must not interleave the write-command/read-data pair
/// of one caller with transactions from another user of the same device.
/// Exclusive `&mut` ownership gives this for free; a deployment sharing
/// one physical bus between loops must serialize behind a mutex.
pub trait BusPort {
    /// Write command bytes to the device.
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError>;

    /// Read up to `buf.len()` bytes from the device. Returns the number
    /// of bytes the device actually produced, which may be short.
    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<usize, BusError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle for a fresh,
/// timestamped sample.
pub trait SensorPort {
    fn read(&mut self) -> Result<SensorSample, SensorFault>;
}

// ───────────────────────────────────────────────────────────────
// Valve port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain commands the water valve through this.
///
/// `open()` and `close()` are direct, idempotent drives of the output —
/// opening an already-open valve is a no-op in effect. No failure path
/// is modeled; a stuck actuator would need a readback-mismatch fault in
/// a future hardening pass.
pub trait ValvePort {
    fn open(&mut self);
    fn close(&mut self);

    /// Reads the physical state back rather than trusting cached state,
    /// so externally forced changes (bench jumper, manual override tool)
    /// are reflected.
    fn state(&self) -> ValveState;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, metrics
/// gauges, a future network sink).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: persistent config → domain)
// ───────────────────────────────────────────────────────────────

/// Loads the validated bed configuration at startup.
///
/// Any error from this port is fatal: the process must exit non-zero
/// before the control loop starts, naming the missing or invalid field.
pub trait ConfigPort {
    fn load(&self) -> Result<BedConfig, ConfigError>;
}
