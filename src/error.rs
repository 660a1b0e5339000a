//! Unified error types for the plantbed firmware.
//!
//! A small set of `Copy` enums that every fallible subsystem funnels
//! into, keeping the control loop's error handling uniform. Variants are
//! `Copy` so they can be carried through the loop context and event sink
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Bus transport errors
// ---------------------------------------------------------------------------

/// Failures of the two-wire bus transaction itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The device did not acknowledge its address or a data byte.
    Nack,
    /// Any other bus-level failure (arbitration loss, driver error).
    Bus,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "device did not acknowledge"),
            Self::Bus => write!(f, "bus transaction failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// A sensor read could not produce a trustworthy sample this tick.
///
/// Recoverable: the control loop skips the decision step, retains the
/// previous valve state, and retries at the next scheduled cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The underlying bus transaction failed.
    Bus(BusError),
    /// The device returned fewer bytes than a full measurement frame.
    ShortRead { got: u8 },
    /// A frame checksum did not match its data word.
    CrcMismatch,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::ShortRead { got } => write!(f, "short read ({got} of 6 bytes)"),
            Self::CrcMismatch => write!(f, "frame checksum mismatch"),
        }
    }
}

impl From<BusError> for SensorFault {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}
