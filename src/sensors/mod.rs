//! Sensor drivers.
//!
//! One temperature/humidity device per bed; the driver speaks to the bus
//! through the [`BusPort`](crate::app::ports::BusPort) abstraction so it
//! stays host-testable.

pub mod sht31;
