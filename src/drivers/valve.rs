//! Water valve driver (relay-switched solenoid).
//!
//! The relay board is active-low: driving the pin LOW energises the coil
//! and opens the valve, HIGH releases it. The pin idles HIGH, so a reset
//! or power cycle always leaves the bed dry.
//!
//! `state()` reads the pin level back instead of trusting cached state,
//! so a level forced by an external tool shows up here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: raw GPIO via the hw_init helpers (pin configured
//! input+output for readback). On host/test: the hw_init simulation
//! register.

use crate::control::hysteresis::ValveState;
use crate::drivers::hw_init::{self, HwInitError};

pub struct ValveDriver {
    pin: i32,
}

impl ValveDriver {
    /// Bind the configured relay pin. The pin is driven to the released
    /// (closed) level as part of binding.
    pub fn bind(pin: i32) -> Result<Self, HwInitError> {
        hw_init::init_valve_pin(pin)?;
        Ok(Self { pin })
    }

    /// Energise the relay. Idempotent.
    pub fn open(&mut self) {
        hw_init::gpio_write(self.pin, false);
    }

    /// Release the relay. Idempotent.
    pub fn close(&mut self) {
        hw_init::gpio_write(self.pin, true);
    }

    /// Physical valve state, from pin readback.
    pub fn state(&self) -> ValveState {
        if hw_init::gpio_read(self.pin) {
            ValveState::Closed
        } else {
            ValveState::Open
        }
    }

    pub fn pin(&self) -> i32 {
        self.pin
    }
}

impl Drop for ValveDriver {
    /// A released handle always leaves the relay de-energised.
    fn drop(&mut self) {
        hw_init::gpio_write(self.pin, true);
    }
}
