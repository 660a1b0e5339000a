//! I²C bus adapter — bridges an embedded-hal bus into [`BusPort`].
//!
//! Any `embedded_hal::i2c::I2c` implementation works; on ESP-IDF that is
//! `esp_idf_hal::i2c::I2cDriver` for the peripheral selected by the
//! configured bus index. The adapter owns its driver, so the
//! write-command/read-data pair of one sensor read cannot interleave
//! with another user of the device. A multi-bed deployment sharing one
//! physical bus would wrap the driver in a mutex instead.

use embedded_hal::i2c::{Error as I2cError, ErrorKind, I2c};

use crate::app::ports::BusPort;
use crate::error::BusError;

pub struct EhalI2cBus<I2C> {
    i2c: I2C,
}

impl<I2C> EhalI2cBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }
}

impl<I2C: I2c> BusPort for EhalI2cBus<I2C> {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c.write(addr, bytes).map_err(map_err)
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<usize, BusError> {
        // embedded-hal reads fill the whole buffer or fail; a short
        // device response surfaces as a NACK mid-transfer.
        self.i2c.read(addr, buf).map_err(map_err)?;
        Ok(buf.len())
    }
}

fn map_err<E: I2cError>(e: E) -> BusError {
    match e.kind() {
        ErrorKind::NoAcknowledge(_) => BusError::Nack,
        _ => BusError::Bus,
    }
}

/// The on-board bus: ESP-IDF I²C master behind the adapter.
#[cfg(target_os = "espidf")]
pub type OnboardI2cBus = EhalI2cBus<esp_idf_hal::i2c::I2cDriver<'static>>;
