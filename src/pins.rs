//! Fixed board wiring for the controller.
//!
//! Single source of truth for pins that are soldered, not configured.
//! The valve relay pin and the sensor's bus index/address are deployment
//! choices and come from the configuration document instead.

// ---------------------------------------------------------------------------
// I²C bus (SHT31 temperature/humidity sensor)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;

/// Standard-mode clock; the SHT31 stretches SCL during conversion.
pub const I2C_FREQ_HZ: u32 = 100_000;
