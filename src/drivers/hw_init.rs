//! GPIO initialisation and pin-level access for the valve relay.
//!
//! On ESP-IDF this wraps raw sys calls; the relay pin is configured
//! input+output so the driven level can be read back. On host targets a
//! static atomic register simulates pin levels for tests.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU64, Ordering};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

impl std::error::Error for HwInitError {}

// ── Valve relay pin ───────────────────────────────────────────

/// Configure the relay pin as a readable output, idling HIGH (relay
/// released = valve closed). The pull-up covers the window between pad
/// reconfiguration and the first level write, so the relay never
/// glitches on at boot.
#[cfg(target_os = "espidf")]
pub fn init_valve_pin(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    // SAFETY: Called once from main() before the control loop starts;
    // single-threaded at this point.
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pin, 1) };
    log::info!("hw_init: valve relay on GPIO{pin} (input+output, idle HIGH)");
    Ok(())
}

/// Simulated pin-level register, one bit per GPIO.
#[cfg(not(target_os = "espidf"))]
static SIM_PIN_LEVELS: AtomicU64 = AtomicU64::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn init_valve_pin(pin: i32) -> Result<(), HwInitError> {
    if !(0..64).contains(&pin) {
        return Err(HwInitError::GpioConfigFailed(pin));
    }
    gpio_write(pin, true); // idle HIGH = relay released
    log::info!("hw_init(sim): valve relay on GPIO{pin}");
    Ok(())
}

// ── Pin-level access ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // the pin was validated during init_valve_pin(). Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    let mask = 1u64 << pin;
    if high {
        SIM_PIN_LEVELS.fetch_or(mask, Ordering::Relaxed);
    } else {
        SIM_PIN_LEVELS.fetch_and(!mask, Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    SIM_PIN_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
}
