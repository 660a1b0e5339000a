//! Task Watchdog Timer (TWDT) driver.
//!
//! Wraps the ESP-IDF TWDT API to reset the device if the control loop
//! stalls. The timeout is scaled to the configured cycle interval, since
//! the loop intentionally sleeps between cycles; the runner's
//! housekeeping hook calls `feed()` once per cycle.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

pub struct Watchdog {
    #[cfg(target_os = "espidf")]
    subscribed: bool,
}

impl Watchdog {
    /// Initialise and subscribe the current task to the TWDT with the
    /// given timeout. Must exceed the loop's cycle interval.
    #[cfg(target_os = "espidf")]
    pub fn new(timeout_ms: u32) -> Self {
        unsafe {
            let cfg = esp_task_wdt_config_t {
                timeout_ms,
                idle_core_mask: 0,
                trigger_panic: true,
            };
            let ret = esp_task_wdt_reconfigure(&cfg);
            if ret != ESP_OK {
                log::warn!("TWDT reconfigure returned {ret} (may already be configured)");
            }

            let ret = esp_task_wdt_add(core::ptr::null_mut());
            let subscribed = ret == ESP_OK;
            if subscribed {
                log::info!("Watchdog: subscribed ({}s timeout, panic on trigger)", timeout_ms / 1000);
            } else {
                log::warn!("Watchdog: failed to subscribe ({ret})");
            }

            Self { subscribed }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(_timeout_ms: u32) -> Self {
        log::info!("Watchdog(sim): no-op");
        Self {}
    }

    /// Feed the watchdog. Called once per control cycle.
    pub fn feed(&self) {
        #[cfg(target_os = "espidf")]
        {
            if self.subscribed {
                unsafe {
                    esp_task_wdt_reset();
                }
            }
        }
    }
}
