//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements       | Connects to                  |
//! |----------------|------------------|------------------------------|
//! | `i2c`          | BusPort          | embedded-hal I²C driver      |
//! | `hardware`     | SensorPort       | SHT31 over the I²C bus       |
//! |                | ValvePort        | Relay GPIO                   |
//! | `log_sink`     | EventSink        | Serial log output            |
//! | `metrics_sink` | EventSink        | Scrape gauges                |
//! | `metrics_http` | —                | `GET /metrics` endpoint      |
//! | `nvs`          | ConfigPort       | NVS / env-var config store   |
//! | `wifi`         | ConnectivityPort | ESP-IDF WiFi STA             |
//! | `time`         | —                | Monotonic clock              |

pub mod hardware;
pub mod i2c;
pub mod log_sink;
pub mod metrics_http;
pub mod metrics_sink;
pub mod nvs;
pub mod time;
pub mod wifi;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Fans one event stream out to two sinks (typically log + metrics).
pub struct FanoutSink<A, B>(pub A, pub B);

impl<A: EventSink, B: EventSink> EventSink for FanoutSink<A, B> {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}
