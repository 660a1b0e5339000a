//! PlantBed Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single sequential control loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter    LogEventSink     MetricsEventSink        │
//! │  (Sensor+Valve)     (EventSink)      (EventSink)             │
//! │  EhalI2cBus         ConfigStore      MetricsServer  WiFi     │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ────────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              AppService (pure logic)                   │  │
//! │  │  Phase FSM · Hysteresis                                │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  Runner (cancellable fixed-interval cycle)                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration errors are fatal before the loop starts; every runtime
//! fault is contained per-cycle and the process keeps running.
#![deny(unused_must_use)]

use anyhow::{bail, Context, Result};
use log::{info, warn};

use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{config::Config as I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use plantbed::adapters::hardware::HardwareAdapter;
use plantbed::adapters::i2c::EhalI2cBus;
use plantbed::adapters::log_sink::LogEventSink;
use plantbed::adapters::metrics_http::MetricsServer;
use plantbed::adapters::metrics_sink::MetricsEventSink;
use plantbed::adapters::nvs::ConfigStore;
use plantbed::adapters::time::MonotonicClock;
use plantbed::adapters::wifi::{ConnectivityPort, WifiAdapter};
use plantbed::adapters::FanoutSink;
use plantbed::app::ports::ConfigPort;
use plantbed::app::service::AppService;
use plantbed::drivers::valve::ValveDriver;
use plantbed::drivers::watchdog::Watchdog;
use plantbed::metrics::BedMetrics;
use plantbed::pins;
use plantbed::runner::{self, ShutdownSignal};
use plantbed::sensors::sht31::Sht31;

static METRICS: BedMetrics = BedMetrics::new();

/// Nothing fires this on current hardware; the runner still honours it
/// so a future button or network command can stop the loop cleanly.
static SHUTDOWN: ShutdownSignal = ShutdownSignal::new();

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("PlantBed v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration (fatal before the loop starts) ───────
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let store = ConfigStore::new(nvs_partition.clone()).context("NVS init")?;
    let config = store.load().context("configuration rejected")?;
    info!(
        "bed '{}' | thresholds {:.1}..{:.1} %RH | cycle {}s | metrics :{}",
        config.name,
        config.water_thresholds.start,
        config.water_thresholds.stop,
        config.sample_interval_secs,
        config.metrics.port,
    );

    // ── 3. Peripherals & hardware adapter ─────────────────────
    let peripherals = Peripherals::take()?;

    // SAFETY: the I2C pads are fixed board wiring (see pins.rs) and are
    // claimed exactly once, here.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
    let i2c = match config.sensor.i2c_bus {
        0 => I2cDriver::new(peripherals.i2c0, sda, scl, &i2c_config)?,
        1 => I2cDriver::new(peripherals.i2c1, sda, scl, &i2c_config)?,
        other => bail!("Sensor: i2c_bus {other} out of range (0-1)"),
    };
    let sensor = Sht31::new(EhalI2cBus::new(i2c), config.sensor.address);
    let valve = ValveDriver::bind(config.water_valve.pin).context("valve pin")?;
    let mut hw = HardwareAdapter::new(sensor, valve, MonotonicClock::new());

    // ── 4. Metrics endpoint ───────────────────────────────────
    let _metrics_server =
        MetricsServer::bind(config.metrics.port, &METRICS).context("metrics endpoint")?;

    // ── 5. WiFi (optional — offline bench mode without it) ────
    let sysloop = EspSystemEventLoop::take()?;
    let mut wifi = WifiAdapter::new(BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
        sysloop,
    )?);
    if let Some(credentials) = &config.wifi {
        wifi.set_credentials(&credentials.ssid, &credentials.password)
            .map_err(|e| anyhow::anyhow!("Wifi: {e}"))?;
        if let Err(e) = wifi.connect() {
            // Recoverable: poll() retries each cycle.
            warn!("WiFi connect failed ({e}); metrics unreachable until reconnect");
        }
    } else {
        info!("no WiFi credentials — running offline");
    }

    // ── 6. Watchdog (timeout scaled to the cycle interval) ────
    let watchdog = Watchdog::new((config.sample_interval_secs as u32) * 2_000 + 10_000);

    // ── 7. Service + control loop ─────────────────────────────
    let mut sink = FanoutSink(LogEventSink::new(), MetricsEventSink::new(&METRICS));
    let mut service = AppService::new(&config);
    service.start(&mut sink);

    info!("entering control loop ({}s cycle)", config.sample_interval_secs);
    runner::block_on_loop(
        &mut service,
        &mut hw,
        &mut sink,
        config.sample_interval_secs,
        &SHUTDOWN,
        || {
            wifi.poll();
            watchdog.feed();
        },
    );

    // Reached only after a shutdown signal; hw drops here, releasing the
    // bus and de-energising the relay.
    info!("control loop terminated after {} cycles", service.tick_count());
    Ok(())
}
