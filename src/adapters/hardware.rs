//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the SHT31 driver and the valve driver, exposing them through
//! [`SensorPort`] and [`ValvePort`]. This is the only module in the
//! system that touches actual hardware; on non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{BusPort, SensorPort, ValvePort};
use crate::control::hysteresis::ValveState;
use crate::drivers::valve::ValveDriver;
use crate::error::SensorFault;
use crate::fsm::context::SensorSample;
use crate::sensors::sht31::Sht31;

use super::time::MonotonicClock;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<B> {
    sensor: Sht31<B>,
    valve: ValveDriver,
    clock: MonotonicClock,
}

impl<B: BusPort> HardwareAdapter<B> {
    pub fn new(sensor: Sht31<B>, valve: ValveDriver, clock: MonotonicClock) -> Self {
        Self {
            sensor,
            valve,
            clock,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<B: BusPort> SensorPort for HardwareAdapter<B> {
    fn read(&mut self) -> Result<SensorSample, SensorFault> {
        let reading = self.sensor.read()?;
        Ok(SensorSample {
            temperature_f: reading.temperature_f,
            humidity_pct: reading.humidity_pct,
            captured_at_us: self.clock.uptime_us(),
        })
    }
}

// ── ValvePort implementation ──────────────────────────────────

impl<B: BusPort> ValvePort for HardwareAdapter<B> {
    fn open(&mut self) {
        self.valve.open();
    }

    fn close(&mut self) {
        self.valve.close();
    }

    fn state(&self) -> ValveState {
        self.valve.state()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::error::BusError;
    use crate::sensors::sht31::{crc8, DEFAULT_ADDRESS};

    struct OneShotBus {
        frame: Option<[u8; 6]>,
    }

    impl BusPort for OneShotBus {
        fn write(&mut self, _addr: u8, _bytes: &[u8]) -> Result<(), BusError> {
            Ok(())
        }

        fn read(&mut self, _addr: u8, buf: &mut [u8]) -> Result<usize, BusError> {
            match self.frame.take() {
                Some(frame) => {
                    buf[..6].copy_from_slice(&frame);
                    Ok(6)
                }
                None => Err(BusError::Bus),
            }
        }
    }

    #[test]
    fn read_produces_timestamped_sample() {
        let raw_h = 0x8000u16.to_be_bytes();
        let raw_t = 0x6666u16.to_be_bytes();
        let frame = [raw_t[0], raw_t[1], crc8(&raw_t), raw_h[0], raw_h[1], crc8(&raw_h)];

        let sensor = Sht31::new(OneShotBus { frame: Some(frame) }, DEFAULT_ADDRESS);
        let valve = ValveDriver::bind(35).unwrap();
        let mut hw = HardwareAdapter::new(sensor, valve, MonotonicClock::new());

        let sample = hw.read().unwrap();
        assert!((sample.humidity_pct - 50.0).abs() < 0.05);

        assert_eq!(hw.state(), ValveState::Closed);
        hw.open();
        assert_eq!(hw.state(), ValveState::Open);
    }
}
