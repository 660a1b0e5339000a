//! SHT31 temperature/humidity sensor driver.
//!
//! Single-shot measurement over I²C: write the command `[0x2C, 0x06]`
//! (high repeatability with clock stretching), then read a six-byte
//! frame `[t_hi, t_lo, t_crc, h_hi, h_lo, h_crc]`. The device holds SCL
//! until the conversion completes, so no explicit wait is needed.
//!
//! Transfer functions (Fahrenheit output, the device's documented form):
//!
//! ```text
//! T(°F)  = -49 + 315 · raw_t / 65535
//! RH(%)  = 100 · raw_h / 65535
//! ```
//!
//! Each 16-bit word carries a CRC-8 (poly 0x31, init 0xFF) which is
//! verified before decoding. The command/read pair must not interleave
//! with another transaction on the same device; the driver holds its bus
//! by value, so exclusivity follows from ownership.

use crate::app::ports::BusPort;
use crate::error::SensorFault;

/// Factory-default I²C address (ADDR pin low).
pub const DEFAULT_ADDRESS: u8 = 0x44;

/// Single-shot measurement, high repeatability, clock stretching enabled.
const CMD_MEASURE: [u8; 2] = [0x2C, 0x06];

/// Measurement frame length: two 16-bit words, each followed by a CRC.
const FRAME_LEN: usize = 6;

/// A decoded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_f: f32,
    pub humidity_pct: f32,
}

pub struct Sht31<B> {
    bus: B,
    address: u8,
}

impl<B: BusPort> Sht31<B> {
    pub fn new(bus: B, address: u8) -> Self {
        Self { bus, address }
    }

    /// Perform one measurement transaction and decode the frame.
    pub fn read(&mut self) -> Result<Reading, SensorFault> {
        self.bus.write(self.address, &CMD_MEASURE)?;

        let mut frame = [0u8; FRAME_LEN];
        let got = self.bus.read(self.address, &mut frame)?;
        if got != FRAME_LEN {
            return Err(SensorFault::ShortRead { got: got as u8 });
        }
        decode_frame(&frame)
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}

/// Decode a raw six-byte measurement frame.
///
/// Validates both word checksums, then applies the transfer functions.
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Result<Reading, SensorFault> {
    if crc8(&frame[0..2]) != frame[2] || crc8(&frame[3..5]) != frame[5] {
        return Err(SensorFault::CrcMismatch);
    }
    let raw_t = u16::from_be_bytes([frame[0], frame[1]]);
    let raw_h = u16::from_be_bytes([frame[3], frame[4]]);
    Ok(Reading {
        temperature_f: -49.0 + 315.0 * f32::from(raw_t) / 65535.0,
        humidity_pct: 100.0 * f32::from(raw_h) / 65535.0,
    })
}

/// SHT3x checksum: CRC-8, polynomial 0x31, init 0xFF, no reflection.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}
