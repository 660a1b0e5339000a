//! Fuzz target: `decode_frame`
//!
//! Feeds arbitrary six-byte frames to the SHT31 decoder and asserts
//! that it never panics and that accepted frames decode into the
//! sensor's physical output range.
//!
//! cargo fuzz run fuzz_sensor_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use plantbed::sensors::sht31::decode_frame;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }
    let frame: [u8; 6] = data[..6].try_into().unwrap();

    if let Ok(reading) = decode_frame(&frame) {
        // Transfer-function output bounds for 16-bit raw codes.
        assert!((-49.0..=266.0).contains(&reading.temperature_f));
        assert!((0.0..=100.0).contains(&reading.humidity_pct));
    }
});
