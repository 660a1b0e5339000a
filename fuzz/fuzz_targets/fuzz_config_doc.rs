//! Fuzz target: `BedConfig::from_json`
//!
//! Drives arbitrary byte sequences through the configuration parser and
//! asserts that it never panics and that every accepted document
//! satisfies the validated invariants.
//!
//! cargo fuzz run fuzz_config_doc

#![no_main]

use libfuzzer_sys::fuzz_target;
use plantbed::config::BedConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(config) = BedConfig::from_json(doc) {
        // Anything the parser accepts must already be validated.
        assert!(config.water_thresholds.start <= config.water_thresholds.stop);
        assert!(config.metrics.port != 0);
        assert!(config.sensor.address <= 0x7F);
        assert!(config.sample_interval_secs > 0);
    }
});
