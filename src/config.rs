//! Bed configuration document.
//!
//! The controller is configured by a single JSON document with the shape:
//!
//! ```json
//! {
//!   "Name": "bed-one",
//!   "Sensor":          { "i2c_bus": 0, "address": 68 },
//!   "WaterValve":      { "pin": 13 },
//!   "WaterThresholds": { "start": 30.0, "stop": 60.0 },
//!   "Metrics":         { "port": 9184 }
//! }
//! ```
//!
//! All listed keys are required; a missing key is a load-time fatal error
//! whose message names the field. `Wifi` and `SampleIntervalSecs` are
//! optional. The document normally lives in NVS (see
//! [`ConfigStore`](crate::adapters::nvs::ConfigStore)) with
//! [`DEFAULT_DOCUMENT`] as the first-boot fallback.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Document embedded in the firmware image, used until an operator stores
/// a real one in NVS.
pub const DEFAULT_DOCUMENT: &str = r#"{
  "Name": "bed-one",
  "Sensor": { "i2c_bus": 0, "address": 68 },
  "WaterValve": { "pin": 13 },
  "WaterThresholds": { "start": 30.0, "stop": 60.0 },
  "Metrics": { "port": 9184 },
  "SampleIntervalSecs": 60
}"#;

/// Top-level configuration for one plant bed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BedConfig {
    /// Operator-facing identifier for this bed.
    pub name: String,
    pub sensor: SensorConfig,
    pub water_valve: ValveConfig,
    pub water_thresholds: ThresholdsConfig,
    pub metrics: MetricsConfig,
    /// Seconds between control cycles.
    #[serde(default = "default_sample_interval_secs")]
    pub sample_interval_secs: u64,
    /// Station credentials; omitted = offline bench mode.
    #[serde(default)]
    pub wifi: Option<WifiConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// I²C peripheral index the sensor is wired to.
    pub i2c_bus: u8,
    /// 7-bit device address (SHT31 default is 0x44 = 68).
    pub address: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValveConfig {
    /// GPIO driving the valve relay.
    pub pin: i32,
}

/// Hysteresis thresholds, in percent relative humidity.
///
/// The valve opens at or below `start` and closes at or above `stop`;
/// between the two the prior state is held.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    pub start: f32,
    pub stop: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// TCP port the scrape endpoint listens on.
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: String,
    /// Empty = open network.
    #[serde(default)]
    pub password: String,
}

fn default_sample_interval_secs() -> u64 {
    60
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal, startup-only configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON or a required key is absent; the
    /// message names the offending field.
    Parse(String),
    /// A field is present but outside its valid range.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "parse: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl BedConfig {
    /// Parse and validate a configuration document.
    pub fn from_json(doc: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Range and ordering checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.water_thresholds;
        if !t.start.is_finite() || !t.stop.is_finite() {
            return Err(ConfigError::Invalid("WaterThresholds: values must be finite"));
        }
        if t.start > t.stop {
            return Err(ConfigError::Invalid("WaterThresholds: start must not exceed stop"));
        }
        if !(0.0..=100.0).contains(&t.start) || !(0.0..=100.0).contains(&t.stop) {
            return Err(ConfigError::Invalid(
                "WaterThresholds: values are percent humidity (0-100)",
            ));
        }
        if self.sensor.address > 0x7F {
            return Err(ConfigError::Invalid("Sensor: address must be a 7-bit I2C address"));
        }
        if !(0..=48).contains(&self.water_valve.pin) {
            return Err(ConfigError::Invalid("WaterValve: pin outside GPIO0-GPIO48"));
        }
        if self.metrics.port == 0 {
            return Err(ConfigError::Invalid("Metrics: port must be non-zero"));
        }
        if self.sample_interval_secs == 0 {
            return Err(ConfigError::Invalid("SampleIntervalSecs must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_is_sane() {
        let c = BedConfig::from_json(DEFAULT_DOCUMENT).unwrap();
        assert_eq!(c.name, "bed-one");
        assert_eq!(c.sensor.address, 0x44);
        assert!(c.water_thresholds.start <= c.water_thresholds.stop);
        assert_eq!(c.sample_interval_secs, 60);
        assert!(c.wifi.is_none());
    }

    #[test]
    fn missing_stop_threshold_names_the_field() {
        let doc = r#"{
            "Name": "bed",
            "Sensor": { "i2c_bus": 0, "address": 68 },
            "WaterValve": { "pin": 13 },
            "WaterThresholds": { "start": 30.0 },
            "Metrics": { "port": 9184 }
        }"#;
        let err = BedConfig::from_json(doc).unwrap_err();
        match err {
            ConfigError::Parse(msg) => assert!(msg.contains("stop"), "message was: {msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_metrics_section_names_the_field() {
        let doc = r#"{
            "Name": "bed",
            "Sensor": { "i2c_bus": 0, "address": 68 },
            "WaterValve": { "pin": 13 },
            "WaterThresholds": { "start": 30.0, "stop": 60.0 }
        }"#;
        let err = BedConfig::from_json(doc).unwrap_err();
        match err {
            ConfigError::Parse(msg) => assert!(msg.contains("Metrics"), "message was: {msg}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn inverted_thresholds_rejected() {
        let doc = r#"{
            "Name": "bed",
            "Sensor": { "i2c_bus": 0, "address": 68 },
            "WaterValve": { "pin": 13 },
            "WaterThresholds": { "start": 60.0, "stop": 30.0 },
            "Metrics": { "port": 9184 }
        }"#;
        assert_eq!(
            BedConfig::from_json(doc).unwrap_err(),
            ConfigError::Invalid("WaterThresholds: start must not exceed stop")
        );
    }

    #[test]
    fn equal_thresholds_accepted() {
        let doc = r#"{
            "Name": "bed",
            "Sensor": { "i2c_bus": 0, "address": 68 },
            "WaterValve": { "pin": 13 },
            "WaterThresholds": { "start": 45.0, "stop": 45.0 },
            "Metrics": { "port": 9184 }
        }"#;
        assert!(BedConfig::from_json(doc).is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let mut c = BedConfig::from_json(DEFAULT_DOCUMENT).unwrap();
        c.metrics.port = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn wide_address_rejected() {
        let mut c = BedConfig::from_json(DEFAULT_DOCUMENT).unwrap();
        c.sensor.address = 0x90;
        assert!(c.validate().is_err());
    }

    #[test]
    fn wifi_section_optional_but_parsed() {
        let doc = r#"{
            "Name": "bed",
            "Sensor": { "i2c_bus": 1, "address": 69 },
            "WaterValve": { "pin": 22 },
            "WaterThresholds": { "start": 30.0, "stop": 60.0 },
            "Metrics": { "port": 9184 },
            "Wifi": { "ssid": "greenhouse" }
        }"#;
        let c = BedConfig::from_json(doc).unwrap();
        let wifi = c.wifi.unwrap();
        assert_eq!(wifi.ssid, "greenhouse");
        assert!(wifi.password.is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let c = BedConfig::from_json(DEFAULT_DOCUMENT).unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let c2 = BedConfig::from_json(&json).unwrap();
        assert_eq!(c.name, c2.name);
        assert_eq!(c.water_valve.pin, c2.water_valve.pin);
        assert!((c.water_thresholds.stop - c2.water_thresholds.stop).abs() < 0.001);
    }
}
