//! Configuration document storage.
//!
//! The bed configuration is a JSON document (see [`crate::config`])
//! stored under the `plantbed` NVS namespace, key `config`. First boot
//! falls back to the firmware's embedded default document. Parsing and
//! validation happen in [`ConfigPort::load`]; any error there is fatal
//! and names the offending field.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: NVS on the default partition. On host/test: the
//! `PLANTBED_CONFIG` environment variable overrides the default
//! document.

use crate::app::ports::ConfigPort;
use crate::config::{BedConfig, ConfigError, DEFAULT_DOCUMENT};

/// Maximum stored document size. NVS string entries are small; a bed
/// document is well under 1 KiB.
#[cfg(target_os = "espidf")]
const MAX_DOCUMENT_LEN: usize = 1024;

pub struct ConfigStore {
    #[cfg(target_os = "espidf")]
    nvs: esp_idf_svc::nvs::EspNvs<esp_idf_svc::nvs::NvsDefault>,
}

#[cfg(target_os = "espidf")]
impl ConfigStore {
    pub fn new(partition: esp_idf_svc::nvs::EspDefaultNvsPartition) -> anyhow::Result<Self> {
        let nvs = esp_idf_svc::nvs::EspNvs::new(partition, "plantbed", true)?;
        Ok(Self { nvs })
    }

    /// The raw stored document, if any.
    fn load_document(&self) -> Option<String> {
        let mut buf = [0u8; MAX_DOCUMENT_LEN];
        match self.nvs.get_str("config", &mut buf) {
            Ok(Some(doc)) => Some(doc.to_string()),
            Ok(None) => None,
            Err(e) => {
                log::warn!("NVS config read failed ({e}), using embedded default");
                None
            }
        }
    }

    /// Persist a new document (e.g. from a provisioning tool).
    pub fn store_document(&mut self, doc: &str) -> anyhow::Result<()> {
        self.nvs.set_str("config", doc)?;
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl ConfigStore {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {})
    }

    fn load_document(&self) -> Option<String> {
        std::env::var("PLANTBED_CONFIG").ok()
    }
}

impl ConfigPort for ConfigStore {
    fn load(&self) -> Result<BedConfig, ConfigError> {
        match self.load_document() {
            Some(doc) => BedConfig::from_json(&doc),
            None => {
                log::info!("no stored configuration, using embedded default");
                BedConfig::from_json(DEFAULT_DOCUMENT)
            }
        }
    }
}
