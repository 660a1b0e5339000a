//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] — the hexagonal boundary for network
//! connectivity. Credentials come from the optional `Wifi` section of
//! the configuration document; without them the controller runs offline
//! and the metrics port is simply unreachable.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via
//!   `esp_idf_svc::wifi::BlockingWifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! `poll()` retries a lost connection once per call; the control loop
//! polls once per cycle, so retry pacing follows the cycle interval
//! rather than a separate backoff timer.

use core::fmt;
use log::{info, warn};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    fn poll(&mut self);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(()); // open network
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    #[cfg(target_os = "espidf")]
    wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>,
    /// Simulation: counts platform_connect() calls for deterministic failures.
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: esp_idf_svc::wifi::BlockingWifi<esp_idf_svc::wifi::EspWifi<'static>>) -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            wifi,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            sim_connect_counter: 0,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self
                .ssid
                .as_str()
                .try_into()
                .map_err(|()| ConnectivityError::InvalidSsid)?,
            password: self
                .password
                .as_str()
                .try_into()
                .map_err(|()| ConnectivityError::InvalidPassword)?,
            auth_method,
            ..Default::default()
        };

        if let Err(e) = self.wifi.set_configuration(&Configuration::Client(client)) {
            warn!("WiFi(espidf): set_configuration failed — {e}");
            return Err(ConnectivityError::ConnectionFailed);
        }
        if !self.wifi.is_started().unwrap_or(false) {
            if let Err(e) = self.wifi.start() {
                warn!("WiFi(espidf): start failed — {e}");
                return Err(ConnectivityError::ConnectionFailed);
            }
        }
        if let Err(e) = self.wifi.connect() {
            warn!("WiFi(espidf): connect failed — {e}");
            return Err(ConnectivityError::ConnectionFailed);
        }
        if let Err(e) = self.wifi.wait_netif_up() {
            warn!("WiFi(espidf): netif up wait failed — {e}");
            return Err(ConnectivityError::ConnectionFailed);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), ConnectivityError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        // Every 5th attempt fails, exercising the reconnect path.
        if self.sim_connect_counter % 5 == 0 {
            warn!("WiFi(sim): simulated failure (attempt {})", self.sim_connect_counter);
            return Err(ConnectivityError::ConnectionFailed);
        }
        info!("WiFi(sim): connected to '{}' (attempt {})", self.ssid, self.sim_connect_counter);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        let _ = self.wifi.disconnect();
        let _ = self.wifi.stop();
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("WiFi(sim): disconnected");
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;

        match self.platform_connect() {
            Ok(()) => {
                self.state = WifiState::Connected;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                warn!("WiFi: connection failed — {e}");
                self.state = WifiState::Reconnecting { attempt: 0 };
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn poll(&mut self) {
        match self.state {
            WifiState::Reconnecting { attempt } => {
                info!("WiFi: reconnect attempt {attempt}");
                match self.platform_connect() {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        info!("WiFi: reconnected");
                    }
                    Err(_) => {
                        self.state = WifiState::Reconnecting { attempt: attempt + 1 };
                    }
                }
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                }
            }
            WifiState::Disconnected | WifiState::Connecting => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid.push_str(ssid).map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
