use crate::backoff::reconnect_backoff;
use crate::network_config::WifiConfig;
use anyhow::Result;
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};
use log::{info, warn};
use std::net::Ipv4Addr;
use std::time::Instant;

fn client_configuration(config: &WifiConfig) -> Configuration {
    Configuration::Client(ClientConfiguration {
        ssid: config.ssid.clone(),
        auth_method: AuthMethod::WPA2Personal,
        password: config.password.clone(),
        ..Default::default()
    })
}

/// Station-mode WiFi link that keeps itself connected.
pub struct WifiConnection {
    wifi: Box<BlockingWifi<EspWifi<'static>>>,
    failed_attempts: u32,
    next_retry: Option<Instant>,
}

impl WifiConnection {
    /// Bring the link up. A failed first association is not fatal; it is
    /// retried by [`ensure_connected`](Self::ensure_connected).
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: &WifiConfig,
    ) -> Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
        let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        info!("🌐 WiFi: Configuring for SSID '{}'...", config.ssid);
        wifi.set_configuration(&client_configuration(config))?;
        wifi.start()?;
        info!("✅ WiFi: Started");

        let mut connection = Self {
            wifi: Box::new(wifi),
            failed_attempts: 0,
            next_retry: None,
        };
        connection.try_connect();
        Ok(connection)
    }

    /// Switch to other credentials, dropping the current association.
    pub fn reconfigure(&mut self, config: &WifiConfig) -> Result<()> {
        if self.wifi.is_connected().unwrap_or(false) {
            info!("🔌 WiFi: Disconnecting from current network...");
            let _ = self.wifi.disconnect();
        }
        self.wifi.set_configuration(&client_configuration(config))?;
        self.failed_attempts = 0;
        self.next_retry = None;
        self.try_connect();
        Ok(())
    }

    fn try_connect(&mut self) -> bool {
        let result = self.wifi.connect().and_then(|_| self.wifi.wait_netif_up());
        match result {
            Ok(()) => {
                self.failed_attempts = 0;
                self.next_retry = None;
                match self.get_ip() {
                    Ok(ip) => info!("✅ WiFi: Connected, IP address: {}", ip),
                    Err(_) => info!("✅ WiFi: Connected"),
                }
                true
            }
            Err(e) => {
                self.failed_attempts += 1;
                let delay = reconnect_backoff(self.failed_attempts);
                warn!(
                    "❌ WiFi: Connect failed (#{}, retry in {}s): {:?}",
                    self.failed_attempts,
                    delay.as_secs(),
                    e
                );
                self.next_retry = Some(Instant::now() + delay);
                false
            }
        }
    }

    /// Non-blocking unless a reconnect attempt is due. Returns link state.
    pub fn ensure_connected(&mut self) -> bool {
        if self.is_connected() {
            return true;
        }
        match self.next_retry {
            Some(at) if Instant::now() < at => false,
            _ => {
                info!("🌐 WiFi: Link down, reconnecting...");
                self.try_connect()
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    pub fn get_ip(&self) -> Result<Ipv4Addr> {
        let ip_info = self.wifi.wifi().sta_netif().get_ip_info()?;
        Ok(ip_info.ip)
    }
}
