use crate::cloud::{CloudError, CloudResult};
use crate::secrets;
use serde::{Deserialize, Serialize};

fn bounded<const N: usize>(value: &str) -> CloudResult<heapless::String<N>> {
    let mut out = heapless::String::new();
    out.push_str(value)
        .map_err(|_| CloudError::CredentialTooLong)?;
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: heapless::String<32>,
    pub password: heapless::String<64>,
}

impl WifiConfig {
    pub fn new(ssid: &str, password: &str) -> CloudResult<Self> {
        Ok(Self {
            ssid: bounded(ssid)?,
            password: bounded(password)?,
        })
    }
}

/// Identity the device authenticates to the cloud with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCredentials {
    pub login_name: heapless::String<64>,
    pub secret_key: heapless::String<64>,
}

impl DeviceCredentials {
    pub fn new(login_name: &str, secret_key: &str) -> CloudResult<Self> {
        Ok(Self {
            login_name: bounded(login_name)?,
            secret_key: bounded(secret_key)?,
        })
    }
}

/// Everything the cloud subsystem needs to bring a session up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudCredentials {
    pub device: DeviceCredentials,
    pub wifi: WifiConfig,
}

impl CloudCredentials {
    pub fn new(ssid: &str, password: &str, device_key: &str) -> CloudResult<Self> {
        Ok(Self {
            device: DeviceCredentials::new(secrets::DEVICE_LOGIN_NAME, device_key)?,
            wifi: WifiConfig::new(ssid, password)?,
        })
    }

    /// Credentials compiled in through the secrets source
    pub fn from_secrets() -> CloudResult<Self> {
        Self::new(
            secrets::SECRET_SSID,
            secrets::SECRET_PASS,
            secrets::SECRET_DEVICE_KEY,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker_url: heapless::String<128>,
    pub topic_prefix: heapless::String<32>,
}

impl MqttConfig {
    pub fn new(broker_url: &str, topic_prefix: &str) -> CloudResult<Self> {
        Ok(Self {
            broker_url: bounded(broker_url)?,
            topic_prefix: bounded(topic_prefix)?,
        })
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        let mut broker_url = heapless::String::new();
        let mut topic_prefix = heapless::String::new();
        let _ = broker_url.push_str(secrets::MQTT_BROKER_URL);
        let _ = topic_prefix.push_str("flowmeter");

        Self {
            broker_url,
            topic_prefix,
        }
    }
}
