//! Credentials baked in at compile time.
//!
//! Export them before building, never commit real values:
//!
//! ```text
//! FLOW_WIFI_SSID=... FLOW_WIFI_PASS=... FLOW_DEVICE_KEY=... cargo build --release
//! ```

/// Device identifier registered with the cloud
pub const DEVICE_LOGIN_NAME: &str = match option_env!("FLOW_DEVICE_LOGIN_NAME") {
    Some(name) => name,
    None => "b22cce1e-1c52-4338-b513-d06abf7a940f",
};

pub const SECRET_SSID: &str = match option_env!("FLOW_WIFI_SSID") {
    Some(ssid) => ssid,
    None => "YOUR_SSID",
};

pub const SECRET_PASS: &str = match option_env!("FLOW_WIFI_PASS") {
    Some(pass) => pass,
    None => "YOUR_PASSWORD",
};

pub const SECRET_DEVICE_KEY: &str = match option_env!("FLOW_DEVICE_KEY") {
    Some(key) => key,
    None => "YOUR_DEVICE_KEY",
};

pub const MQTT_BROKER_URL: &str = match option_env!("FLOW_MQTT_BROKER") {
    Some(url) => url,
    None => "mqtts://YOUR_BROKER_HOST:8883",
};
