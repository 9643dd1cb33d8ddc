//! ESP32 Flow Meter Cloud Properties
//!
//! Binds the flow meter telemetry (flow rate, totalized liters, calibration
//! constant, reset flag) to cloud-synchronized properties.

pub mod backoff;
pub mod cloud;
pub mod config;
pub mod network_config;
pub mod property;
pub mod registry;
pub mod secrets;
pub mod telemetry;

#[cfg(target_os = "espidf")]
pub mod mqtt;
#[cfg(target_os = "espidf")]
pub mod wifi;

pub use cloud::{CloudError, CloudResult, CloudSync, LoopbackCloud, PropertySync, PropertyUpdate};
pub use network_config::{CloudCredentials, DeviceCredentials, MqttConfig, WifiConfig};
pub use property::{ChangeHook, Permission, Property, PropertyId, PropertyValue, UpdatePolicy};
pub use registry::{
    build_property_table, init_properties, on_liters_per_pulse_change, on_reset_total_change,
    ChangeHooks, PropertyTable,
};
pub use telemetry::{FlowTelemetry, DEFAULT_LITERS_PER_PULSE};

#[cfg(target_os = "espidf")]
pub use cloud::MqttCloud;
#[cfg(target_os = "espidf")]
pub use mqtt::MqttClient;
#[cfg(target_os = "espidf")]
pub use wifi::WifiConnection;
