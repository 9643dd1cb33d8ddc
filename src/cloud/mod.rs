//! Cloud synchronization port and its implementations.
//!
//! The firmware talks to the cloud only through [`CloudSync`]: one `setup`
//! call from the property registry, then `update` from the main loop.

pub mod codec;
pub mod error;
pub mod loopback;
pub mod sync;
pub mod topics;

#[cfg(target_os = "espidf")]
pub mod mqtt;

pub use error::{CloudError, CloudResult};
pub use loopback::LoopbackCloud;
pub use sync::{PropertySync, PropertyUpdate, UpdateBatch};
pub use topics::CloudTopics;

#[cfg(target_os = "espidf")]
pub use mqtt::MqttCloud;

use crate::network_config::CloudCredentials;
use crate::registry::PropertyTable;
use crate::telemetry::FlowTelemetry;

pub trait CloudSync {
    /// Hand over the device identity, network credentials and property table.
    fn setup(&mut self, credentials: &CloudCredentials, table: PropertyTable) -> CloudResult<()>;

    /// Process pending sync events: apply cloud writes (running change hooks)
    /// and publish whatever is due. Called repeatedly from the main loop.
    fn update(&mut self, state: &mut FlowTelemetry) -> CloudResult<()>;
}
