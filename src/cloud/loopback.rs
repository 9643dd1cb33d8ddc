use super::codec;
use super::error::{CloudError, CloudResult};
use super::sync::{PropertySync, PropertyUpdate};
use super::CloudSync;
use crate::network_config::CloudCredentials;
use crate::property::PropertyValue;
use crate::registry::PropertyTable;
use crate::telemetry::FlowTelemetry;
use std::collections::VecDeque;
use std::time::Instant;

/// In-memory cloud: remote writes are injected locally and published updates
/// are collected in an outbox. Used by the host simulator.
#[derive(Debug, Default)]
pub struct LoopbackCloud {
    credentials: Option<CloudCredentials>,
    sync: Option<PropertySync>,
    setup_count: usize,
    inbox: VecDeque<(String, Vec<u8>)>,
    outbox: Vec<PropertyUpdate>,
}

impl LoopbackCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> Option<&CloudCredentials> {
        self.credentials.as_ref()
    }

    pub fn setup_count(&self) -> usize {
        self.setup_count
    }

    /// Queue a write as if it came from the cloud dashboard
    pub fn inject(&mut self, name: &str, value: PropertyValue) -> CloudResult<()> {
        let payload = codec::encode_value(&value)?;
        self.inject_raw(name, &payload);
        Ok(())
    }

    pub fn inject_raw(&mut self, name: &str, payload: &[u8]) {
        self.inbox.push_back((name.to_string(), payload.to_vec()));
    }

    pub fn take_published(&mut self) -> Vec<PropertyUpdate> {
        std::mem::take(&mut self.outbox)
    }
}

impl CloudSync for LoopbackCloud {
    fn setup(&mut self, credentials: &CloudCredentials, table: PropertyTable) -> CloudResult<()> {
        self.setup_count += 1;
        self.credentials = Some(credentials.clone());
        self.sync = Some(PropertySync::new(table));
        log::info!(
            "Loopback: Device '{}' set up (ssid '{}')",
            credentials.device.login_name.as_str(),
            credentials.wifi.ssid.as_str()
        );
        Ok(())
    }

    fn update(&mut self, state: &mut FlowTelemetry) -> CloudResult<()> {
        let sync = self.sync.as_mut().ok_or(CloudError::NotConfigured)?;

        while let Some((name, payload)) = self.inbox.pop_front() {
            if let Err(e) = sync.apply_remote_named(state, &name, &payload) {
                log::warn!("Loopback: Dropped write to '{}': {}", name, e);
            }
        }

        for update in sync.poll(state, Instant::now()) {
            log::debug!("Loopback: Publish {} = {:?}", update.id, update.value);
            self.outbox.push(update);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyId;
    use crate::registry::{init_properties, ChangeHooks};

    fn configured() -> (LoopbackCloud, FlowTelemetry) {
        let mut cloud = LoopbackCloud::new();
        let mut state = FlowTelemetry::new();
        let creds = CloudCredentials::new("ssid", "pass", "key").unwrap();
        init_properties(&mut cloud, &mut state, &creds, ChangeHooks::default()).unwrap();
        (cloud, state)
    }

    #[test]
    fn test_update_before_setup_fails() {
        let mut cloud = LoopbackCloud::new();
        let mut state = FlowTelemetry::new();
        assert_eq!(cloud.update(&mut state), Err(CloudError::NotConfigured));
    }

    #[test]
    fn test_setup_is_recorded_per_call() {
        let mut cloud = LoopbackCloud::new();
        let mut state = FlowTelemetry::new();
        let creds = CloudCredentials::new("myssid", "mypass", "dev-key").unwrap();

        init_properties(&mut cloud, &mut state, &creds, ChangeHooks::default()).unwrap();
        init_properties(&mut cloud, &mut state, &creds, ChangeHooks::default()).unwrap();

        assert_eq!(cloud.setup_count(), 2);
        assert_eq!(cloud.credentials(), Some(&creds));
    }

    #[test]
    fn test_injected_writes_reach_state() {
        let (mut cloud, mut state) = configured();
        cloud.update(&mut state).unwrap();
        assert_eq!(cloud.take_published().len(), 5);

        cloud
            .inject("litersPerPulse", PropertyValue::Float(10.0))
            .unwrap();
        cloud.inject_raw("flowRate", b"3.0");
        cloud.update(&mut state).unwrap();

        assert_eq!(state.liters_per_pulse, 10.0);
        assert_eq!(state.flow_rate, 0.0);
        assert!(cloud
            .take_published()
            .iter()
            .all(|u| u.id != PropertyId::LitersPerPulse));
    }
}
