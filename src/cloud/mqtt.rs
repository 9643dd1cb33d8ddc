use super::codec;
use super::error::{CloudError, CloudResult};
use super::sync::PropertySync;
use super::topics::CloudTopics;
use super::CloudSync;
use crate::mqtt::MqttClient;
use crate::network_config::{CloudCredentials, MqttConfig};
use crate::registry::PropertyTable;
use crate::telemetry::FlowTelemetry;
use crate::wifi::WifiConnection;
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Instant;

type Inbound = (String, Vec<u8>);

/// Cloud session over WiFi + MQTT.
///
/// Owns the radio: `setup` brings WiFi up with the supplied network
/// credentials and opens an MQTT session authenticated with the device key.
pub struct MqttCloud {
    config: MqttConfig,
    modem: Option<Modem>,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
    wifi: Option<WifiConnection>,
    client: Option<MqttClient>,
    topics: Option<CloudTopics>,
    sync: Option<PropertySync>,
    subscribed: bool,
    inbound_tx: Sender<Inbound>,
    inbound_rx: Receiver<Inbound>,
}

impl MqttCloud {
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
        config: MqttConfig,
    ) -> Self {
        let (inbound_tx, inbound_rx) = channel();
        Self {
            config,
            modem: Some(modem),
            sysloop,
            nvs,
            wifi: None,
            client: None,
            topics: None,
            sync: None,
            subscribed: false,
            inbound_tx,
            inbound_rx,
        }
    }

    fn bring_up_wifi(&mut self, credentials: &CloudCredentials) -> anyhow::Result<()> {
        if let Some(wifi) = self.wifi.as_mut() {
            return wifi.reconfigure(&credentials.wifi);
        }
        let modem = self
            .modem
            .take()
            .ok_or_else(|| anyhow::anyhow!("WiFi modem already consumed"))?;
        let wifi = WifiConnection::connect(
            modem,
            self.sysloop.clone(),
            self.nvs.clone(),
            &credentials.wifi,
        )?;
        self.wifi = Some(wifi);
        Ok(())
    }

    fn subscribe_writable(&mut self) -> CloudResult<()> {
        let (Some(client), Some(topics), Some(sync)) = (&self.client, &self.topics, &self.sync)
        else {
            return Err(CloudError::NotConfigured);
        };
        for property in sync.properties().filter(|p| p.is_writable()) {
            client.subscribe(&topics.set(property.id)).map_err(|e| {
                warn!("❌ Cloud: Subscribe failed for '{}': {:?}", property.id, e);
                CloudError::Transport
            })?;
        }
        self.subscribed = true;
        Ok(())
    }
}

impl CloudSync for MqttCloud {
    fn setup(&mut self, credentials: &CloudCredentials, table: PropertyTable) -> CloudResult<()> {
        let device = credentials.device.login_name.as_str();
        info!("🌐 Cloud: Setting up device '{}'", device);

        // WiFi first, the MQTT client retries on its own until the link is up
        self.bring_up_wifi(credentials).map_err(|e| {
            warn!("❌ Cloud: WiFi setup failed: {:?}", e);
            CloudError::Transport
        })?;

        // Dropping the previous session stops its event thread
        self.client = None;

        // Inbound messages are queued for update(), the event thread never
        // touches the telemetry state
        let tx = self.inbound_tx.clone();
        let callback = Arc::new(move |topic: &str, data: &[u8]| {
            let _ = tx.send((topic.to_string(), data.to_vec()));
        });
        let client = MqttClient::new(
            self.config.broker_url.as_str(),
            device,
            device,
            credentials.device.secret_key.as_str(),
            callback,
        )
        .map_err(|e| {
            warn!("❌ Cloud: MQTT setup failed: {:?}", e);
            CloudError::Transport
        })?;

        self.client = Some(client);
        self.topics = Some(CloudTopics::new(self.config.topic_prefix.as_str(), device));
        self.sync = Some(PropertySync::new(table));
        self.subscribed = false;
        info!("✅ Cloud: Setup complete");
        Ok(())
    }

    fn update(&mut self, state: &mut FlowTelemetry) -> CloudResult<()> {
        if self.sync.is_none() {
            return Err(CloudError::NotConfigured);
        }
        if let Some(wifi) = self.wifi.as_mut() {
            if !wifi.ensure_connected() {
                return Ok(());
            }
        }

        let connected = self.client.as_ref().is_some_and(|c| c.is_connected());
        if !connected {
            self.subscribed = false;
            return Ok(());
        }
        // Subscriptions do not survive a broker reconnect
        if !self.subscribed {
            self.subscribe_writable()?;
        }

        // Apply cloud writes before deciding what to publish
        let (Some(client), Some(topics), Some(sync)) =
            (&self.client, &self.topics, self.sync.as_mut())
        else {
            return Err(CloudError::NotConfigured);
        };

        while let Ok((topic, payload)) = self.inbound_rx.try_recv() {
            let Some(id) = topics.parse_set(&topic) else {
                continue;
            };
            if let Err(e) = sync.apply_remote_named(state, id.name(), &payload) {
                warn!("Cloud: Dropped write to '{}': {}", id, e);
            }
        }

        // Only what the broker accepted counts as synced; the rest stays due
        let now = Instant::now();
        for update in sync.due(state, now) {
            let payload = codec::encode_update(&update)?;
            if let Err(e) = client.publish(&topics.property(update.id), &payload) {
                warn!("❌ Cloud: Publish of '{}' failed: {:?}", update.id, e);
                return Err(CloudError::Transport);
            }
            sync.mark_published(&update, now)?;
        }
        Ok(())
    }
}
