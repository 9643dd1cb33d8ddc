use crate::backoff::reconnect_backoff;
use crate::config::{MQTT_KEEP_ALIVE_SECS, MQTT_RECONNECT_SECS};
use anyhow::Result;
use embedded_svc::mqtt::client::QoS;
use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type MessageCallback = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

#[derive(Clone, Default)]
struct MqttStatus {
    connected: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
}

pub struct MqttClient {
    client: Mutex<EspMqttClient<'static>>,
    status: MqttStatus,
}

impl MqttClient {
    pub fn new(
        broker_url: &str,
        client_id: &str,
        username: &str,
        password: &str,
        message_callback: MessageCallback,
    ) -> Result<Self> {
        info!("MQTT: Connecting to {} as '{}'", broker_url, client_id);

        let mqtt_config = MqttClientConfiguration {
            client_id: Some(client_id),
            username: Some(username),
            password: Some(password),
            // Verify the broker against the ESP-IDF CA bundle
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            keep_alive_interval: Some(Duration::from_secs(MQTT_KEEP_ALIVE_SECS)),
            reconnect_timeout: Some(Duration::from_secs(MQTT_RECONNECT_SECS)),
            ..Default::default()
        };

        let (client, mut connection): (EspMqttClient<'static>, _) =
            EspMqttClient::new(broker_url, &mqtt_config)?;

        let status = MqttStatus::default();
        let status_clone = status.clone();

        // Spawn connection handler thread
        std::thread::Builder::new()
            .stack_size(8192)
            .name("mqtt_conn".to_string())
            .spawn(move || {
                info!("MQTT: Event handler started");
                let mut consecutive_errors = 0u32;
                let mut last_error_log = Instant::now();

                loop {
                    if status_clone.shutdown.load(Ordering::Relaxed) {
                        info!("🔌 MQTT: Event handler shutting down");
                        break;
                    }

                    match connection.next() {
                        Ok(event) => match event.payload() {
                            EventPayload::Connected(session_present) => {
                                info!("✅ MQTT: Connected (session_present: {})", session_present);
                                status_clone.connected.store(true, Ordering::Relaxed);
                                consecutive_errors = 0;
                            }
                            EventPayload::Disconnected => {
                                info!("🔌 MQTT: Disconnected, client will retry");
                                status_clone.connected.store(false, Ordering::Relaxed);
                            }
                            EventPayload::Received {
                                topic: Some(topic),
                                data,
                                ..
                            } => {
                                message_callback(topic, data);
                            }
                            EventPayload::Error(e) => {
                                if last_error_log.elapsed().as_secs() >= 10 {
                                    warn!("❌ MQTT: {:?}", e);
                                    last_error_log = Instant::now();
                                }
                            }
                            _ => {}
                        },
                        Err(e) => {
                            status_clone.connected.store(false, Ordering::Relaxed);
                            consecutive_errors += 1;
                            let delay = reconnect_backoff(consecutive_errors);

                            if consecutive_errors <= 3 || last_error_log.elapsed().as_secs() >= 30
                            {
                                warn!(
                                    "❌ MQTT: Connection error (#{}, retry in {}s): {:?}",
                                    consecutive_errors,
                                    delay.as_secs(),
                                    e
                                );
                                last_error_log = Instant::now();
                            }
                            std::thread::sleep(delay);
                        }
                    }
                }
            })?;

        Ok(Self {
            client: Mutex::new(client),
            status,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.status.connected.load(Ordering::Relaxed)
    }

    pub fn publish(&self, topic: &str, data: &[u8]) -> Result<()> {
        self.client
            .lock()
            .map_err(|_| anyhow::anyhow!("MQTT client lock poisoned"))?
            .enqueue(topic, QoS::AtLeastOnce, false, data)?;
        Ok(())
    }

    pub fn subscribe(&self, topic: &str) -> Result<()> {
        self.client
            .lock()
            .map_err(|_| anyhow::anyhow!("MQTT client lock poisoned"))?
            .subscribe(topic, QoS::AtLeastOnce)?;
        info!("📥 MQTT: Subscribed to '{}'", topic);
        Ok(())
    }

    pub fn shutdown(&self) {
        info!("🔌 MQTT: Signaling event handler to stop");
        self.status.shutdown.store(true, Ordering::Relaxed);
        self.status.connected.store(false, Ordering::Relaxed);
    }
}

impl Drop for MqttClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}
