#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use esp32_flow_cloud::config::SYNC_POLL_INTERVAL_MS;
    use esp32_flow_cloud::{
        init_properties, ChangeHooks, CloudCredentials, CloudSync, FlowTelemetry, MqttCloud,
        MqttConfig,
    };
    use esp_idf_hal::delay::FreeRtos;
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;

    // Initialize ESP-IDF system services
    esp_idf_sys::link_patches();

    // Initialize logging
    esp_idf_svc::log::EspLogger::initialize_default();

    log::info!("ESP32 Flow Meter Cloud Node");
    log::info!("Initializing...");

    // Take peripherals, the event loop and NVS (WiFi calibration data)
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    log::info!("✅ ESP32 initialized with ESP-IDF");

    // Credentials are compiled in, see secrets.rs
    let credentials = CloudCredentials::from_secrets()?;

    // The cloud session owns the modem; WiFi comes up during setup
    let mut cloud = MqttCloud::new(peripherals.modem, sysloop, nvs, MqttConfig::default());
    let mut state = FlowTelemetry::new();

    // Register the properties before the first update
    init_properties(&mut cloud, &mut state, &credentials, ChangeHooks::default())?;

    log::info!("Entering sync loop...");

    // Main sync loop
    loop {
        if let Err(e) = cloud.update(&mut state) {
            log::warn!("Cloud update failed: {}", e);
        }
        // Yield to the MQTT and WiFi tasks
        FreeRtos::delay_ms(SYNC_POLL_INTERVAL_MS);
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("flow_app runs on ESP-IDF targets only; use flow_sim on the host")
}
