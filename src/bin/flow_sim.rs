#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    use esp32_flow_cloud::config::SYNC_POLL_INTERVAL_MS;
    use esp32_flow_cloud::{
        init_properties, ChangeHooks, CloudCredentials, CloudSync, FlowTelemetry, LoopbackCloud,
        PropertyValue,
    };
    use std::time::Duration;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let ticks: u32 = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|_| anyhow::anyhow!("usage: flow_sim [ticks]"))?,
        None => 60,
    };

    log::info!("Flow meter cloud simulator ({} ticks)", ticks);

    let credentials = CloudCredentials::from_secrets()?;
    let mut cloud = LoopbackCloud::new();
    let mut state = FlowTelemetry::new();
    init_properties(&mut cloud, &mut state, &credentials, ChangeHooks::default())?;

    let dt_secs = SYNC_POLL_INTERVAL_MS as f32 / 1000.0;
    for tick in 0..ticks {
        // Synthetic flow in liters per minute
        state.flow_rate = 12.0 + (tick % 10) as f32 * 0.5;
        state.flow_rate_m3h = state.flow_rate * 60.0 / 1000.0;
        state.total_liters += state.flow_rate * dt_secs / 60.0;

        match tick {
            20 => cloud.inject("litersPerPulse", PropertyValue::Float(250.0))?,
            40 => cloud.inject("resetTotal", PropertyValue::Bool(true))?,
            _ => {}
        }

        cloud.update(&mut state)?;
        for update in cloud.take_published() {
            log::info!("📤 {} = {:?}", update.id, update.value);
        }
        std::thread::sleep(Duration::from_millis(SYNC_POLL_INTERVAL_MS.into()));
    }

    log::info!("✅ Simulation finished: {:?}", state);
    Ok(())
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    anyhow::bail!("flow_sim runs on the host only; flash flow_app to the device")
}
