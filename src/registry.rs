//! Registration of the device telemetry with the cloud property table.

use crate::cloud::{CloudError, CloudResult, CloudSync};
use crate::config::MAX_PROPERTIES;
use crate::network_config::CloudCredentials;
use crate::property::{ChangeHook, Permission, Property, PropertyId, UpdatePolicy};
use crate::telemetry::{FlowTelemetry, DEFAULT_LITERS_PER_PULSE};

pub type PropertyTable = heapless::Vec<Property, MAX_PROPERTIES>;

/// Handlers for the two cloud-writable properties.
#[derive(Debug, Clone, Copy)]
pub struct ChangeHooks {
    pub liters_per_pulse: ChangeHook,
    pub reset_total: ChangeHook,
}

impl Default for ChangeHooks {
    fn default() -> Self {
        Self {
            liters_per_pulse: on_liters_per_pulse_change,
            reset_total: on_reset_total_change,
        }
    }
}

pub fn on_liters_per_pulse_change(state: &mut FlowTelemetry) {
    log::info!(
        "Cloud: litersPerPulse changed to {}",
        state.liters_per_pulse
    );
}

// Only reports the flag; whether a reset clears totalLiters is up to the
// firmware that owns totalization, which passes its own ChangeHooks.
pub fn on_reset_total_change(state: &mut FlowTelemetry) {
    log::info!("Cloud: resetTotal changed to {}", state.reset_total);
}

pub fn build_property_table(hooks: &ChangeHooks) -> CloudResult<PropertyTable> {
    let entries = [
        Property::new(
            PropertyId::FlowRate,
            Permission::Read,
            UpdatePolicy::every_secs(1),
        ),
        Property::new(
            PropertyId::FlowRateM3H,
            Permission::Read,
            UpdatePolicy::every_secs(5),
        ),
        Property::new(
            PropertyId::LitersPerPulse,
            Permission::ReadWrite,
            UpdatePolicy::OnChange,
        )
        .with_hook(hooks.liters_per_pulse),
        Property::new(
            PropertyId::TotalLiters,
            Permission::Read,
            UpdatePolicy::OnChange,
        ),
        Property::new(
            PropertyId::ResetTotal,
            Permission::ReadWrite,
            UpdatePolicy::OnChange,
        )
        .with_hook(hooks.reset_total),
    ];

    let mut table = PropertyTable::new();
    for property in entries {
        table.push(property).map_err(|_| CloudError::TableFull)?;
    }
    Ok(table)
}

/// Register the telemetry with the cloud subsystem and seed the calibration.
///
/// Issues exactly one `setup` call. Must run before the first `update`.
/// Connection failures, retries and duplicate registration are the cloud
/// subsystem's business; its error is returned as is.
pub fn init_properties<C: CloudSync + ?Sized>(
    cloud: &mut C,
    state: &mut FlowTelemetry,
    credentials: &CloudCredentials,
    hooks: ChangeHooks,
) -> CloudResult<()> {
    let table = build_property_table(&hooks)?;

    log::info!(
        "Cloud: Registering {} properties for device '{}'",
        table.len(),
        credentials.device.login_name.as_str()
    );
    cloud.setup(credentials, table)?;

    state.liters_per_pulse = DEFAULT_LITERS_PER_PULSE;
    log::info!(
        "✅ Cloud: Properties registered (litersPerPulse = {})",
        state.liters_per_pulse
    );
    Ok(())
}
