use crate::cloud::{CloudError, CloudResult};
use crate::property::{PropertyId, PropertyValue};

/// Calibration applied until the cloud says otherwise (liters per pulse)
pub const DEFAULT_LITERS_PER_PULSE: f32 = 100.0;

/// Device telemetry shared between the flow-measurement code and the cloud.
///
/// A single instance is owned by the firmware main loop and lent out by
/// reference to property registration, the sync engine and the change hooks.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowTelemetry {
    /// Instantaneous flow rate
    pub flow_rate: f32,
    /// Flow rate converted to m³/h
    pub flow_rate_m3h: f32,
    /// Calibration constant, writable from the cloud
    pub liters_per_pulse: f32,
    /// Running total
    pub total_liters: f32,
    /// Reset trigger, writable from the cloud
    pub reset_total: bool,
}

impl Default for FlowTelemetry {
    fn default() -> Self {
        Self {
            flow_rate: 0.0,
            flow_rate_m3h: 0.0,
            liters_per_pulse: DEFAULT_LITERS_PER_PULSE,
            total_liters: 0.0,
            reset_total: false,
        }
    }
}

impl FlowTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, id: PropertyId) -> PropertyValue {
        match id {
            PropertyId::FlowRate => PropertyValue::Float(self.flow_rate),
            PropertyId::FlowRateM3H => PropertyValue::Float(self.flow_rate_m3h),
            PropertyId::LitersPerPulse => PropertyValue::Float(self.liters_per_pulse),
            PropertyId::TotalLiters => PropertyValue::Float(self.total_liters),
            PropertyId::ResetTotal => PropertyValue::Bool(self.reset_total),
        }
    }

    pub fn set_value(&mut self, id: PropertyId, value: PropertyValue) -> CloudResult<()> {
        match (id, value) {
            (PropertyId::FlowRate, PropertyValue::Float(v)) => self.flow_rate = v,
            (PropertyId::FlowRateM3H, PropertyValue::Float(v)) => self.flow_rate_m3h = v,
            (PropertyId::LitersPerPulse, PropertyValue::Float(v)) => self.liters_per_pulse = v,
            (PropertyId::TotalLiters, PropertyValue::Float(v)) => self.total_liters = v,
            (PropertyId::ResetTotal, PropertyValue::Bool(v)) => self.reset_total = v,
            _ => return Err(CloudError::TypeMismatch(id)),
        }
        Ok(())
    }
}
