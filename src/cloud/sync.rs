use super::codec;
use super::error::{CloudError, CloudResult};
use crate::config::MAX_PROPERTIES;
use crate::property::{Property, PropertyId, PropertyValue, UpdatePolicy};
use crate::registry::PropertyTable;
use crate::telemetry::FlowTelemetry;
use std::time::Instant;

/// A value the device should push to the cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyUpdate {
    pub id: PropertyId,
    pub value: PropertyValue,
}

pub type UpdateBatch = heapless::Vec<PropertyUpdate, MAX_PROPERTIES>;

#[derive(Debug)]
struct SyncSlot {
    property: Property,
    /// Last value published or received
    last_value: Option<PropertyValue>,
    last_publish: Option<Instant>,
}

impl SyncSlot {
    fn is_due(&self, current: &PropertyValue, now: Instant) -> bool {
        let Some(published_at) = self.last_publish else {
            return true;
        };
        match self.property.policy {
            UpdatePolicy::Every(period) => now.saturating_duration_since(published_at) >= period,
            UpdatePolicy::OnChange => !self
                .last_value
                .is_some_and(|last| last.same_as(current)),
        }
    }
}

/// Transport-independent bookkeeping for a registered property table.
///
/// Decides what is due for publishing and applies writes coming from the
/// cloud, dispatching the registered change hooks.
#[derive(Debug)]
pub struct PropertySync {
    slots: heapless::Vec<SyncSlot, MAX_PROPERTIES>,
}

impl PropertySync {
    pub fn new(table: PropertyTable) -> Self {
        let mut slots = heapless::Vec::new();
        for property in table {
            // Same capacity as the table, cannot overflow
            let _ = slots.push(SyncSlot {
                property,
                last_value: None,
                last_publish: None,
            });
        }
        Self { slots }
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.slots.iter().map(|slot| &slot.property)
    }

    fn slot_mut(&mut self, id: PropertyId) -> CloudResult<&mut SyncSlot> {
        self.slots
            .iter_mut()
            .find(|slot| slot.property.id == id)
            .ok_or(CloudError::UnknownProperty)
    }

    /// Properties due for publishing at `now`. Nothing is marked as sent;
    /// call [`mark_published`](Self::mark_published) once delivery succeeded.
    pub fn due(&self, state: &FlowTelemetry, now: Instant) -> UpdateBatch {
        let mut batch = UpdateBatch::new();
        for slot in self.slots.iter() {
            let current = state.value(slot.property.id);
            if slot.is_due(&current, now) {
                let _ = batch.push(PropertyUpdate {
                    id: slot.property.id,
                    value: current,
                });
            }
        }
        batch
    }

    pub fn mark_published(&mut self, update: &PropertyUpdate, now: Instant) -> CloudResult<()> {
        let slot = self.slot_mut(update.id)?;
        slot.last_value = Some(update.value);
        slot.last_publish = Some(now);
        Ok(())
    }

    /// Collect the properties due at `now` and mark them all as published,
    /// for transports that cannot fail to deliver.
    pub fn poll(&mut self, state: &FlowTelemetry, now: Instant) -> UpdateBatch {
        let batch = self.due(state, now);
        for update in &batch {
            // Every id in the batch comes from our own slots
            let _ = self.mark_published(update, now);
        }
        batch
    }

    /// Apply a value written from the cloud.
    ///
    /// Returns `Ok(true)` when the state changed and the hook ran, `Ok(false)`
    /// when the value was already current.
    pub fn apply_remote(
        &mut self,
        state: &mut FlowTelemetry,
        id: PropertyId,
        value: PropertyValue,
    ) -> CloudResult<bool> {
        let slot = self.slot_mut(id)?;
        if !slot.property.is_writable() {
            return Err(CloudError::ReadOnly(id));
        }
        if value.kind() != id.kind() {
            return Err(CloudError::TypeMismatch(id));
        }
        if let PropertyValue::Float(v) = value {
            if !v.is_finite() {
                return Err(CloudError::InvalidPayload);
            }
        }

        // Remember it as synced so it is not echoed back
        slot.last_value = Some(value);
        if state.value(id).same_as(&value) {
            return Ok(false);
        }

        state.set_value(id, value)?;
        log::info!("Cloud: {} updated remotely to {:?}", id, value);
        if let Some(hook) = slot.property.on_change {
            hook(state);
        }
        Ok(true)
    }

    /// Same as [`apply_remote`](Self::apply_remote), from a cloud name and a
    /// JSON scalar payload.
    pub fn apply_remote_named(
        &mut self,
        state: &mut FlowTelemetry,
        name: &str,
        payload: &[u8],
    ) -> CloudResult<bool> {
        let id = PropertyId::from_name(name).ok_or(CloudError::UnknownProperty)?;
        let value = codec::decode_value(id.kind(), payload)?;
        self.apply_remote(state, id, value)
    }
}
