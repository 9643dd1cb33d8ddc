use crate::telemetry::FlowTelemetry;
use core::fmt;
use core::time::Duration;
use serde::{Serialize, Serializer};

/// Handler invoked after a read-write property was changed by the cloud.
pub type ChangeHook = fn(&mut FlowTelemetry);

/// Every value the device exposes to the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    FlowRate,
    FlowRateM3H,
    LitersPerPulse,
    TotalLiters,
    ResetTotal,
}

impl PropertyId {
    pub const ALL: [PropertyId; 5] = [
        PropertyId::FlowRate,
        PropertyId::FlowRateM3H,
        PropertyId::LitersPerPulse,
        PropertyId::TotalLiters,
        PropertyId::ResetTotal,
    ];

    /// Name the property is known by on the cloud side
    pub fn name(self) -> &'static str {
        match self {
            PropertyId::FlowRate => "flowRate",
            PropertyId::FlowRateM3H => "flowRateM3H",
            PropertyId::LitersPerPulse => "litersPerPulse",
            PropertyId::TotalLiters => "totalLiters",
            PropertyId::ResetTotal => "resetTotal",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }

    pub fn kind(self) -> ValueKind {
        match self {
            PropertyId::ResetTotal => ValueKind::Bool,
            _ => ValueKind::Float,
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Bool(bool),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Float(_) => ValueKind::Float,
            PropertyValue::Bool(_) => ValueKind::Bool,
        }
    }

    /// Equality for change detection; NaN counts as equal to NaN
    pub fn same_as(&self, other: &PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::Float(a), PropertyValue::Float(b)) => {
                a == b || (a.is_nan() && b.is_nan())
            }
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

// Serialized as a bare JSON scalar
impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            PropertyValue::Float(v) => serializer.serialize_f32(v),
            PropertyValue::Bool(v) => serializer.serialize_bool(v),
        }
    }
}

/// Direction of synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Device to cloud only
    Read,
    /// Device to cloud, and writable from the cloud
    ReadWrite,
}

/// When a property is pushed to the cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Publish unconditionally once the interval has elapsed
    Every(Duration),
    /// Publish only when the value differs from the last synced one
    OnChange,
}

impl UpdatePolicy {
    pub const fn every_secs(secs: u64) -> Self {
        UpdatePolicy::Every(Duration::from_secs(secs))
    }
}

/// One entry of the cloud property table.
#[derive(Debug, Clone, Copy)]
pub struct Property {
    pub id: PropertyId,
    pub permission: Permission,
    pub policy: UpdatePolicy,
    pub on_change: Option<ChangeHook>,
}

impl Property {
    pub fn new(id: PropertyId, permission: Permission, policy: UpdatePolicy) -> Self {
        Self {
            id,
            permission,
            policy,
            on_change: None,
        }
    }

    pub fn with_hook(mut self, hook: ChangeHook) -> Self {
        self.on_change = Some(hook);
        self
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn is_writable(&self) -> bool {
        self.permission == Permission::ReadWrite
    }
}
