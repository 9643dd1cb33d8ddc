//! JSON payloads exchanged with the cloud.

use super::error::{CloudError, CloudResult};
use super::sync::PropertyUpdate;
use crate::property::{PropertyValue, ValueKind};
use serde::Serialize;

#[derive(Serialize)]
struct UpdateMessage<'a> {
    name: &'a str,
    value: PropertyValue,
}

/// `{"name":"flowRate","value":12.5}`
pub fn encode_update(update: &PropertyUpdate) -> CloudResult<Vec<u8>> {
    let message = UpdateMessage {
        name: update.id.name(),
        value: update.value,
    };
    serde_json::to_vec(&message).map_err(|_| CloudError::InvalidPayload)
}

/// Bare JSON scalar, as sent on a property's `set` topic
pub fn encode_value(value: &PropertyValue) -> CloudResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|_| CloudError::InvalidPayload)
}

/// Non-finite floats are refused: JSON cannot carry them back out.
pub fn decode_value(kind: ValueKind, payload: &[u8]) -> CloudResult<PropertyValue> {
    let value = match kind {
        ValueKind::Float => serde_json::from_slice::<f32>(payload).map(PropertyValue::Float),
        ValueKind::Bool => serde_json::from_slice::<bool>(payload).map(PropertyValue::Bool),
    }
    .map_err(|_| CloudError::InvalidPayload)?;

    match value {
        PropertyValue::Float(v) if !v.is_finite() => Err(CloudError::InvalidPayload),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyId;

    #[test]
    fn test_update_message_layout() {
        let update = PropertyUpdate {
            id: PropertyId::TotalLiters,
            value: PropertyValue::Float(1.5),
        };
        let bytes = encode_update(&update).unwrap();
        assert_eq!(
            core::str::from_utf8(&bytes).unwrap(),
            r#"{"name":"totalLiters","value":1.5}"#
        );
    }

    #[test]
    fn test_decode_uses_property_kind() {
        assert_eq!(
            decode_value(ValueKind::Float, b" 100 ").unwrap(),
            PropertyValue::Float(100.0)
        );
        assert_eq!(
            decode_value(ValueKind::Bool, b"false").unwrap(),
            PropertyValue::Bool(false)
        );
        assert_eq!(
            decode_value(ValueKind::Float, b"true"),
            Err(CloudError::InvalidPayload)
        );
        assert_eq!(
            decode_value(ValueKind::Float, b""),
            Err(CloudError::InvalidPayload)
        );
    }

    #[test]
    fn test_decode_rejects_overflowing_floats() {
        assert_eq!(
            decode_value(ValueKind::Float, b"1e39"),
            Err(CloudError::InvalidPayload)
        );
        assert_eq!(
            decode_value(ValueKind::Float, b"-1e39"),
            Err(CloudError::InvalidPayload)
        );
        assert_eq!(
            decode_value(ValueKind::Float, b"3.0e38").unwrap(),
            PropertyValue::Float(3.0e38)
        );
    }
}
