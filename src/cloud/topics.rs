use crate::property::PropertyId;

const SET_SUFFIX: &str = "/set";

/// MQTT topic layout for one device:
/// `<prefix>/<device>/properties/<name>` carries updates from the device,
/// `<prefix>/<device>/properties/<name>/set` carries writes from the cloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudTopics {
    base: String,
}

impl CloudTopics {
    pub fn new(prefix: &str, device: &str) -> Self {
        let prefix = prefix.trim_end_matches('/');
        Self {
            base: format!("{}/{}/properties", prefix, device),
        }
    }

    pub fn property(&self, id: PropertyId) -> String {
        format!("{}/{}", self.base, id.name())
    }

    pub fn set(&self, id: PropertyId) -> String {
        format!("{}/{}{}", self.base, id.name(), SET_SUFFIX)
    }

    /// Property addressed by an inbound `set` topic, if it is one of ours
    pub fn parse_set(&self, topic: &str) -> Option<PropertyId> {
        let name = topic
            .strip_prefix(self.base.as_str())?
            .strip_prefix('/')?
            .strip_suffix(SET_SUFFIX)?;
        PropertyId::from_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_layout() {
        let topics = CloudTopics::new("flowmeter/", "dev-1");
        assert_eq!(
            topics.property(PropertyId::FlowRate),
            "flowmeter/dev-1/properties/flowRate"
        );
        assert_eq!(
            topics.set(PropertyId::ResetTotal),
            "flowmeter/dev-1/properties/resetTotal/set"
        );
    }

    #[test]
    fn test_parse_set_topics() {
        let topics = CloudTopics::new("flowmeter", "dev-1");
        for id in PropertyId::ALL {
            assert_eq!(topics.parse_set(&topics.set(id)), Some(id));
        }
        assert_eq!(
            topics.parse_set("flowmeter/dev-1/properties/flowRate"),
            None
        );
        assert_eq!(
            topics.parse_set("flowmeter/dev-2/properties/flowRate/set"),
            None
        );
        assert_eq!(
            topics.parse_set("flowmeter/dev-1/properties/unknown/set"),
            None
        );
    }
}
