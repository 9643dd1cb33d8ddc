// Main loop period between cloud update() calls [ms]
pub const SYNC_POLL_INTERVAL_MS: u32 = 100;

// MQTT session keep-alive [sec]
pub const MQTT_KEEP_ALIVE_SECS: u64 = 30;

// Delay before the MQTT client retries a dropped broker connection [sec]
pub const MQTT_RECONNECT_SECS: u64 = 5;

// Capacity of the cloud property table
pub const MAX_PROPERTIES: usize = 8;
