fn main() {
    // ESP-IDF build configuration, only meaningful when cross-compiling
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }

    // Credentials are baked in at compile time (see src/secrets.rs)
    for var in [
        "FLOW_WIFI_SSID",
        "FLOW_WIFI_PASS",
        "FLOW_DEVICE_KEY",
        "FLOW_DEVICE_LOGIN_NAME",
        "FLOW_MQTT_BROKER",
    ] {
        println!("cargo:rerun-if-env-changed={}", var);
    }

    println!("cargo:rerun-if-changed=build.rs");
}
