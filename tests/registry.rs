use esp32_flow_cloud::{
    init_properties, ChangeHooks, CloudCredentials, CloudError, CloudResult, CloudSync,
    FlowTelemetry, Permission, PropertyId, PropertyTable, UpdatePolicy,
};

/// Records every setup call it receives.
#[derive(Default)]
struct RecordingCloud {
    setups: Vec<(CloudCredentials, PropertyTable)>,
    fail_setup: bool,
}

impl CloudSync for RecordingCloud {
    fn setup(&mut self, credentials: &CloudCredentials, table: PropertyTable) -> CloudResult<()> {
        if self.fail_setup {
            return Err(CloudError::Transport);
        }
        self.setups.push((credentials.clone(), table));
        Ok(())
    }

    fn update(&mut self, _state: &mut FlowTelemetry) -> CloudResult<()> {
        Ok(())
    }
}

fn credentials() -> CloudCredentials {
    CloudCredentials::new("myssid", "mypass", "dev-key").unwrap()
}

fn summary(table: &PropertyTable) -> Vec<(&'static str, Permission, UpdatePolicy, bool)> {
    table
        .iter()
        .map(|p| (p.name(), p.permission, p.policy, p.on_change.is_some()))
        .collect()
}

fn mark_liters_per_pulse(state: &mut FlowTelemetry) {
    state.flow_rate = 1.0;
}

fn mark_reset_total(state: &mut FlowTelemetry) {
    state.flow_rate = 2.0;
}

#[test]
fn test_calibration_is_seeded_to_default() {
    let mut cloud = RecordingCloud::default();
    let mut state = FlowTelemetry {
        liters_per_pulse: 0.0,
        ..FlowTelemetry::default()
    };

    init_properties(&mut cloud, &mut state, &credentials(), ChangeHooks::default()).unwrap();

    assert_eq!(state.liters_per_pulse, 100.0);
}

#[test]
fn test_registers_five_properties_in_one_setup_call() {
    let mut cloud = RecordingCloud::default();
    let mut state = FlowTelemetry::new();

    init_properties(&mut cloud, &mut state, &credentials(), ChangeHooks::default()).unwrap();

    assert_eq!(cloud.setups.len(), 1);
    let (_, table) = &cloud.setups[0];
    assert_eq!(
        summary(table),
        vec![
            ("flowRate", Permission::Read, UpdatePolicy::every_secs(1), false),
            ("flowRateM3H", Permission::Read, UpdatePolicy::every_secs(5), false),
            ("litersPerPulse", Permission::ReadWrite, UpdatePolicy::OnChange, true),
            ("totalLiters", Permission::Read, UpdatePolicy::OnChange, false),
            ("resetTotal", Permission::ReadWrite, UpdatePolicy::OnChange, true),
        ]
    );
}

#[test]
fn test_hooks_are_bound_to_their_own_properties() {
    let mut cloud = RecordingCloud::default();
    let mut state = FlowTelemetry::new();
    let hooks = ChangeHooks {
        liters_per_pulse: mark_liters_per_pulse,
        reset_total: mark_reset_total,
    };

    init_properties(&mut cloud, &mut state, &credentials(), hooks).unwrap();

    let (_, table) = &cloud.setups[0];
    for property in table {
        let mut probe = FlowTelemetry::new();
        match (property.id, property.on_change) {
            (PropertyId::LitersPerPulse, Some(hook)) => {
                hook(&mut probe);
                assert_eq!(probe.flow_rate, 1.0);
            }
            (PropertyId::ResetTotal, Some(hook)) => {
                hook(&mut probe);
                assert_eq!(probe.flow_rate, 2.0);
            }
            (id, hook) => assert!(hook.is_none(), "unexpected hook on {}", id),
        }
    }
}

#[test]
fn test_second_init_registers_identical_table() {
    let mut cloud = RecordingCloud::default();
    let mut state = FlowTelemetry::new();

    init_properties(&mut cloud, &mut state, &credentials(), ChangeHooks::default()).unwrap();
    state.liters_per_pulse = 7.0;
    init_properties(&mut cloud, &mut state, &credentials(), ChangeHooks::default()).unwrap();

    assert_eq!(cloud.setups.len(), 2);
    assert_eq!(summary(&cloud.setups[0].1), summary(&cloud.setups[1].1));
    assert_eq!(cloud.setups[0].0, cloud.setups[1].0);
    assert_eq!(state.liters_per_pulse, 100.0);
}

#[test]
fn test_credentials_reach_setup_unmodified() {
    let mut cloud = RecordingCloud::default();
    let mut state = FlowTelemetry::new();

    init_properties(&mut cloud, &mut state, &credentials(), ChangeHooks::default()).unwrap();

    let (creds, _) = &cloud.setups[0];
    assert_eq!(creds.wifi.ssid.as_str(), "myssid");
    assert_eq!(creds.wifi.password.as_str(), "mypass");
    assert_eq!(creds.device.secret_key.as_str(), "dev-key");
}

#[test]
fn test_setup_failure_is_propagated() {
    let mut cloud = RecordingCloud {
        fail_setup: true,
        ..Default::default()
    };
    let mut state = FlowTelemetry::new();

    let err = init_properties(&mut cloud, &mut state, &credentials(), ChangeHooks::default())
        .unwrap_err();
    assert_eq!(err, CloudError::Transport);
    assert!(cloud.setups.is_empty());
}
