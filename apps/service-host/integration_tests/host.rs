use service_host::error::HostError;
use service_host::host::{HostedService, SERVICE_OBJECT_PATH, load_config, run};
use service_host::loopback::LoopbackBus;

use service_core::{ActivationPolicy, BindError, CoreError, ServiceCommon, ServiceConfig};

use std::sync::Arc;

// ============================================================================
// Integration tests for the host + service-core lifecycle
// ============================================================================

/// **VALUE**: A full host run with a saved config binds, runs both modes and
/// releases the bus.
///
/// **BUG THIS CATCHES**: Would catch config not reaching the lifecycle, or the
/// host reporting success while the bus is still held.
#[test]
fn given_saved_config_when_run_then_report_shows_release_and_port() {
    // GIVEN: A config file advertising port 1080
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("service.json"), r#"{ "port": 1080 }"#).unwrap();

    // WHEN: Loading it and running the host
    let config = load_config(dir.path()).unwrap();
    let report = run(&config).unwrap();

    // THEN: Both modes were running on a bound bus, then everything stopped
    assert!(report.running.bound);
    assert!(report.running.client_active && report.running.server_active);
    assert!(!report.stopped.bound);
    assert!(!report.stopped.client_active && !report.stopped.server_active);
    assert_eq!(report.stopped.port, Some(1080));
    assert_eq!(report.objects[0].path, SERVICE_OBJECT_PATH);
}

/// **VALUE**: A corrupt config stops the host with a Config error.
#[test]
fn given_corrupt_config_when_loaded_then_config_error() {
    // GIVEN: A config file that is not JSON
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("service.json"), "{").unwrap();

    // WHEN: Loading it
    let result = load_config(dir.path());

    // THEN: Config error
    assert!(matches!(result, Err(HostError::Config { .. })));
}

/// **VALUE**: Starting the second mode on a different bus is refused and the
/// first bus stays in use.
#[test]
fn given_server_on_one_bus_when_client_started_on_another_then_lifecycle_error() {
    // GIVEN: Server running on bus A
    let service = HostedService::new(&ServiceConfig::default());
    let bus_a = LoopbackBus::connect();
    service.start_server(Arc::clone(&bus_a)).unwrap();

    // WHEN: Starting the client on bus B
    let result = service.start_client(LoopbackBus::connect());

    // THEN: Refused, client not running, still on A
    assert!(matches!(
        result,
        Err(CoreError::Bind(BindError::AlreadyBound { .. }))
    ));
    assert!(!service.is_client_running());
    assert!(Arc::ptr_eq(
        &service.lifecycle().current_handle().unwrap(),
        &bus_a
    ));
}

/// **VALUE**: With the strict policy, a disconnected bus fails at bind and
/// nothing gets marked running.
#[test]
fn given_strict_policy_and_disconnected_bus_when_server_started_then_not_running() {
    // GIVEN: A strict service and a bus that already went away
    let service = HostedService::new(&ServiceConfig {
        activation_policy: ActivationPolicy::RequireHandle,
        ..ServiceConfig::default()
    });
    let bus = LoopbackBus::connect();
    bus.disconnect();

    // WHEN: Starting the server
    let result = service.start_server(bus);

    // THEN: Bind refused, server not running
    assert!(matches!(
        result,
        Err(CoreError::Bind(BindError::InvalidHandle { .. }))
    ));
    assert!(!service.is_server_running());
}

/// **VALUE**: Library errors land in the matching host variant.
///
/// **BUG THIS CATCHES**: Would catch a bind refusal being reported as a
/// config problem, or the reverse.
#[test]
fn given_core_errors_when_converted_then_mapped_to_host_variants() {
    // GIVEN: A refused bind and a config error
    let service = HostedService::new(&ServiceConfig::default());
    let bus = LoopbackBus::connect();
    bus.disconnect();
    let bind = service.start_client(bus).unwrap_err();

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("service.json"), r#"{ "version": 9 }"#).unwrap();
    let config = ServiceConfig::load(dir.path()).unwrap_err();

    // WHEN: Converting into HostError
    let bind = HostError::from(bind);
    let config = HostError::from(CoreError::from(config));

    // THEN: Lifecycle and Config respectively
    assert!(matches!(bind, HostError::Lifecycle { .. }));
    assert!(matches!(config, HostError::Config { .. }));
}
