// Unit tests for HandleLifecycle construction and sharing
// Transition properties through the public API are in integration_tests/lifecycle.rs

use crate::config::{ActivationPolicy, ServiceConfig};
use crate::lifecycle::HandleLifecycle;
use crate::tests::FakeHandle;

/// **VALUE**: Verifies clones share one record.
///
/// **WHY THIS MATTERS**: A service hands clones to its client and server
/// paths; if a clone copied the state, the release check would see stale flags.
///
/// **BUG THIS CATCHES**: Would catch deriving `Clone` on the record instead of the `Arc`.
#[test]
fn given_cloned_lifecycle_when_source_mutated_then_clone_observes_change() {
    // GIVEN: A lifecycle and a clone
    let lifecycle = HandleLifecycle::<FakeHandle>::new();
    let clone = lifecycle.clone();

    // WHEN: Binding and activating through the source lifecycle
    lifecycle.bind(FakeHandle::connected("A")).unwrap();
    lifecycle.activate_server().unwrap();

    // THEN: The clone sees the same state
    assert!(clone.is_server_active());
    assert_eq!(clone.current_handle().unwrap().name, "A");

    // WHEN: Deactivating through the clone
    clone.deactivate_server();

    // THEN: The source lifecycle sees the release
    assert!(lifecycle.current_handle().is_none());
}

/// **VALUE**: Verifies `from_config` carries policy and port over.
///
/// **BUG THIS CATCHES**: Would catch port 0 being treated as a real port.
#[test]
fn given_config_when_from_config_then_policy_and_port_applied() {
    // GIVEN: Configs with and without a port
    let with_port = ServiceConfig {
        port: 900,
        activation_policy: ActivationPolicy::RequireHandle,
        ..ServiceConfig::default()
    };
    let without_port = ServiceConfig::default();

    // WHEN: Building lifecycles from them
    let strict = HandleLifecycle::<FakeHandle>::from_config(&with_port);
    let permissive = HandleLifecycle::<FakeHandle>::from_config(&without_port);

    // THEN: Policy and port follow the config
    assert_eq!(strict.policy(), ActivationPolicy::RequireHandle);
    assert_eq!(strict.port(), Some(900));
    assert_eq!(permissive.policy(), ActivationPolicy::Permissive);
    assert_eq!(permissive.port(), None);
}

/// **VALUE**: Verifies Debug output reports state without exposing the handle.
#[test]
fn given_lifecycle_when_debug_formatted_then_shows_snapshot() {
    // GIVEN: A bound lifecycle with client active
    let lifecycle = HandleLifecycle::<FakeHandle>::new();
    lifecycle.bind(FakeHandle::connected("A")).unwrap();
    lifecycle.activate_client().unwrap();

    // WHEN: Formatting with Debug
    let text = format!("{:?}", lifecycle);

    // THEN: Should include policy and flags
    assert!(text.contains("Permissive"), "missing policy: {text}");
    assert!(text.contains("client_active: true"), "missing flag: {text}");
    assert!(text.contains("bound: true"), "missing bound: {text}");
}

/// **VALUE**: Verifies errors carry the caller's location, not the library's.
///
/// **WHY THIS MATTERS**: Bind errors are programming errors; the location is
/// how they are found.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[track_caller]` on the path
/// from `bind` down to the record.
#[test]
fn given_invalid_bind_when_error_raised_then_location_is_test_file() {
    // GIVEN: An empty lifecycle
    let lifecycle = HandleLifecycle::<FakeHandle>::new();

    // WHEN: Binding a disconnected handle
    let err = lifecycle.bind(FakeHandle::disconnected("A")).unwrap_err();

    // THEN: The message names this file
    assert!(err.to_string().contains(file!()), "unexpected: {err}");
}
