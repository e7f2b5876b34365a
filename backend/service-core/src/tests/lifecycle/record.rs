// Unit tests for the unsynchronized lifecycle record
// Locking and logging are covered in manager.rs and integration_tests/

use crate::config::ActivationPolicy;
use crate::error::{ActivationError, BindError};
use crate::lifecycle::Mode;
use crate::lifecycle::record::{BindOutcome, LifecycleRecord};
use crate::tests::FakeHandle;

use std::sync::Arc;

/// **VALUE**: Verifies the first bind fills an empty slot.
///
/// **BUG THIS CATCHES**: Would catch the slot check being inverted.
#[test]
fn given_empty_record_when_bind_connected_then_bound() {
    // GIVEN: An empty record
    let mut record = LifecycleRecord::new(None);
    let handle = FakeHandle::connected("A");

    // WHEN: Binding a connected handle
    let attempt = record.bind(Some(Arc::clone(&handle)));

    // THEN: Should report a fresh bind of "A", let go of nothing, hold the same reference
    assert_eq!(attempt.result.unwrap(), BindOutcome::Bound("A"));
    assert!(attempt.leftover.is_none());
    assert!(Arc::ptr_eq(&record.handle().unwrap(), &handle));
}

/// **VALUE**: Verifies a same-identity rebind swaps in the new reference.
///
/// **WHY THIS MATTERS**: Client and server paths may hold distinct references
/// to the same bus; the second one to bind must not fail.
///
/// **BUG THIS CATCHES**: Would catch comparing references instead of identities.
#[test]
fn given_bound_record_when_bind_same_identity_then_rebound_with_new_reference() {
    // GIVEN: A record bound to "A"
    let mut record = LifecycleRecord::new(None);
    let first = FakeHandle::connected("A");
    record.bind(Some(Arc::clone(&first)));
    let second = FakeHandle::connected("A");

    // WHEN: Binding another reference with identity "A"
    let attempt = record.bind(Some(Arc::clone(&second)));

    // THEN: Should succeed as a rebind, keep the newer reference, hand back the older
    assert_eq!(attempt.result.unwrap(), BindOutcome::Rebound("A"));
    assert!(Arc::ptr_eq(&attempt.leftover.unwrap(), &first));
    assert!(Arc::ptr_eq(&record.handle().unwrap(), &second));
}

/// **VALUE**: Verifies a different identity is refused and the held one kept.
///
/// **BUG THIS CATCHES**: Would catch a silent replacement of an in-use handle.
#[test]
fn given_bound_record_when_bind_other_identity_then_already_bound() {
    // GIVEN: A record bound to "A"
    let mut record = LifecycleRecord::new(None);
    let first = FakeHandle::connected("A");
    record.bind(Some(Arc::clone(&first)));
    let offered = FakeHandle::connected("B");

    // WHEN: Binding "B"
    let attempt = record.bind(Some(Arc::clone(&offered)));

    // THEN: Should fail, keep "A", and hand "B" back to the caller
    assert!(matches!(attempt.result, Err(BindError::AlreadyBound { .. })));
    assert!(Arc::ptr_eq(&attempt.leftover.unwrap(), &offered));
    assert!(Arc::ptr_eq(&record.handle().unwrap(), &first));
}

/// **VALUE**: Verifies absent and disconnected handles are rejected before
/// any state change.
///
/// **BUG THIS CATCHES**: Would catch storing a dead handle, or checking
/// connection after the slot is written.
#[test]
fn given_empty_record_when_bind_absent_or_disconnected_then_invalid_handle() {
    // GIVEN: An empty record
    let mut record = LifecycleRecord::<FakeHandle>::new(None);

    // WHEN: Binding nothing, then a disconnected handle
    let absent = record.bind(None);
    let disconnected = record.bind(Some(FakeHandle::disconnected("A")));

    // THEN: Both should fail, the disconnected one is handed back, the slot stays empty
    assert!(matches!(absent.result, Err(BindError::InvalidHandle { .. })));
    assert!(absent.leftover.is_none());
    assert!(matches!(disconnected.result, Err(BindError::InvalidHandle { .. })));
    assert_eq!(disconnected.leftover.unwrap().name, "A");
    assert!(record.handle().is_none());
}

/// **VALUE**: Verifies a disconnected handle is reported as invalid even when
/// another handle is already held.
///
/// **BUG THIS CATCHES**: Would catch the identity check running before the
/// connection check and reporting `AlreadyBound` instead.
#[test]
fn given_bound_record_when_bind_disconnected_other_then_invalid_handle() {
    // GIVEN: A record bound to "A"
    let mut record = LifecycleRecord::new(None);
    record.bind(Some(FakeHandle::connected("A")));

    // WHEN: Binding a disconnected "B"
    let attempt = record.bind(Some(FakeHandle::disconnected("B")));

    // THEN: Should fail as InvalidHandle
    assert!(matches!(attempt.result, Err(BindError::InvalidHandle { .. })));
}

/// **VALUE**: Verifies deactivating the only active mode hands back the handle.
#[test]
fn given_only_client_active_when_deactivate_client_then_handle_released() {
    // GIVEN: A bound record with only client active
    let mut record = LifecycleRecord::new(None);
    let handle = FakeHandle::connected("A");
    record.bind(Some(Arc::clone(&handle)));
    record.activate(Mode::Client, ActivationPolicy::Permissive).unwrap();

    // WHEN: Deactivating client
    let released = record.deactivate(Mode::Client);

    // THEN: The released handle is the bound one and the slot is empty
    assert!(Arc::ptr_eq(&released.unwrap(), &handle));
    assert!(record.handle().is_none());
}

/// **VALUE**: Verifies the handle survives while the other mode is still active.
///
/// **BUG THIS CATCHES**: Would catch releasing on any deactivation.
#[test]
fn given_both_active_when_deactivate_server_then_handle_kept() {
    // GIVEN: A bound record with both modes active
    let mut record = LifecycleRecord::new(None);
    record.bind(Some(FakeHandle::connected("A")));
    record.activate(Mode::Client, ActivationPolicy::Permissive).unwrap();
    record.activate(Mode::Server, ActivationPolicy::Permissive).unwrap();

    // WHEN: Deactivating server
    let released = record.deactivate(Mode::Server);

    // THEN: Nothing released, client still active
    assert!(released.is_none());
    assert!(record.handle().is_some());
    assert!(record.is_active(Mode::Client));
    assert!(!record.is_active(Mode::Server));
}

/// **VALUE**: Verifies `RequireHandle` refuses activation on an empty slot and
/// leaves the flag clear.
#[test]
fn given_require_handle_policy_and_empty_record_when_activate_then_not_bound() {
    // GIVEN: An empty record
    let mut record = LifecycleRecord::<FakeHandle>::new(None);

    // WHEN: Activating server under RequireHandle
    let result = record.activate(Mode::Server, ActivationPolicy::RequireHandle);

    // THEN: Should fail and leave server inactive
    assert!(matches!(result, Err(ActivationError::NotBound { .. })));
    assert!(!record.is_active(Mode::Server));
}

/// **VALUE**: Verifies the advertised port is untouched by handle release.
///
/// **WHY THIS MATTERS**: The port belongs to the service, not to the handle.
#[test]
fn given_port_set_when_last_mode_deactivated_then_port_kept() {
    // GIVEN: A bound, client-active record advertising port 42
    let mut record = LifecycleRecord::new(Some(42));
    record.bind(Some(FakeHandle::connected("A")));
    record.activate(Mode::Client, ActivationPolicy::Permissive).unwrap();

    // WHEN: Deactivating client
    record.deactivate(Mode::Client);

    // THEN: Handle gone, port still there
    let snapshot = record.snapshot();
    assert!(!snapshot.bound);
    assert_eq!(snapshot.port, Some(42));
}
