use crate::helpers::{BUS_COUNT, Op, TestBus, apply, op_strategy};

use service_core::{
    ActivationError, ActivationPolicy, BindError, HandleLifecycle, LifecycleSnapshot, Mode,
    ResourceHandle,
};

use std::sync::Arc;

use proptest::collection::vec;
use proptest::prelude::*;

// ============================================================================
// Bind / activate / deactivate through the public API
// ============================================================================

/// **VALUE**: Walks the full lifecycle: bind, both modes up, both down, rebind elsewhere.
///
/// **WHY THIS MATTERS**: This is the sequence a dual-mode service runs on every
/// start/stop. The handle must survive the first stop and be gone after the second.
///
/// **BUG THIS CATCHES**: Would catch releasing too early, never releasing, or
/// refusing a new bus after a clean shutdown.
#[test]
fn given_dual_mode_service_when_stopped_in_turn_then_handle_released_after_last() {
    // GIVEN: A lifecycle bound to bus "A"
    let lifecycle = HandleLifecycle::<TestBus>::new();
    let bus_a = TestBus::connected(":A.1");
    lifecycle.bind(Arc::clone(&bus_a)).unwrap();
    assert!(Arc::ptr_eq(&lifecycle.current_handle().unwrap(), &bus_a));

    // WHEN: Starting both modes
    lifecycle.activate_client().unwrap();
    lifecycle.activate_server().unwrap();

    // THEN: Both report active
    assert!(lifecycle.is_client_active());
    assert!(lifecycle.is_server_active());

    // WHEN: Stopping client
    lifecycle.deactivate_client();

    // THEN: Server still holds the handle
    assert!(lifecycle.current_handle().is_some());

    // WHEN: Stopping server
    lifecycle.deactivate_server();

    // THEN: Handle released
    assert!(lifecycle.current_handle().is_none());

    // WHEN: Binding a different bus afterwards
    let result = lifecycle.bind(TestBus::connected(":B.1"));

    // THEN: Slot was empty so it succeeds
    assert!(result.is_ok());
    assert_eq!(lifecycle.current_handle().unwrap().identity(), ":B.1");
}

/// **VALUE**: A server running on bus "A" cannot be moved to bus "B" by a bind.
///
/// **WHY THIS MATTERS**: Swapping the bus under a running server would leave
/// its registered objects on a bus nobody is tracking.
///
/// **BUG THIS CATCHES**: Would catch identity being ignored on rebind.
#[test]
fn given_server_active_on_bus_a_when_bind_bus_b_then_already_bound_and_a_kept() {
    // GIVEN: Bus "A" bound and server active
    let lifecycle = HandleLifecycle::<TestBus>::new();
    let bus_a = TestBus::connected(":A.1");
    lifecycle.bind(Arc::clone(&bus_a)).unwrap();
    lifecycle.activate_server().unwrap();

    // WHEN: Binding bus "B" while client is inactive
    let result = lifecycle.bind(TestBus::connected(":B.1"));

    // THEN: AlreadyBound, still on "A"
    assert!(matches!(result, Err(BindError::AlreadyBound { .. })));
    assert!(Arc::ptr_eq(&lifecycle.current_handle().unwrap(), &bus_a));
    assert!(lifecycle.is_server_active());
    assert!(!lifecycle.is_client_active());
}

/// **VALUE**: Binding the same bus twice is a success both times.
#[test]
fn given_bound_bus_when_bound_again_then_ok_and_same_handle() {
    // GIVEN: Bus "A" bound
    let lifecycle = HandleLifecycle::<TestBus>::new();
    let bus_a = TestBus::connected(":A.1");
    lifecycle.bind(Arc::clone(&bus_a)).unwrap();

    // WHEN: Binding it again
    let result = lifecycle.bind(Arc::clone(&bus_a));

    // THEN: Ok, still "A"
    assert!(result.is_ok());
    assert!(Arc::ptr_eq(&lifecycle.current_handle().unwrap(), &bus_a));
}

/// **VALUE**: Client alone up then down releases the handle; server never involved.
#[test]
fn given_only_client_used_when_client_deactivated_then_handle_released() {
    // GIVEN: Bus bound, client active, server untouched
    let lifecycle = HandleLifecycle::<TestBus>::new();
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();
    lifecycle.activate_client().unwrap();

    // WHEN: Deactivating client
    lifecycle.deactivate_client();

    // THEN: Released
    assert!(lifecycle.current_handle().is_none());
    assert!(!lifecycle.is_server_active());
}

/// **VALUE**: Stopping one mode leaves the other's flag and the handle alone.
#[test]
fn given_both_active_when_client_deactivated_then_server_keeps_handle() {
    // GIVEN: Bus bound, both modes active
    let lifecycle = HandleLifecycle::<TestBus>::new();
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();
    lifecycle.activate_client().unwrap();
    lifecycle.activate_server().unwrap();

    // WHEN: Deactivating client
    lifecycle.deactivate_client();

    // THEN: Server still active, handle still bound
    assert!(lifecycle.is_server_active());
    assert!(!lifecycle.is_client_active());
    assert!(lifecycle.current_handle().is_some());
}

/// **VALUE**: Invalid binds change nothing, whatever state they hit.
///
/// **BUG THIS CATCHES**: Would catch a rejected bind clearing the slot or
/// touching a flag.
#[test]
fn given_any_state_when_bind_invalid_then_state_unchanged() {
    // GIVEN: A lifecycle with bus "A" and client active
    let lifecycle = HandleLifecycle::<TestBus>::new();
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();
    lifecycle.activate_client().unwrap();
    let before = lifecycle.snapshot();

    // WHEN: Binding nothing, and a bus that dropped its connection
    let dropped = TestBus::connected(":A.1");
    dropped.disconnect();
    let absent = lifecycle.bind(None::<Arc<TestBus>>);
    let disconnected = lifecycle.bind(dropped);

    // THEN: Both InvalidHandle, state as before
    assert!(matches!(absent, Err(BindError::InvalidHandle { .. })));
    assert!(matches!(disconnected, Err(BindError::InvalidHandle { .. })));
    assert_eq!(lifecycle.snapshot(), before);
    assert_eq!(lifecycle.current_handle().unwrap().identity(), ":A.1");
}

/// **VALUE**: Invalid binds on an empty lifecycle leave it empty.
#[test]
fn given_empty_lifecycle_when_bind_invalid_then_still_empty() {
    // GIVEN: A fresh lifecycle
    let lifecycle = HandleLifecycle::<TestBus>::new();
    let dropped = TestBus::connected(":A.1");
    dropped.disconnect();

    // WHEN: Binding a disconnected bus
    let result = lifecycle.bind(dropped);

    // THEN: InvalidHandle and nothing recorded
    assert!(matches!(result, Err(BindError::InvalidHandle { .. })));
    assert_eq!(
        lifecycle.snapshot(),
        LifecycleSnapshot {
            bound: false,
            client_active: false,
            server_active: false,
            port: None,
        }
    );
}

/// **VALUE**: Repeated deactivation is harmless and re-runs the release check.
#[test]
fn given_inactive_mode_when_deactivated_again_then_no_op_and_still_released() {
    // GIVEN: A lifecycle that was bound then fully stopped
    let lifecycle = HandleLifecycle::<TestBus>::new();
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();
    lifecycle.activate_server().unwrap();
    lifecycle.deactivate_server();

    // WHEN: Deactivating both modes again
    lifecycle.deactivate_server();
    lifecycle.deactivate_client();

    // THEN: Still empty, still inactive
    assert!(lifecycle.current_handle().is_none());
    assert!(!lifecycle.is_server_active());
    assert!(!lifecycle.is_client_active());
}

/// **VALUE**: Deactivating an untouched mode on a bound, idle lifecycle releases the handle.
///
/// **WHY THIS MATTERS**: A stop call is the release point even if the matching
/// start never ran.
#[test]
fn given_bound_idle_lifecycle_when_any_mode_deactivated_then_released() {
    // GIVEN: Bound, no mode active
    let lifecycle = HandleLifecycle::<TestBus>::new();
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();

    // WHEN: Deactivating client
    lifecycle.deactivate_client();

    // THEN: Released
    assert!(lifecycle.current_handle().is_none());
}

/// **VALUE**: Modes can be marked active before any bus is bound.
///
/// **WHY THIS MATTERS**: Services may flip their running flag before the bus
/// is handed over; the default policy must not reject that.
#[test]
fn given_permissive_policy_when_activated_unbound_then_ok() {
    // GIVEN: A fresh permissive lifecycle
    let lifecycle = HandleLifecycle::<TestBus>::new();

    // WHEN: Activating both modes
    let client = lifecycle.activate_client();
    let server = lifecycle.activate_server();

    // THEN: Both succeed without a handle
    assert!(client.is_ok() && server.is_ok());
    assert!(lifecycle.is_client_active() && lifecycle.is_server_active());
    assert!(lifecycle.current_handle().is_none());
}

/// **VALUE**: The strict policy refuses unbound activation and accepts it once bound.
#[test]
fn given_require_handle_policy_when_activated_then_needs_bound_handle() {
    // GIVEN: A strict lifecycle
    let lifecycle = HandleLifecycle::<TestBus>::with_policy(ActivationPolicy::RequireHandle);

    // WHEN: Activating client before binding
    let unbound = lifecycle.activate_client();

    // THEN: NotBound, flag untouched
    assert!(matches!(unbound, Err(ActivationError::NotBound { .. })));
    assert!(!lifecycle.is_client_active());

    // WHEN: Binding, then activating
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();
    let bound = lifecycle.activate_client();

    // THEN: Ok
    assert!(bound.is_ok());
    assert!(lifecycle.is_client_active());
}

/// **VALUE**: The advertised port is independent of the handle lifecycle.
#[test]
fn given_port_set_when_handle_released_then_port_remains() {
    // GIVEN: A bound, server-active lifecycle advertising a port
    let lifecycle = HandleLifecycle::<TestBus>::new();
    lifecycle.bind(TestBus::connected(":A.1")).unwrap();
    lifecycle.activate_server().unwrap();
    lifecycle.set_port(1080);

    // WHEN: Stopping the server
    lifecycle.deactivate(Mode::Server);

    // THEN: Port still reported
    assert_eq!(lifecycle.port(), Some(1080));
    assert!(lifecycle.current_handle().is_none());
}

// ============================================================================
// Sequence properties
// ============================================================================

proptest! {
    /// **VALUE**: For any sequence of calls, no deactivation leaves a handle
    /// behind with both modes off, and a held handle is never swapped for
    /// another identity.
    ///
    /// **BUG THIS CATCHES**: Would catch any ordering of calls that strands a
    /// handle or lets a different bus slip in while one is held. Failing
    /// sequences are shrunk to the shortest reproduction.
    #[test]
    fn given_any_call_sequence_when_applied_then_release_and_identity_hold(
        sequence in vec(op_strategy(), 0..200)
    ) {
        // GIVEN: Distinct buses and a fresh lifecycle
        let buses: Vec<_> = (0..BUS_COUNT)
            .map(|i| TestBus::connected(&format!(":{i}.1")))
            .collect();
        let lifecycle = HandleLifecycle::<TestBus>::new();

        for op in sequence {
            let held_before = lifecycle.current_handle().map(|h| h.identity());

            // WHEN: Applying each call
            apply(&lifecycle, &buses, op);

            let snapshot = lifecycle.snapshot();
            let held_after = lifecycle.current_handle().map(|h| h.identity());

            // THEN: Deactivation leaving both modes off always releases
            if let Op::Deactivate(_) = op {
                if !snapshot.client_active && !snapshot.server_active {
                    prop_assert!(!snapshot.bound, "handle stranded after {:?}", op);
                }
            }

            // THEN: A held identity only changes by being released first
            if let (Some(before), Some(after)) = (&held_before, &held_after) {
                prop_assert_eq!(before, after, "identity swapped by {:?}", op);
            }
        }
    }
}
