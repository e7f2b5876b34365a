// Unit tests for the loopback bus

use crate::loopback::LoopbackBus;

use service_core::ResourceHandle;

/// **VALUE**: Each loopback is its own resource.
///
/// **WHY THIS MATTERS**: The lifecycle refuses a second bus by identity; two
/// loopbacks sharing a name would slip through that check.
#[test]
fn given_two_loopbacks_when_compared_then_identities_differ() {
    // GIVEN/WHEN: Two connected loopbacks
    let first = LoopbackBus::connect();
    let second = LoopbackBus::connect();

    // THEN: Different identities, both connected
    assert_ne!(first.identity(), second.identity());
    assert!(first.is_connected() && second.is_connected());
    assert!(first.unique_name().starts_with(":loopback-"));
}

/// **VALUE**: Disconnect is observable and idempotent.
#[test]
fn given_connected_loopback_when_disconnected_twice_then_reports_disconnected() {
    // GIVEN: A connected loopback
    let bus = LoopbackBus::connect();

    // WHEN: Disconnecting twice
    bus.disconnect();
    bus.disconnect();

    // THEN: Reports not connected
    assert!(!bus.is_connected());
}
