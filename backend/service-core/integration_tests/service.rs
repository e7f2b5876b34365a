use crate::helpers::TestBus;

use service_core::{BusObjectDescription, HandleLifecycle, ServiceCommon};

use std::sync::Arc;

/// Service registering one object, started and stopped through its lifecycle.
struct NotificationService {
    lifecycle: HandleLifecycle<TestBus>,
}

impl ServiceCommon for NotificationService {
    type Handle = TestBus;

    fn lifecycle(&self) -> &HandleLifecycle<TestBus> {
        &self.lifecycle
    }

    fn bus_object_descriptions(&self) -> Vec<BusObjectDescription> {
        vec![BusObjectDescription::new(
            "/notification",
            vec![String::from("org.example.Notification")],
        )]
    }
}

/// **VALUE**: The default running-state queries track the embedded lifecycle.
///
/// **BUG THIS CATCHES**: Would catch the defaults reading the wrong flag.
#[test]
fn given_service_when_modes_toggled_then_running_state_follows() {
    // GIVEN: A service on a bound bus
    let service = NotificationService {
        lifecycle: HandleLifecycle::new(),
    };
    service.lifecycle().bind(TestBus::connected(":A.1")).unwrap();

    // WHEN: Starting only the server
    service.lifecycle().activate_server().unwrap();

    // THEN: Server running, client not
    assert!(service.is_server_running());
    assert!(!service.is_client_running());

    // WHEN: Stopping the server
    service.lifecycle().deactivate_server();

    // THEN: Neither running and the bus is released
    assert!(!service.is_server_running());
    assert!(service.lifecycle().current_handle().is_none());
}

/// **VALUE**: Descriptions are reported as given and render readably in logs.
#[test]
fn given_service_when_descriptions_listed_then_path_and_interfaces_reported() {
    // GIVEN: The notification service
    let service = NotificationService {
        lifecycle: HandleLifecycle::new(),
    };

    // WHEN: Listing its objects
    let descriptions = service.bus_object_descriptions();

    // THEN: One object with its interface
    assert_eq!(descriptions.len(), 1);
    assert_eq!(descriptions[0].path, "/notification");
    assert_eq!(
        descriptions[0].to_string(),
        "/notification [org.example.Notification]"
    );
}

/// **VALUE**: Two services can share one bus through their own lifecycles
/// without interfering with each other.
///
/// **WHY THIS MATTERS**: Per-instance state replaces process-wide state; one
/// service stopping must not release another's handle or reset its port.
#[test]
fn given_two_services_on_one_bus_when_one_stops_then_other_unaffected() {
    // GIVEN: Two services on the same bus, each advertising its own port
    let bus = TestBus::connected(":A.1");
    let first = NotificationService {
        lifecycle: HandleLifecycle::new(),
    };
    let second = NotificationService {
        lifecycle: HandleLifecycle::new(),
    };
    for (service, port) in [(&first, 10), (&second, 20)] {
        service.lifecycle().bind(Arc::clone(&bus)).unwrap();
        service.lifecycle().activate_server().unwrap();
        service.lifecycle().set_port(port);
    }

    // WHEN: The first service stops
    first.lifecycle().deactivate_server();

    // THEN: The second keeps its bus and port
    assert!(first.lifecycle().current_handle().is_none());
    assert!(second.is_server_running());
    assert!(second.lifecycle().current_handle().is_some());
    assert_eq!(first.lifecycle().port(), Some(10));
    assert_eq!(second.lifecycle().port(), Some(20));
}
