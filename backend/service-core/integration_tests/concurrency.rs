use crate::helpers::TestBus;

use service_core::{BindError, HandleLifecycle, ResourceHandle};

use std::sync::mpsc;
use std::sync::{Arc, Barrier, Mutex, OnceLock};
use std::thread;
use std::time::Duration;

/// **VALUE**: Racing client and server shutdowns always release the handle.
///
/// **WHY THIS MATTERS**: If each stop read the other flag before either wrote,
/// both would see the other still running and the handle would be stranded.
///
/// **BUG THIS CATCHES**: Would catch the flag write and the release check
/// running under separate lock acquisitions.
#[test]
fn given_both_active_when_deactivated_concurrently_then_handle_always_released() {
    for round in 0..500 {
        // GIVEN: A bound lifecycle with both modes active
        let lifecycle = HandleLifecycle::<TestBus>::new();
        lifecycle.bind(TestBus::connected(":A.1")).unwrap();
        lifecycle.activate_client().unwrap();
        lifecycle.activate_server().unwrap();

        let barrier = Arc::new(Barrier::new(2));

        // WHEN: Two threads stop one mode each at the same moment
        let client = {
            let lifecycle = lifecycle.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lifecycle.deactivate_client();
            })
        };
        let server = {
            let lifecycle = lifecycle.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                lifecycle.deactivate_server();
            })
        };
        client.join().unwrap();
        server.join().unwrap();

        // THEN: Nothing active, nothing held
        let snapshot = lifecycle.snapshot();
        assert!(!snapshot.client_active && !snapshot.server_active);
        assert!(!snapshot.bound, "round {round}: handle stranded");
    }
}

/// **VALUE**: When two different buses race to bind an empty lifecycle,
/// exactly one wins and every bind of the loser fails.
///
/// **BUG THIS CATCHES**: Would catch check-then-store on the slot being split
/// across two lock acquisitions, letting the second bus overwrite the first.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_empty_lifecycle_when_two_buses_bind_concurrently_then_one_wins() {
    // GIVEN: A fresh lifecycle and two buses
    let lifecycle = HandleLifecycle::<TestBus>::new();
    let buses = [TestBus::connected(":A.1"), TestBus::connected(":B.1")];

    // WHEN: 32 tasks bind alternating buses
    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let lifecycle = lifecycle.clone();
            let bus = Arc::clone(&buses[i % 2]);
            tokio::spawn(async move {
                let identity = bus.identity();
                (identity, lifecycle.bind(bus))
            })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }

    // THEN: Every bind of the held bus succeeded, every other was AlreadyBound
    let held = lifecycle.current_handle().unwrap();
    for (identity, result) in results {
        if identity == held.identity() {
            assert!(result.is_ok(), "{identity} should have bound");
        } else {
            assert!(
                matches!(result, Err(BindError::AlreadyBound { .. })),
                "{identity} should have been refused"
            );
        }
    }
}

/// **VALUE**: Concurrent start/stop cycles on one shared lifecycle never leave
/// a handle behind once every task has finished its stop.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn given_many_tasks_when_cycling_modes_then_final_state_released() {
    // GIVEN: A lifecycle and one bus shared by every task
    let lifecycle = HandleLifecycle::<TestBus>::new();
    let bus = TestBus::connected(":A.1");

    // WHEN: Tasks repeatedly bind, start and stop their mode
    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let lifecycle = lifecycle.clone();
            let bus = Arc::clone(&bus);
            tokio::spawn(async move {
                for _ in 0..100 {
                    lifecycle.bind(Arc::clone(&bus)).unwrap();
                    if i % 2 == 0 {
                        lifecycle.activate_client().unwrap();
                        lifecycle.deactivate_client();
                    } else {
                        lifecycle.activate_server().unwrap();
                        lifecycle.deactivate_server();
                    }
                }
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap();
    }

    // THEN: Every task ended on a stop, so nothing is active and nothing is held
    let snapshot = lifecycle.snapshot();
    assert!(!snapshot.client_active, "client left active");
    assert!(!snapshot.server_active, "server left active");
    assert!(!snapshot.bound, "handle stranded");
}

// ============================================================================
// Handles dropped by the lifecycle
// ============================================================================

/// Records, each time a bus is dropped, whether the lifecycle lock was free.
#[derive(Default)]
struct DropWatcher {
    lifecycle: OnceLock<HandleLifecycle<WatchedBus>>,
    lock_free_on_drop: Mutex<Vec<bool>>,
}

impl DropWatcher {
    fn observations(&self) -> Vec<bool> {
        self.lock_free_on_drop.lock().unwrap().clone()
    }
}

/// Bus whose `Drop` calls back into the lifecycle that held it.
struct WatchedBus {
    name: &'static str,
    watcher: Arc<DropWatcher>,
}

impl WatchedBus {
    fn connected(name: &'static str, watcher: &Arc<DropWatcher>) -> Arc<Self> {
        Arc::new(Self {
            name,
            watcher: Arc::clone(watcher),
        })
    }
}

impl ResourceHandle for WatchedBus {
    type Identity = &'static str;

    fn is_connected(&self) -> bool {
        true
    }

    fn identity(&self) -> Self::Identity {
        self.name
    }
}

impl Drop for WatchedBus {
    fn drop(&mut self) {
        let Some(lifecycle) = self.watcher.lifecycle.get() else {
            return;
        };

        // Query from another thread so a held lock shows up as a timeout
        // instead of a self-deadlock.
        let lifecycle = lifecycle.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = lifecycle.is_client_active();
            let _ = tx.send(());
        });

        let lock_free = rx.recv_timeout(Duration::from_millis(300)).is_ok();
        self.watcher.lock_free_on_drop.lock().unwrap().push(lock_free);
    }
}

/// **VALUE**: Handles the lifecycle lets go of are dropped after its lock is released.
///
/// **WHY THIS MATTERS**: A handle's `Drop` may tear down a connection or call
/// back into the service. Running it under the lock would block every other
/// lifecycle call for that long, or deadlock if it re-enters.
///
/// **BUG THIS CATCHES**: Would catch the displaced handle on rebind, the
/// refused handle on a rejected bind, or the released handle on the last
/// deactivation being dropped while the guard is alive.
#[test]
fn given_reentrant_handle_when_lifecycle_drops_it_then_lock_is_free() {
    // GIVEN: A lifecycle the buses can call back into
    let watcher = Arc::new(DropWatcher::default());
    let lifecycle = HandleLifecycle::<WatchedBus>::new();
    assert!(watcher.lifecycle.set(lifecycle.clone()).is_ok());

    // WHEN: Rebinding "A" so the lifecycle drops its previous reference
    lifecycle.bind(WatchedBus::connected("A", &watcher)).unwrap();
    lifecycle.bind(WatchedBus::connected("A", &watcher)).unwrap();

    // THEN: The displaced "A" was dropped with the lock free
    assert_eq!(watcher.observations(), vec![true]);

    // WHEN: Offering "B", which is refused and dropped by the lifecycle
    let refused = lifecycle.bind(WatchedBus::connected("B", &watcher));

    // THEN: Refused, and dropped with the lock free
    assert!(matches!(refused, Err(BindError::AlreadyBound { .. })));
    assert_eq!(watcher.observations(), vec![true, true]);

    // WHEN: Releasing "A" through the last deactivation
    lifecycle.activate_client().unwrap();
    lifecycle.deactivate_client();

    // THEN: Released "A" dropped with the lock free too
    assert_eq!(watcher.observations(), vec![true, true, true]);
}
