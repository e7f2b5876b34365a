//! Test helpers for lifecycle integration tests.
//!
//! - [`TestBus`]: a handle whose connection can be toggled from the test
//! - [`op_strategy`]: lifecycle calls for sequence properties

use service_core::{HandleLifecycle, Mode, ResourceHandle};

use proptest::prelude::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Bus stand-in identified by its unique name.
#[derive(Debug)]
pub struct TestBus {
    unique_name: String,
    connected: AtomicBool,
}

impl TestBus {
    pub fn connected(unique_name: &str) -> Arc<Self> {
        Arc::new(Self {
            unique_name: unique_name.to_string(),
            connected: AtomicBool::new(true),
        })
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

impl ResourceHandle for TestBus {
    type Identity = String;

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn identity(&self) -> Self::Identity {
        self.unique_name.clone()
    }
}

/// One step of a generated lifecycle sequence.
#[derive(Debug, Clone, Copy)]
pub enum Op {
    Bind(usize),
    Activate(Mode),
    Deactivate(Mode),
}

/// Number of distinct buses `Op::Bind` indexes into.
pub const BUS_COUNT: usize = 3;

pub fn mode_strategy() -> impl Strategy<Value = Mode> {
    prop_oneof![Just(Mode::Client), Just(Mode::Server)]
}

/// Any single lifecycle call over [`BUS_COUNT`] buses.
pub fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..BUS_COUNT).prop_map(Op::Bind),
        mode_strategy().prop_map(Op::Activate),
        mode_strategy().prop_map(Op::Deactivate),
    ]
}

/// Apply `op`, ignoring bind rejections (they are asserted elsewhere).
pub fn apply(lifecycle: &HandleLifecycle<TestBus>, buses: &[Arc<TestBus>], op: Op) {
    match op {
        Op::Bind(index) => {
            let _ = lifecycle.bind(Arc::clone(&buses[index]));
        }
        Op::Activate(mode) => {
            let _ = lifecycle.activate(mode);
        }
        Op::Deactivate(mode) => lifecycle.deactivate(mode),
    }
}
