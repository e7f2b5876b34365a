//! The resource handle collaborator.
//!
//! A handle is owned by whoever created it. The lifecycle only keeps an
//! [`Arc`](std::sync::Arc) to it and asks two questions: is it connected, and
//! which underlying resource is it. Connecting, disconnecting and tearing the
//! handle down stay with the owner.

use std::fmt::Debug;

/// A shared connection handle (for example a bus attachment).
///
/// Implementations must answer both queries without blocking; they are called
/// while the lifecycle lock is held.
pub trait ResourceHandle: Send + Sync {
    /// Value that tells two handles apart. Equal identities mean the same
    /// underlying resource, even through different references.
    type Identity: PartialEq + Debug;

    /// Whether the handle is currently attached to its transport.
    fn is_connected(&self) -> bool;

    /// Identity of the resource behind this handle.
    fn identity(&self) -> Self::Identity;
}
