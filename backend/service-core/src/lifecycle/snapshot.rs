use serde::Serialize;

/// Point-in-time copy of the lifecycle record, read under one lock acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifecycleSnapshot {
    pub bound: bool,
    pub client_active: bool,
    pub server_active: bool,
    pub port: Option<u16>,
}
