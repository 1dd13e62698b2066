// src/health/mod.rs
mod poller;
mod status;

pub use poller::{StatusPoller, MIN_POLL_INTERVAL};
pub use status::{CheckState, MonitoredService, ServiceSnapshot, StatusVariant};
