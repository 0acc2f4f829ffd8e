//! OWL Worker
//!
//! Service-worker-style cache gateway: install/activate lifecycle, fetch
//! interception with cache-first and network-first policies, push
//! notification dispatch and background sync over `owl-cache` partitions.

pub mod clients;
pub mod config;
pub mod events;
mod gateway;
pub mod lifecycle;
pub mod net;
pub mod push;
pub mod request;
pub mod strategy;
pub mod sync;

pub use clients::{ClientList, Clients, WindowClient};
pub use config::{NotificationDefaults, WorkerConfig};
pub use events::{EventOutcome, WorkerEvent};
pub use gateway::CacheGateway;
pub use lifecycle::WorkerState;
pub use net::{Fetcher, HttpFetcher, NetError};
pub use push::{NotificationAction, NotificationDescriptor, PushPayload};
pub use request::{Method, Request, RequestMode, Response, ResponseKind};
pub use strategy::FetchStrategy;
pub use sync::{MemoryQueue, PendingOp, SyncQueue};

use owl_cache::CacheError;

/// Worker error
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("install failed: {0}")]
    InstallFailed(String),

    #[error("invalid worker state: expected {expected}, got {actual}")]
    InvalidState {
        expected: &'static str,
        actual: WorkerState,
    },

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
