//! Background sync
//!
//! Offline mutations live in an external queue; the gateway only replays
//! them. The queue's persistence is the host's concern (contract:
//! enqueue / pending / mark_synced). `MemoryQueue` is the in-process
//! reference implementation.

use crate::request::Method;

/// Sync tag replayed on generic background sync.
pub const SYNC_TAG: &str = "background-sync";
/// Sync tag replayed for queued inventory mutations.
pub const SYNC_TAG_INVENTORY: &str = "background-sync-inventory";
/// Periodic sync tag that refreshes the precached assets.
pub const PERIODIC_TAG_CONTENT: &str = "content-update";

/// A mutation recorded while offline, waiting to be replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOp {
    pub id: u64,
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

/// Queue of pending offline mutations.
///
/// Replay is at-least-once: an op is marked synced only after a successful
/// response, so a lost response can lead to a duplicate replay.
pub trait SyncQueue {
    fn enqueue(&mut self, op: PendingOp);

    /// All ops not yet marked synced, in enqueue order.
    fn pending(&self) -> Vec<PendingOp>;

    fn mark_synced(&mut self, id: u64);
}

/// In-memory sync queue.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    ops: Vec<PendingOp>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl SyncQueue for MemoryQueue {
    fn enqueue(&mut self, op: PendingOp) {
        self.ops.push(op);
    }

    fn pending(&self) -> Vec<PendingOp> {
        self.ops.clone()
    }

    fn mark_synced(&mut self, id: u64) {
        self.ops.retain(|op| op.id != id);
    }
}
