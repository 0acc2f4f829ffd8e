//! Event dispatch
//!
//! Single entry point mapping platform events to gateway handlers. The host
//! keeps the returned future alive until it settles; each handler runs to
//! completion independently of the others.

use crate::clients::Clients;
use crate::gateway::CacheGateway;
use crate::net::Fetcher;
use crate::push::NotificationDescriptor;
use crate::request::{Request, Response};
use crate::sync::{SyncQueue, PERIODIC_TAG_CONTENT, SYNC_TAG, SYNC_TAG_INVENTORY};
use crate::WorkerError;

/// A platform event delivered to the worker.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Install,
    Activate,
    Fetch(Request),
    /// Background sync with its tag.
    Sync(String),
    /// Periodic sync with its tag.
    PeriodicSync(String),
    /// Push message with its raw payload, if any.
    Push(Option<Vec<u8>>),
    NotificationClick {
        action: String,
    },
}

/// What a dispatched event produced.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Done,
    /// Fetch result; `None` means the gateway declined to handle it.
    Response(Option<Response>),
    /// Notification to display; `None` means nothing to show.
    Notification(Option<NotificationDescriptor>),
    /// Number of queued ops replayed successfully.
    Synced(usize),
    /// Number of precached assets refreshed.
    Refreshed(usize),
}

impl<F: Fetcher> CacheGateway<F> {
    /// Route one event to its handler. Sync and push failures are absorbed
    /// and logged by the handlers; install, activate and fetch errors
    /// propagate to the host.
    pub async fn dispatch(
        &self,
        event: WorkerEvent,
        clients: &mut impl Clients,
        queue: &mut impl SyncQueue,
    ) -> Result<EventOutcome, WorkerError> {
        match event {
            WorkerEvent::Install => {
                self.install().await?;
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Activate => {
                self.activate(clients).await?;
                Ok(EventOutcome::Done)
            }
            WorkerEvent::Fetch(request) => {
                Ok(EventOutcome::Response(self.handle_fetch(&request).await?))
            }
            WorkerEvent::Sync(tag) => match tag.as_str() {
                SYNC_TAG | SYNC_TAG_INVENTORY => {
                    Ok(EventOutcome::Synced(self.replay_pending(queue).await))
                }
                other => {
                    tracing::debug!(tag = other, "ignoring unknown sync tag");
                    Ok(EventOutcome::Done)
                }
            },
            WorkerEvent::PeriodicSync(tag) => match tag.as_str() {
                PERIODIC_TAG_CONTENT => Ok(EventOutcome::Refreshed(self.refresh_static().await)),
                other => {
                    tracing::debug!(tag = other, "ignoring unknown periodic sync tag");
                    Ok(EventOutcome::Done)
                }
            },
            WorkerEvent::Push(payload) => Ok(EventOutcome::Notification(
                self.handle_push(payload.as_deref()),
            )),
            WorkerEvent::NotificationClick { action } => {
                self.handle_notification_click(&action, clients);
                Ok(EventOutcome::Done)
            }
        }
    }
}
