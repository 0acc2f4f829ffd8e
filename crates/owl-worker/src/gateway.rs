//! Cache gateway
//!
//! The request-interception layer between the page and the network: precache
//! at install, stale-generation pruning at activate, policy-driven fetch
//! handling with offline fallbacks, plus the push, notification and sync
//! handlers.

use std::sync::{Mutex, MutexGuard};

use owl_cache::{CacheGeneration, CacheKey, CacheStorage};

use crate::clients::Clients;
use crate::config::WorkerConfig;
use crate::lifecycle::WorkerState;
use crate::net::{Fetcher, NetError};
use crate::push::{is_view_action, NotificationDescriptor, PushPayload};
use crate::request::{same_origin, Request, RequestMode, Response, ResponseKind};
use crate::strategy::{is_api_request, should_intercept, strategy_for, FetchStrategy};
use crate::sync::SyncQueue;
use crate::WorkerError;

/// The offline gateway. One instance per worker registration; handlers may
/// run concurrently, so mutable state sits behind mutexes. Cache writes for
/// the same key are last-write-wins.
pub struct CacheGateway<F: Fetcher> {
    config: WorkerConfig,
    generation: CacheGeneration,
    state: Mutex<WorkerState>,
    storage: Mutex<CacheStorage>,
    fetcher: F,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<F: Fetcher> CacheGateway<F> {
    pub fn new(config: WorkerConfig, fetcher: F) -> Self {
        let generation = config.generation();
        Self {
            config,
            generation,
            state: Mutex::new(WorkerState::Parsed),
            storage: Mutex::new(CacheStorage::new()),
            fetcher,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> WorkerState {
        *lock(&self.state)
    }

    fn set_state(&self, next: WorkerState) {
        *lock(&self.state) = next;
    }

    /// Direct access to the cache partitions. The guard must not be held
    /// across an await.
    pub fn storage(&self) -> MutexGuard<'_, CacheStorage> {
        lock(&self.storage)
    }

    /// Install: precache the manifest. All-or-nothing — nothing is written
    /// unless every asset fetched with status 200.
    pub async fn install(&self) -> Result<(), WorkerError> {
        let state = self.state();
        if !matches!(state, WorkerState::Parsed | WorkerState::Installing) {
            return Err(WorkerError::InvalidState {
                expected: "parsed",
                actual: state,
            });
        }
        self.set_state(WorkerState::Installing);
        tracing::info!(version = %self.generation.tag(), "worker installing");

        let mut fetched = Vec::new();
        for path in &self.config.precache_manifest {
            let url = self
                .config
                .absolute(path)
                .map_err(|e| WorkerError::InstallFailed(format!("{path}: {e}")))?;
            let request = Request::get(url.as_str());

            let response = self.fetcher.fetch(&request).await.map_err(|e| {
                tracing::error!(%path, error = %e, "precache fetch failed, install aborted");
                WorkerError::InstallFailed(format!("{path}: {e}"))
            })?;
            if response.status != 200 {
                tracing::error!(%path, status = response.status, "precache fetch failed, install aborted");
                return Err(WorkerError::InstallFailed(format!(
                    "{path}: status {}",
                    response.status
                )));
            }

            fetched.push((CacheKey::get(url.as_str()), response.to_stored()));
        }

        {
            let mut storage = self.storage();
            let cache = storage.open(&self.generation.static_name());
            for (key, stored) in fetched {
                cache.put(key, stored);
            }
        }

        self.set_state(WorkerState::Installed);
        tracing::info!(
            assets = self.config.precache_manifest.len(),
            "static assets cached, skipping waiting"
        );
        Ok(())
    }

    /// Activate: delete every partition outside the current generation's
    /// allow-list, then take control of open clients. Returns the deleted
    /// partition names.
    pub async fn activate(&self, clients: &mut impl Clients) -> Result<Vec<String>, WorkerError> {
        let state = self.state();
        if state != WorkerState::Installed {
            return Err(WorkerError::InvalidState {
                expected: "installed",
                actual: state,
            });
        }
        self.set_state(WorkerState::Activating);
        tracing::info!("worker activating");

        let deleted = {
            let mut storage = self.storage();
            let deleted = self.generation.prune(&mut storage);
            // The current precache must have survived the cleanup.
            storage.partition(&self.generation.static_name())?;
            deleted
        };

        clients.claim();
        self.set_state(WorkerState::Activated);
        tracing::info!(deleted = deleted.len(), "worker activated, clients claimed");
        Ok(deleted)
    }

    /// Fetch interception. `Ok(None)` means the gateway declined and the
    /// host should perform its default fetch.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Option<Response>, WorkerError> {
        if !self.state().can_intercept() {
            return Ok(None);
        }
        if !should_intercept(&self.config, request) {
            return Ok(None);
        }

        let response = match strategy_for(&self.config, request) {
            FetchStrategy::CacheFirst => self.cache_first(request).await?,
            FetchStrategy::NetworkFirst => self.network_first(request).await?,
        };
        Ok(Some(response))
    }

    async fn cache_first(&self, request: &Request) -> Result<Response, WorkerError> {
        let key = CacheKey::new(request.method.as_str(), &request.url);

        let cached = self.storage().match_key(&key).cloned();
        if let Some(stored) = cached {
            tracing::debug!(url = %request.url, "serving from cache");
            return Ok(Response::from_stored(&stored));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_dynamic(&key, request, &response);
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "network request failed, serving fallback");
                self.offline_fallback(request, err)
            }
        }
    }

    async fn network_first(&self, request: &Request) -> Result<Response, WorkerError> {
        let key = CacheKey::new(request.method.as_str(), &request.url);

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store_dynamic(&key, request, &response);
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "network request failed, trying cache");
                let cached = self.storage().match_key(&key).cloned();
                match cached {
                    Some(stored) => Ok(Response::from_stored(&stored)),
                    None => self.offline_fallback(request, err),
                }
            }
        }
    }

    /// Store a copy in the dynamic partition when the response qualifies:
    /// status exactly 200, basic type, same-origin request.
    fn store_dynamic(&self, key: &CacheKey, request: &Request, response: &Response) {
        if !response.is_cacheable() {
            return;
        }
        if !same_origin(&request.url, &self.config.origin) {
            return;
        }
        self.storage()
            .open(&self.generation.dynamic_name())
            .put(key.clone(), response.to_stored());
    }

    fn offline_fallback(&self, request: &Request, err: NetError) -> Result<Response, WorkerError> {
        if request.mode == RequestMode::Navigate {
            if let Some(root) = self.cached_root() {
                return Ok(root);
            }
        }
        if is_api_request(&self.config, request) {
            return Ok(self.offline_api_response());
        }
        Err(WorkerError::Net(err))
    }

    fn cached_root(&self) -> Option<Response> {
        let url = self.config.absolute(&self.config.navigation_fallback).ok()?;
        let stored = self.storage().match_key(&CacheKey::get(url.as_str())).cloned()?;
        Some(Response::from_stored(&stored))
    }

    /// JSON body served in place of a failed API fetch.
    fn offline_api_response(&self) -> Response {
        let body = serde_json::json!({
            "error": "Offline mode",
            "message": "You are currently offline",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        Response {
            status: 503,
            status_text: "Service Unavailable".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: body.to_string().into_bytes(),
            kind: ResponseKind::Basic,
        }
    }

    /// Push handler. An absent payload is ignored; malformed JSON is logged
    /// and dropped.
    pub fn handle_push(&self, payload: Option<&[u8]>) -> Option<NotificationDescriptor> {
        let data = payload?;
        match serde_json::from_slice::<PushPayload>(data) {
            Ok(parsed) => {
                tracing::info!("push notification received");
                Some(NotificationDescriptor::from_payload(
                    parsed,
                    &self.config.notification,
                ))
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed push payload");
                None
            }
        }
    }

    /// Notification click. "view" (or the default click) focuses an open app
    /// window, opening one if none exists. Every other action just closes.
    pub fn handle_notification_click(&self, action: &str, clients: &mut impl Clients) {
        tracing::info!(action, "notification clicked");
        if !is_view_action(action) {
            return;
        }

        for client in clients.match_all() {
            if client.url.starts_with(self.config.origin.as_str()) {
                clients.focus(client.id);
                return;
            }
        }

        if let Ok(target) = self.config.absolute(&self.config.notification.click_target) {
            clients.open_window(target.as_str());
        }
    }

    /// Replay pending offline mutations through the fetcher. Successful ops
    /// are marked synced; failures stay queued for the next sync event.
    pub async fn replay_pending(&self, queue: &mut impl SyncQueue) -> usize {
        let mut synced = 0;
        for op in queue.pending() {
            let mut request = Request::new(op.method, &op.url);
            request.body = op.body.clone();

            match self.fetcher.fetch(&request).await {
                Ok(response) if response.status < 400 => {
                    queue.mark_synced(op.id);
                    synced += 1;
                }
                Ok(response) => {
                    tracing::warn!(url = %op.url, status = response.status, "replay rejected, leaving op pending");
                }
                Err(err) => {
                    tracing::warn!(url = %op.url, error = %err, "replay failed, leaving op pending");
                }
            }
        }
        tracing::info!(synced, "background sync finished");
        synced
    }

    /// Refetch the precache manifest, overwriting entries whose fetch
    /// succeeded with status 200. Failed entries are skipped silently.
    pub async fn refresh_static(&self) -> usize {
        let mut refreshed = 0;
        for path in &self.config.precache_manifest {
            let Ok(url) = self.config.absolute(path) else {
                continue;
            };
            let request = Request::get(url.as_str());

            match self.fetcher.fetch(&request).await {
                Ok(response) if response.status == 200 => {
                    self.storage()
                        .open(&self.generation.static_name())
                        .put(CacheKey::get(url.as_str()), response.to_stored());
                    refreshed += 1;
                }
                Ok(response) => {
                    tracing::debug!(%path, status = response.status, "skipping asset refresh");
                }
                Err(err) => {
                    tracing::debug!(%path, error = %err, "skipping asset refresh");
                }
            }
        }
        tracing::info!(refreshed, "content update finished");
        refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    struct OfflineFetcher;

    impl Fetcher for OfflineFetcher {
        async fn fetch(&self, _request: &Request) -> Result<Response, NetError> {
            Err(NetError::Network("connection refused".into()))
        }
    }

    fn gateway() -> CacheGateway<OfflineFetcher> {
        let config = WorkerConfig::builder(
            "shelf",
            "v3",
            Url::parse("https://shelf.example").unwrap(),
        )
        .build();
        CacheGateway::new(config, OfflineFetcher)
    }

    #[test]
    fn test_fetch_declined_before_activation() {
        let gateway = gateway();
        let request = Request::get("https://shelf.example/index.html");

        let result = smol::block_on(gateway.handle_fetch(&request)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_offline_api_response_shape() {
        let gateway = gateway();
        let response = gateway.offline_api_response();

        assert_eq!(response.status, 503);
        assert_eq!(response.header("content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["error"], "Offline mode");
        assert!(
            chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok()
        );
    }

    #[test]
    fn test_activate_requires_install() {
        let gateway = gateway();
        let mut clients = crate::clients::ClientList::new();

        let err = smol::block_on(gateway.activate(&mut clients)).unwrap_err();
        assert!(matches!(err, WorkerError::InvalidState { .. }));
    }
}
