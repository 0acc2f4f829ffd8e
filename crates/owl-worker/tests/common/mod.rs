//! Shared test fixtures: a scripted fetcher and a canned worker config.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use owl_worker::{Fetcher, NetError, Request, Response, ResponseKind, WorkerConfig};
use url::Url;

pub const ORIGIN: &str = "https://shelf.example";

pub const MANIFEST: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/icons/icon-192x192.png",
];

pub fn config() -> WorkerConfig {
    WorkerConfig::builder("shelf", "v3", Url::parse(ORIGIN).unwrap())
        .precache(MANIFEST)
        .build()
}

/// Deterministic body for a precached path.
pub fn asset_body(path: &str) -> Vec<u8> {
    format!("asset:{path}").into_bytes()
}

enum Script {
    Ok {
        status: u16,
        body: Vec<u8>,
        kind: ResponseKind,
    },
    Offline,
}

/// Fetcher answering from a URL-keyed script, recording every call.
/// Unscripted URLs behave as network failures.
#[derive(Default)]
pub struct ScriptedFetcher {
    routes: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher pre-loaded with a 200 response for every manifest asset.
    pub fn with_manifest() -> Self {
        let fetcher = Self::new();
        for path in MANIFEST {
            fetcher.script_ok(&format!("{ORIGIN}{path}"), &asset_body(path));
        }
        fetcher
    }

    pub fn script_ok(&self, url: &str, body: &[u8]) {
        self.script(url, Script::Ok {
            status: 200,
            body: body.to_vec(),
            kind: ResponseKind::Basic,
        });
    }

    pub fn script_status(&self, url: &str, status: u16) {
        self.script(url, Script::Ok {
            status,
            body: Vec::new(),
            kind: ResponseKind::Basic,
        });
    }

    pub fn script_cors(&self, url: &str, body: &[u8]) {
        self.script(url, Script::Ok {
            status: 200,
            body: body.to_vec(),
            kind: ResponseKind::Cors,
        });
    }

    pub fn script_offline(&self, url: &str) {
        self.script(url, Script::Offline);
    }

    fn script(&self, url: &str, script: Script) {
        self.routes.lock().unwrap().insert(url.to_string(), script);
    }

    /// URLs fetched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn fetch_scripted(&self, request: &Request) -> Result<Response, NetError> {
        self.calls.lock().unwrap().push(request.url.clone());

        match self.routes.lock().unwrap().get(&request.url) {
            Some(Script::Ok { status, body, kind }) => Ok(Response {
                status: *status,
                status_text: "OK".to_string(),
                headers: Vec::new(),
                body: body.clone(),
                kind: *kind,
            }),
            Some(Script::Offline) | None => {
                Err(NetError::Network("connection refused".to_string()))
            }
        }
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        self.fetch_scripted(request)
    }
}

impl Fetcher for &ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        self.fetch_scripted(request)
    }
}
