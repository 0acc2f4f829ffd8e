//! Request and response model
//!
//! The request/response shapes seen by the gateway's fetch handler.

use owl_cache::StoredResponse;
use url::Url;

/// HTTP method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

/// Request mode as reported by the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level document navigation.
    Navigate,
    SameOrigin,
    Cors,
    #[default]
    NoCors,
}

/// An intercepted request. URLs are absolute.
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::Get,
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Mark this request as a top-level navigation.
    pub fn navigate(mut self) -> Self {
        self.mode = RequestMode::Navigate;
        self
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Response classification, after the browser's `type` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response with readable body and headers.
    #[default]
    Basic,
    /// Cross-origin response passed through CORS.
    Cors,
    /// Cross-origin response with no readable body.
    Opaque,
}

/// A response as returned to the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub kind: ResponseKind,
}

impl Response {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body,
            kind: ResponseKind::Basic,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    /// Get a header value, case-insensitive on the name.
    pub fn header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }

    /// Only plain 200 same-origin responses are ever written to a cache.
    /// Redirects, errors and opaque cross-origin responses are not.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }

    pub fn to_stored(&self) -> StoredResponse {
        StoredResponse {
            status: self.status,
            status_text: self.status_text.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }

    /// Stored copies come back as same-origin snapshots.
    pub fn from_stored(stored: &StoredResponse) -> Self {
        Self {
            status: stored.status,
            status_text: stored.status_text.clone(),
            headers: stored.headers.clone(),
            body: stored.body.clone(),
            kind: ResponseKind::Basic,
        }
    }
}

/// Whether an absolute URL shares an origin with `origin`.
pub fn same_origin(url: &str, origin: &Url) -> bool {
    Url::parse(url)
        .map(|u| u.origin() == origin.origin())
        .unwrap_or(false)
}
