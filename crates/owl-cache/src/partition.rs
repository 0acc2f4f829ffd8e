//! Cache partition
//!
//! A named store of response snapshots, keyed by request method + URL.

use std::collections::HashMap;

/// Identity of a cached request. Headers are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub method: String,
    pub url: String,
}

impl CacheKey {
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_uppercase(),
            url: url.to_string(),
        }
    }

    /// Key for a plain GET, the common case.
    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }
}

/// Snapshot of a response as stored in a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl StoredResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: "OK".to_string(),
            headers: Vec::new(),
            body,
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
}

/// A single cache partition: request identity to stored response.
///
/// Writes are last-write-wins; there is no per-key locking.
#[derive(Debug, Clone, Default)]
pub struct CachePartition {
    entries: HashMap<CacheKey, StoredResponse>,
}

impl CachePartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response, replacing any existing entry for the same key.
    pub fn put(&mut self, key: CacheKey, response: StoredResponse) {
        tracing::debug!(url = %key.url, status = response.status, "cache put");
        self.entries.insert(key, response);
    }

    /// Look up a stored response.
    pub fn get(&self, key: &CacheKey) -> Option<&StoredResponse> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Delete an entry; returns whether it existed.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// All cached keys.
    pub fn keys(&self) -> Vec<&CacheKey> {
        self.entries.keys().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
