//! Cache storage
//!
//! Container for named cache partitions.

use std::collections::HashMap;

use crate::{CacheError, CacheKey, CachePartition, StoredResponse};

/// All cache partitions known to the gateway, addressed by name.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: HashMap<String, CachePartition>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a partition, creating it if absent.
    pub fn open(&mut self, name: &str) -> &mut CachePartition {
        self.caches
            .entry(name.to_string())
            .or_insert_with(CachePartition::new)
    }

    /// Get an existing partition.
    pub fn partition(&self, name: &str) -> Result<&CachePartition, CacheError> {
        self.caches
            .get(name)
            .ok_or_else(|| CacheError::NoSuchPartition(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.caches.contains_key(name)
    }

    /// Delete a whole partition; returns whether it existed.
    pub fn delete(&mut self, name: &str) -> bool {
        self.caches.remove(name).is_some()
    }

    /// Names of all partitions.
    pub fn keys(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    /// Find a stored response for the key across all partitions.
    pub fn match_key(&self, key: &CacheKey) -> Option<&StoredResponse> {
        self.caches.values().find_map(|cache| cache.get(key))
    }
}
