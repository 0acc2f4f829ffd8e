//! Cache generations
//!
//! A generation is a version tag qualifying partition names. Only one
//! generation is current; partitions from any other are stale and deleted
//! at activation.

use crate::CacheStorage;

/// The current cache generation for an app.
#[derive(Debug, Clone)]
pub struct CacheGeneration {
    app: String,
    tag: String,
}

impl CacheGeneration {
    pub fn new(app: &str, tag: &str) -> Self {
        Self {
            app: app.to_string(),
            tag: tag.to_string(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Name of the precache partition for this generation.
    pub fn static_name(&self) -> String {
        format!("{}-static-{}", self.app, self.tag)
    }

    /// Name of the runtime cache partition for this generation.
    pub fn dynamic_name(&self) -> String {
        format!("{}-dynamic-{}", self.app, self.tag)
    }

    /// Name of the unified partition, kept for single-cache deployments.
    pub fn unified_name(&self) -> String {
        format!("{}-{}", self.app, self.tag)
    }

    /// Partition names allowed to survive activation.
    pub fn allow_list(&self) -> [String; 3] {
        [self.static_name(), self.dynamic_name(), self.unified_name()]
    }

    /// Whether a partition name belongs to this generation.
    pub fn is_current(&self, name: &str) -> bool {
        self.allow_list().iter().any(|allowed| allowed == name)
    }

    /// Delete every partition outside the allow-list. Returns the deleted names.
    pub fn prune(&self, storage: &mut CacheStorage) -> Vec<String> {
        let mut deleted = Vec::new();
        for name in storage.keys() {
            if !self.is_current(&name) {
                tracing::info!(cache = %name, "deleting stale cache");
                storage.delete(&name);
                deleted.push(name);
            }
        }
        deleted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_names() {
        let generation = CacheGeneration::new("shelf", "v3");

        assert_eq!(generation.static_name(), "shelf-static-v3");
        assert_eq!(generation.dynamic_name(), "shelf-dynamic-v3");
        assert_eq!(generation.unified_name(), "shelf-v3");
    }

    #[test]
    fn test_is_current() {
        let generation = CacheGeneration::new("shelf", "v3");

        assert!(generation.is_current("shelf-static-v3"));
        assert!(generation.is_current("shelf-v3"));
        assert!(!generation.is_current("shelf-static-v2"));
        assert!(!generation.is_current("other-static-v3"));
    }

    #[test]
    fn test_prune_deletes_only_stale() {
        let generation = CacheGeneration::new("shelf", "v3");
        let mut storage = CacheStorage::new();
        storage.open("shelf-static-v3");
        storage.open("shelf-dynamic-v3");
        storage.open("shelf-static-v2");
        storage.open("shelf-dynamic-v1");

        let mut deleted = generation.prune(&mut storage);
        deleted.sort();

        assert_eq!(deleted, vec!["shelf-dynamic-v1", "shelf-static-v2"]);
        assert!(storage.has("shelf-static-v3"));
        assert!(storage.has("shelf-dynamic-v3"));
        assert!(!storage.has("shelf-static-v2"));
    }

    #[test]
    fn test_prune_empty_storage() {
        let generation = CacheGeneration::new("shelf", "v1");
        let mut storage = CacheStorage::new();

        assert!(generation.prune(&mut storage).is_empty());
    }
}
