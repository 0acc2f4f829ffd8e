//! OWL Cache
//!
//! Named request/response stores with generation-based pruning.

mod partition;
mod storage;
mod version;

pub use partition::{CacheKey, CachePartition, StoredResponse};
pub use storage::CacheStorage;
pub use version::CacheGeneration;

/// Cache error
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no such cache partition: {0}")]
    NoSuchPartition(String),
}
