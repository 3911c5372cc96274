use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

pub use error::*;
pub use memory::MemoryStore;
pub use remote::RedisStore;

mod error;
mod memory;
mod remote;

#[cfg(test)]
pub(crate) mod testing;

/// An ordered set engine keyed by name, where each set maps a member to a score.
///
/// Every mutation is atomic on a single key. Nothing is atomic across keys.
#[async_trait]
pub trait RankedStore: Debug + Send + Sync {
    /// Adds `delta` to the member's score, creating the member (and the key) at zero first if needed.
    /// Returns the score after the increment.
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<f64>;

    /// Overwrites the member's score.
    async fn set_score(&self, key: &str, member: &str, score: f64) -> Result<()>;

    /// Returns `None` when the member has no entry under `key`.
    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>>;

    /// Members ordered by score, highest first, between the `start` and `stop` ranks.
    ///
    /// Both bounds are inclusive and negative ranks count from the end, the same way `ZREVRANGE` does.
    async fn range_descending(
        &self, key: &str, start: isize, stop: isize,
    ) -> Result<Vec<(String, f64)>>;

    async fn health_check(&self) -> bool;
}

/// Where the ranked sets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    Redis(String),
    Memory,
}

pub async fn connect(target: &StoreTarget) -> Result<Arc<dyn RankedStore>> {
    match target {
        StoreTarget::Redis(url) => {
            let store = RedisStore::connect(url).await?;
            Ok(Arc::new(store))
        }
        StoreTarget::Memory => {
            tracing::warn!("using the in-memory ranked store, counters will not survive a restart");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}
