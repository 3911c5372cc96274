use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use snafu::ResultExt;

use super::*;

/// Wraps a [MemoryStore] and counts every call made against it.
#[derive(Debug, Default)]
pub struct CountingStore {
    pub inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RankedStore for CountingStore {
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        self.tick();
        self.inner.increment(key, member, delta).await
    }

    async fn set_score(&self, key: &str, member: &str, score: f64) -> Result<()> {
        self.tick();
        self.inner.set_score(key, member, score).await
    }

    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        self.tick();
        self.inner.score(key, member).await
    }

    async fn range_descending(
        &self, key: &str, start: isize, stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        self.tick();
        self.inner.range_descending(key, start, stop).await
    }

    async fn health_check(&self) -> bool {
        self.tick();
        self.inner.health_check().await
    }
}

/// A [MemoryStore] whose writes fail for every key except the ones it was told to accept.
#[derive(Debug)]
pub struct FailingStore {
    pub inner: MemoryStore,
    accepted: Vec<String>,
}

impl FailingStore {
    /// Fails everything.
    pub fn offline() -> Self {
        Self::accepting(&[])
    }

    pub fn accepting(keys: &[&str]) -> Self {
        Self {
            inner: MemoryStore::new(),
            accepted: keys.iter().map(|key| key.to_string()).collect(),
        }
    }

    fn check(&self, command: &'static str, key: &str) -> Result<()> {
        if self.accepted.iter().any(|accepted| accepted == key) {
            return Ok(());
        }

        let refused = redis::RedisError::from((redis::ErrorKind::IoError, "connection refused"));
        Err(refused).context(CommandSnafu { command, key })
    }
}

#[async_trait]
impl RankedStore for FailingStore {
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        self.check("ZINCRBY", key)?;
        self.inner.increment(key, member, delta).await
    }

    async fn set_score(&self, key: &str, member: &str, score: f64) -> Result<()> {
        self.check("ZADD", key)?;
        self.inner.set_score(key, member, score).await
    }

    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        self.check("ZSCORE", key)?;
        self.inner.score(key, member).await
    }

    async fn range_descending(
        &self, key: &str, start: isize, stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        self.check("ZREVRANGE", key)?;
        self.inner.range_descending(key, start, stop).await
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Behavior every [RankedStore] must share, checked against a key nobody else writes to.
pub async fn check_contract(store: &dyn RankedStore, key: &str) {
    assert_eq!(store.score(key, "a").await.unwrap(), None);
    assert!(store.range_descending(key, 0, 10).await.unwrap().is_empty());

    assert_eq!(store.increment(key, "a", 1.0).await.unwrap(), 1.0);
    assert_eq!(store.increment(key, "a", 2.0).await.unwrap(), 3.0);
    assert_eq!(store.score(key, "a").await.unwrap(), Some(3.0));

    store.set_score(key, "a", 5.0).await.unwrap();
    store.set_score(key, "b", 9.0).await.unwrap();
    store.set_score(key, "c", 1.0).await.unwrap();
    store.set_score(key, "d", 5.0).await.unwrap();

    let everything = store.range_descending(key, 0, -1).await.unwrap();
    assert_eq!(
        everything,
        vec![
            ("b".to_string(), 9.0),
            ("d".to_string(), 5.0),
            ("a".to_string(), 5.0),
            ("c".to_string(), 1.0),
        ],
        "score descending, ties in reverse lexicographic order"
    );

    let first_two = store.range_descending(key, 0, 1).await.unwrap();
    assert_eq!(first_two.len(), 2, "stop rank is inclusive");
    assert_eq!(store.range_descending(key, 0, 100).await.unwrap().len(), 4);
    assert_eq!(store.range_descending(key, -2, -1).await.unwrap()[1].0, "c");
    assert!(store.range_descending(key, 4, 10).await.unwrap().is_empty());

    assert_eq!(store.increment(key, "c", 0.5).await.unwrap(), 1.5);
    assert_eq!(store.score(key, "c").await.unwrap(), Some(1.5));

    assert!(store.health_check().await);
}
