use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::RangeInclusive;

use async_trait::async_trait;
use dashmap::DashMap;

use super::*;

/// In-process ranked sets.
///
/// Each key is guarded by its map shard, so a single-key mutation is atomic the same way it is on Redis.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: DashMap<String, HashMap<String, f64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members under `key`.
    pub fn cardinality(&self, key: &str) -> usize {
        self.sets.get(key).map(|set| set.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RankedStore for MemoryStore {
    async fn increment(&self, key: &str, member: &str, delta: f64) -> Result<f64> {
        let mut set = self.sets.entry(key.to_owned()).or_default();
        let score = set.entry(member.to_owned()).or_insert(0.0);
        *score += delta;
        Ok(*score)
    }

    async fn set_score(&self, key: &str, member: &str, score: f64) -> Result<()> {
        self.sets
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned(), score);
        Ok(())
    }

    async fn score(&self, key: &str, member: &str) -> Result<Option<f64>> {
        Ok(self
            .sets
            .get(key)
            .and_then(|set| set.get(member).copied()))
    }

    async fn range_descending(
        &self, key: &str, start: isize, stop: isize,
    ) -> Result<Vec<(String, f64)>> {
        let Some(set) = self.sets.get(key) else {
            return Ok(Vec::new());
        };

        let mut members: Vec<(String, f64)> = set
            .iter()
            .map(|(member, score)| (member.clone(), *score))
            .collect();
        drop(set);

        // ties fall back to reverse lexicographic order, as ZREVRANGE does
        members.sort_by(|(a_member, a_score), (b_member, b_score)| {
            b_score
                .partial_cmp(a_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b_member.cmp(a_member))
        });

        let Some(window) = ranks(members.len(), start, stop) else {
            return Ok(Vec::new());
        };

        Ok(members
            .into_iter()
            .skip(*window.start())
            .take(window.end() - window.start() + 1)
            .collect())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Resolves Redis-style inclusive ranks against a set of `len` members.
fn ranks(len: usize, start: isize, stop: isize) -> Option<RangeInclusive<usize>> {
    let len = isize::try_from(len).ok()?;
    if len == 0 {
        return None;
    }

    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return None;
    }

    Some(start as usize..=stop as usize)
}
