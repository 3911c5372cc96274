use std::sync::Arc;

use chrono::NaiveDate;
use snafu::{OptionExt as _, ResultExt as _};
use tracing::instrument;

use crate::clock::Clock;
use crate::model::{RankEntry, Scope};
use crate::store::RankedStore;

pub use error::*;

mod error;

/// Derives the ranking keys of a namespace and maps ranking operations onto the ranked store.
///
/// The lifetime ranking lives under the bare prefix. Each calendar day gets its own ranking under
/// `prefix + YYYY-MM-DD`, read from the injected clock at call time. Old daily keys are left in place.
#[derive(Debug, Clone)]
pub struct RankingRepository {
    store: Arc<dyn RankedStore>,
    clock: Arc<dyn Clock>,
    prefix: String,
}

impl RankingRepository {
    pub fn new(store: Arc<dyn RankedStore>, clock: Arc<dyn Clock>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            prefix: prefix.into(),
        }
    }

    pub fn lifetime_key(&self) -> &str {
        &self.prefix
    }

    pub fn today_key(&self) -> String {
        day_key(&self.prefix, self.clock.today())
    }

    pub fn key(&self, scope: Scope) -> String {
        match scope {
            Scope::Lifetime => self.lifetime_key().to_owned(),
            Scope::Today => self.today_key(),
        }
    }

    /// Writes `initial_score` as the lifetime score, replacing any previous one.
    #[instrument(skip(self))]
    pub async fn add_item(&self, video_id: &str, initial_score: i64) -> Result<()> {
        self.store
            .set_score(self.lifetime_key(), video_id, initial_score as f64)
            .await
            .context(StoreSnafu)
    }

    /// Increments the lifetime score and then today's score.
    ///
    /// The two increments are independent. When the second one fails the first one stays applied and
    /// the error is returned as is.
    #[instrument(skip(self))]
    pub async fn record_view(&self, video_id: &str, delta: i64) -> Result<()> {
        for key in [self.lifetime_key().to_owned(), self.today_key()] {
            let score = self
                .store
                .increment(&key, video_id, delta as f64)
                .await
                .context(StoreSnafu)?;

            tracing::debug!(key = %key, score, "incremented `{}`", video_id);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn score(&self, video_id: &str) -> Result<i64> {
        let score = self
            .store
            .score(self.lifetime_key(), video_id)
            .await
            .context(StoreSnafu)?;

        score.map(|score| score as i64).context(NotFoundSnafu { video_id })
    }

    /// Reads the ranking with the store's inclusive range `0..=limit`, so up to `limit + 1` rows come back.
    #[instrument(skip(self))]
    pub async fn top(&self, limit: usize, scope: Scope) -> Result<Vec<RankEntry>> {
        let key = self.key(scope);
        let stop = isize::try_from(limit).unwrap_or(isize::MAX);

        let rows = self
            .store
            .range_descending(&key, 0, stop)
            .await
            .context(StoreSnafu)?;

        Ok(rows
            .into_iter()
            .map(|(video_id, score)| RankEntry::new(video_id, score as i64))
            .collect())
    }

    pub async fn is_healthy(&self) -> bool {
        self.store.health_check().await
    }
}

pub fn day_key(prefix: &str, day: NaiveDate) -> String {
    format!("{}{}", prefix, day.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::clock::ManualClock;
    use crate::store::testing::FailingStore;
    use crate::store::MemoryStore;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn repository() -> (RankingRepository, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(date(2023, 6, 1)));
        let repository = RankingRepository::new(store.clone(), clock.clone(), "videos");
        (repository, store, clock)
    }

    #[test]
    fn keys_follow_the_clock() {
        let (repository, _, clock) = repository();

        assert_eq!(repository.lifetime_key(), "videos");
        assert_eq!(repository.today_key(), "videos2023-06-01");
        assert_eq!(repository.today_key(), "videos2023-06-01", "stable within a day");

        clock.advance_days(1);
        assert_eq!(repository.today_key(), "videos2023-06-02");
        assert_eq!(repository.key(Scope::Lifetime), "videos");
        assert_eq!(repository.key(Scope::Today), "videos2023-06-02");
    }

    #[tokio::test]
    async fn record_view_writes_both_rankings() {
        let (repository, store, _) = repository();

        repository.record_view("video10", 1).await.unwrap();
        repository.record_view("video10", 2).await.unwrap();

        assert_eq!(store.score("videos", "video10").await.unwrap(), Some(3.0));
        assert_eq!(store.score("videos2023-06-01", "video10").await.unwrap(), Some(3.0));
    }

    #[tokio::test]
    async fn add_item_only_touches_the_lifetime_ranking() {
        let (repository, store, _) = repository();

        repository.add_item("video10", 0).await.unwrap();

        assert_eq!(store.score("videos", "video10").await.unwrap(), Some(0.0));
        assert_eq!(store.cardinality("videos2023-06-01"), 0);
    }

    #[tokio::test]
    async fn add_item_resets_an_existing_score() {
        let (repository, _, _) = repository();

        repository.record_view("video10", 7).await.unwrap();
        repository.add_item("video10", 0).await.unwrap();

        assert_eq!(repository.score("video10").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn score_of_unknown_video_is_not_found() {
        let (repository, _, _) = repository();

        let error = repository.score("ghost").await.unwrap_err();
        assert!(
            matches!(error, RepositoryError::NotFound { ref video_id, .. } if video_id == "ghost"),
            "unexpected error: {error}"
        );
    }

    #[tokio::test]
    async fn top_returns_one_extra_row() {
        let (repository, _, _) = repository();
        for (video, views) in [("a", 4), ("b", 3), ("c", 2), ("d", 1)] {
            repository.record_view(video, views).await.unwrap();
        }

        let top = repository.top(2, Scope::Lifetime).await.unwrap();
        assert_eq!(
            top,
            vec![
                RankEntry::new("a".to_string(), 4),
                RankEntry::new("b".to_string(), 3),
                RankEntry::new("c".to_string(), 2),
            ]
        );
    }

    #[tokio::test]
    async fn top_truncates_fractional_scores() {
        let (repository, store, _) = repository();
        store.set_score("videos", "a", 2.9).await.unwrap();

        let top = repository.top(1, Scope::Lifetime).await.unwrap();
        assert_eq!(top, vec![RankEntry::new("a".to_string(), 2)]);
    }

    #[tokio::test]
    async fn daily_ranking_starts_empty_on_a_new_day() {
        let (repository, _, clock) = repository();
        repository.record_view("yesterday", 1).await.unwrap();

        clock.advance_days(1);
        assert!(repository.top(10, Scope::Today).await.unwrap().is_empty());

        repository.record_view("today", 1).await.unwrap();
        let today = repository.top(10, Scope::Today).await.unwrap();
        assert_eq!(today, vec![RankEntry::new("today".to_string(), 1)]);

        let lifetime = repository.top(10, Scope::Lifetime).await.unwrap();
        assert_eq!(lifetime.len(), 2);
    }

    #[tokio::test]
    async fn failed_daily_increment_keeps_the_lifetime_increment() {
        let store = Arc::new(FailingStore::accepting(&["videos"]));
        let clock = Arc::new(ManualClock::new(date(2023, 6, 1)));
        let repository = RankingRepository::new(store.clone(), clock, "videos");

        let error = repository.record_view("video10", 1).await.unwrap_err();

        assert!(matches!(error, RepositoryError::Store { .. }), "unexpected error: {error}");
        assert_eq!(store.inner.score("videos", "video10").await.unwrap(), Some(1.0));
        assert_eq!(store.inner.score("videos2023-06-01", "video10").await.unwrap(), None);
    }

    #[tokio::test]
    async fn health_follows_the_store() {
        let (repository, _, _) = repository();
        assert!(repository.is_healthy().await);

        let offline = RankingRepository::new(
            Arc::new(FailingStore::offline()),
            Arc::new(ManualClock::new(date(2023, 6, 1))),
            "videos",
        );
        assert!(!offline.is_healthy().await);
    }
}
