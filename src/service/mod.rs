use async_trait::async_trait;
use derive_new::new;
use snafu::ensure;

use crate::model::{RankEntry, Scope};
use crate::repository::RankingRepository;

pub use error::*;
pub use logging::LoggingService;

mod error;
mod logging;

/// The business operations of the ranking service.
///
/// Inputs are validated before anything reaches the store, so a rejected call has no side effect.
#[async_trait]
pub trait RankingService: Send + Sync {
    /// Counts one view of the video, in both the lifetime and today's ranking.
    async fn view_video(&self, video_id: &str) -> Result<()>;

    /// Registers the video with zero lifetime views.
    ///
    /// Posting a video that already exists re-initializes it: its lifetime views go back to zero.
    async fn post_video(&self, video_id: &str) -> Result<()>;

    /// Lifetime views of the video.
    async fn get_views(&self, video_id: &str) -> Result<i64>;

    /// The `limit` most viewed videos of the ranking, most viewed first.
    ///
    /// Exactly `limit` entries come back when the ranking holds that many, never `limit + 1`.
    /// A shorter ranking is returned whole.
    async fn top_videos(&self, limit: usize, scope: Scope) -> Result<Vec<RankEntry>>;

    async fn is_healthy(&self) -> bool;
}

#[derive(Debug, Clone, new)]
pub struct Ranking {
    repository: RankingRepository,
}

fn ensure_video_name(video_id: &str) -> Result<()> {
    ensure!(
        !video_id.is_empty(),
        InvalidArgumentSnafu {
            reason: "video name must not be empty"
        }
    );
    Ok(())
}

#[async_trait]
impl RankingService for Ranking {
    async fn view_video(&self, video_id: &str) -> Result<()> {
        ensure_video_name(video_id)?;
        self.repository.record_view(video_id, 1).await?;
        Ok(())
    }

    async fn post_video(&self, video_id: &str) -> Result<()> {
        ensure_video_name(video_id)?;
        self.repository.add_item(video_id, 0).await?;
        Ok(())
    }

    async fn get_views(&self, video_id: &str) -> Result<i64> {
        ensure_video_name(video_id)?;
        let views = self.repository.score(video_id).await?;
        Ok(views)
    }

    async fn top_videos(&self, limit: usize, scope: Scope) -> Result<Vec<RankEntry>> {
        ensure!(
            limit > 0,
            InvalidArgumentSnafu {
                reason: "limit must be greater than zero"
            }
        );

        let mut videos = self.repository.top(limit, scope).await?;
        // the store range is inclusive and hands back one row too many
        videos.truncate(limit);
        Ok(videos)
    }

    async fn is_healthy(&self) -> bool {
        self.repository.is_healthy().await
    }
}
