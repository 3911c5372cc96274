use std::time::Instant;

use async_trait::async_trait;
use derive_new::new;
use tracing::instrument;

use super::*;

use crate::api::ErrorCategory;

/// Wraps a [RankingService] and logs every call with its arguments, duration and outcome.
#[derive(Debug, Clone, new)]
pub struct LoggingService<S> {
    inner: S,
}

fn record<T>(method: &'static str, begin: Instant, result: &Result<T>) {
    let took = begin.elapsed();
    match result {
        Ok(_) => tracing::info!(method, ?took, "call succeeded"),
        Err(error) if ErrorCategory::of(error) == ErrorCategory::Internal => {
            tracing::error!(method, ?took, %error, "call failed")
        }
        Err(error) => tracing::warn!(method, ?took, %error, "call rejected"),
    }
}

#[async_trait]
impl<S: RankingService> RankingService for LoggingService<S> {
    #[instrument(name = "ViewVideo", skip(self))]
    async fn view_video(&self, video_id: &str) -> Result<()> {
        let begin = Instant::now();
        let result = self.inner.view_video(video_id).await;
        record("view_video", begin, &result);
        result
    }

    #[instrument(name = "PostVideo", skip(self))]
    async fn post_video(&self, video_id: &str) -> Result<()> {
        let begin = Instant::now();
        let result = self.inner.post_video(video_id).await;
        record("post_video", begin, &result);
        result
    }

    #[instrument(name = "GetViews", skip(self))]
    async fn get_views(&self, video_id: &str) -> Result<i64> {
        let begin = Instant::now();
        let result = self.inner.get_views(video_id).await;
        record("get_views", begin, &result);
        result
    }

    #[instrument(name = "GetTopNVideos", skip(self))]
    async fn top_videos(&self, limit: usize, scope: Scope) -> Result<Vec<RankEntry>> {
        let begin = Instant::now();
        let result = self.inner.top_videos(limit, scope).await;
        record("top_videos", begin, &result);
        result
    }

    async fn is_healthy(&self) -> bool {
        let healthy = self.inner.is_healthy().await;
        if !healthy {
            tracing::warn!("ranked store reported unhealthy");
        }
        healthy
    }
}
