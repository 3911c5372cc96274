//! A [RankingService] that forwards every call to a remote ranking server over HTTP.
//!
//! Requests are encoded from the same types the server decodes, and an `{"error": ...}` body is
//! turned back into a [ServiceError::Remote] carrying the [ErrorCategory] the server answered with.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Deserialize;
use snafu::ResultExt;

use super::*;

use crate::service::{RemoteSnafu, Result, TransportSnafu};

#[derive(Debug, Clone)]
pub struct RemoteRanking {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct Views {
    views: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Ranked {
    top_videos: Vec<RankEntry>,
}

#[derive(Deserialize)]
struct Failure {
    error: String,
}

impl RemoteRanking {
    /// `base_url` is the scheme and authority of the server, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(
        &self, path: &'static str, request: RequestBuilder,
    ) -> Result<T> {
        let response = request.send().await.context(TransportSnafu { path })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.context(TransportSnafu { path });
        }

        let message = match response.json::<Failure>().await {
            Ok(failure) => failure.error,
            Err(_) => status.to_string(),
        };
        RemoteSnafu {
            category: ErrorCategory::from_status(status.as_u16()),
            message,
        }
        .fail()
    }
}

#[async_trait]
impl RankingService for RemoteRanking {
    async fn view_video(&self, video_id: &str) -> Result<()> {
        let request = ViewVideoRequest::new(video_id.to_string());
        let builder = self.client.get(self.url("/viewVideo")).query(&request);
        let _: IgnoredAny = self.call("/viewVideo", builder).await?;
        Ok(())
    }

    async fn post_video(&self, video_id: &str) -> Result<()> {
        let request = PostVideoRequest::new(video_id.to_string());
        let builder = self.client.post(self.url("/postVideo")).json(&request);
        let _: IgnoredAny = self.call("/postVideo", builder).await?;
        Ok(())
    }

    async fn get_views(&self, video_id: &str) -> Result<i64> {
        let request = GetViewsRequest::new(video_id.to_string());
        let builder = self.client.get(self.url("/getViews")).query(&request);
        let views: Views = self.call("/getViews", builder).await?;
        Ok(views.views)
    }

    async fn top_videos(&self, limit: usize, scope: Scope) -> Result<Vec<RankEntry>> {
        let path = match scope {
            Scope::Lifetime => "/getTopNvideos",
            Scope::Today => "/getTopNvideosToday",
        };
        let builder = self
            .client
            .get(self.url(path))
            .query(&TopVideosRequest::new(limit));
        let ranked: Ranked = self.call(path, builder).await?;
        Ok(ranked.top_videos)
    }

    async fn is_healthy(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(error) => {
                tracing::warn!(%error, "ranking service did not answer the health check");
                false
            }
        }
    }
}
