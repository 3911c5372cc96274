//! Request and response shapes of the ranking operations, independent of the wire format.
//!
//! Every endpoint turns one request into exactly one service call and never retries. A failure
//! travels inside the response, and the transport must check [Failed::error] before treating the
//! call as a success.

use derive_new::new;
use serde::{Deserialize, Serialize};

use crate::model::{RankEntry, Scope};
use crate::service::{RankingService, ServiceError};

pub use error::*;
pub use state::*;

pub mod client;
mod error;
pub mod http;
mod state;

/// A response that may carry the failure of the call that produced it.
pub trait Failed {
    fn error(&self) -> Option<&ServiceError>;

    fn take_error(&mut self) -> Option<ServiceError>;
}

macro_rules! impl_failed {
    ($($response:ty),* $(,)?) => {
        $(
            impl Failed for $response {
                fn error(&self) -> Option<&ServiceError> {
                    self.error.as_ref()
                }

                fn take_error(&mut self) -> Option<ServiceError> {
                    self.error.take()
                }
            }
        )*
    };
}

impl_failed!(ViewVideoResponse, PostVideoResponse, GetViewsResponse, TopVideosResponse);

/// How a failure is presented to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself was wrong, retrying it unchanged will not help
    BadRequest,
    NotFound,
    /// Anything on the server side, including the ranked store
    Internal,
}

impl ErrorCategory {
    pub fn of(error: &ServiceError) -> Self {
        match error {
            ServiceError::InvalidArgument { .. } => ErrorCategory::BadRequest,
            ServiceError::NotFound { .. } => ErrorCategory::NotFound,
            ServiceError::Store { .. } | ServiceError::Transport { .. } => ErrorCategory::Internal,
            ServiceError::Remote { category, .. } => *category,
        }
    }

    /// Reverse of the status the HTTP transport answers a failure with.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => ErrorCategory::NotFound,
            400..=499 => ErrorCategory::BadRequest,
            _ => ErrorCategory::Internal,
        }
    }
}

const SUCCESS: &str = "success";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct ViewVideoRequest {
    pub video_name: String,
}

#[derive(Debug, Serialize)]
pub struct ViewVideoResponse {
    pub response: &'static str,
    #[serde(skip)]
    pub error: Option<ServiceError>,
}

pub async fn view_video(
    service: &dyn RankingService, request: ViewVideoRequest,
) -> ViewVideoResponse {
    let error = service.view_video(&request.video_name).await.err();
    ViewVideoResponse {
        response: SUCCESS,
        error,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct PostVideoRequest {
    pub video_name: String,
}

#[derive(Debug, Serialize)]
pub struct PostVideoResponse {
    pub response: &'static str,
    #[serde(skip)]
    pub error: Option<ServiceError>,
}

pub async fn post_video(
    service: &dyn RankingService, request: PostVideoRequest,
) -> PostVideoResponse {
    let error = service.post_video(&request.video_name).await.err();
    PostVideoResponse {
        response: SUCCESS,
        error,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
#[serde(rename_all = "camelCase")]
pub struct GetViewsRequest {
    pub video_name: String,
}

#[derive(Debug, Serialize)]
pub struct GetViewsResponse {
    pub views: i64,
    #[serde(skip)]
    pub error: Option<ServiceError>,
}

pub async fn get_views(service: &dyn RankingService, request: GetViewsRequest) -> GetViewsResponse {
    match service.get_views(&request.video_name).await {
        Ok(views) => GetViewsResponse { views, error: None },
        Err(error) => GetViewsResponse {
            views: 0,
            error: Some(error),
        },
    }
}

/// Shared by the lifetime and the daily ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct TopVideosRequest {
    pub limit: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopVideosResponse {
    pub top_videos: Vec<RankEntry>,
    #[serde(skip)]
    pub error: Option<ServiceError>,
}

pub async fn top_videos(
    service: &dyn RankingService, request: TopVideosRequest,
) -> TopVideosResponse {
    ranking(service, request.limit, Scope::Lifetime).await
}

pub async fn top_videos_today(
    service: &dyn RankingService, request: TopVideosRequest,
) -> TopVideosResponse {
    ranking(service, request.limit, Scope::Today).await
}

async fn ranking(service: &dyn RankingService, limit: usize, scope: Scope) -> TopVideosResponse {
    match service.top_videos(limit, scope).await {
        Ok(top_videos) => TopVideosResponse {
            top_videos,
            error: None,
        },
        Err(error) => TopVideosResponse {
            top_videos: Vec::new(),
            error: Some(error),
        },
    }
}
