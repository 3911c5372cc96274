use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use snafu::ResultExt;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::*;

pub fn router(app: App, request_timeout: Duration) -> Router {
    Router::new()
        .route("/viewVideo", get(view_video_handler))
        .route("/postVideo", post(post_video_handler))
        .route("/getViews", get(get_views_handler))
        .route("/getTopNvideos", get(top_videos_handler))
        .route("/getTopNvideosToday", get(top_videos_today_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .with_state(app)
}

/// Succeeds only when the response carries no error.
fn reply<R: Failed + Serialize>(mut response: R) -> Result<Json<R>> {
    match response.take_error() {
        Some(source) => Err(ApiError::Service { source }),
        None => Ok(Json(response)),
    }
}

async fn view_video_handler(
    State(app): State<App>, query: std::result::Result<Query<ViewVideoRequest>, QueryRejection>,
) -> Result<Json<ViewVideoResponse>> {
    let Query(request) = query.context(QuerySnafu)?;
    reply(view_video(&*app, request).await)
}

async fn post_video_handler(
    State(app): State<App>, body: std::result::Result<Json<PostVideoRequest>, JsonRejection>,
) -> Result<Json<PostVideoResponse>> {
    let Json(request) = body.context(BodySnafu)?;
    reply(post_video(&*app, request).await)
}

async fn get_views_handler(
    State(app): State<App>, query: std::result::Result<Query<GetViewsRequest>, QueryRejection>,
) -> Result<Json<GetViewsResponse>> {
    let Query(request) = query.context(QuerySnafu)?;
    reply(get_views(&*app, request).await)
}

async fn top_videos_handler(
    State(app): State<App>, query: std::result::Result<Query<TopVideosRequest>, QueryRejection>,
) -> Result<Json<TopVideosResponse>> {
    let Query(request) = query.context(QuerySnafu)?;
    reply(top_videos(&*app, request).await)
}

async fn top_videos_today_handler(
    State(app): State<App>, query: std::result::Result<Query<TopVideosRequest>, QueryRejection>,
) -> Result<Json<TopVideosResponse>> {
    let Query(request) = query.context(QuerySnafu)?;
    reply(top_videos_today(&*app, request).await)
}

async fn health_handler(State(app): State<App>) -> (StatusCode, Json<serde_json::Value>) {
    if app.is_healthy().await {
        (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "unavailable" })),
        )
    }
}
