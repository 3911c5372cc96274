use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snafu::Snafu;

use super::ErrorCategory;
use crate::service::ServiceError;
use crate::Located;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    /// The query string is missing a parameter or has one of the wrong type
    #[snafu(display("malformed query: {source}"))]
    Query { source: QueryRejection },

    /// The body is not the expected JSON document
    #[snafu(display("malformed body: {source}"))]
    Body { source: JsonRejection },

    #[snafu(display("{source}"))]
    Service { source: ServiceError },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Query { .. } | ApiError::Body { .. } => StatusCode::BAD_REQUEST,
            ApiError::Service { source } => match ErrorCategory::of(source) {
                ErrorCategory::BadRequest => StatusCode::BAD_REQUEST,
                ErrorCategory::NotFound => StatusCode::NOT_FOUND,
                ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Service { source } = &self {
            if status.is_server_error() {
                tracing::error!(location = %source.location(), "request failed: {}", source);
            }
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
