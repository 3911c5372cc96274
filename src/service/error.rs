use snafu::{Location, Snafu};

use crate::api::ErrorCategory;
use crate::repository::RepositoryError;
use crate::store::StoreError;
use crate::Located;

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ServiceError {
    /// The caller sent an empty video name or asked for zero videos
    #[snafu(display("invalid argument: {reason}"))]
    InvalidArgument {
        reason: &'static str,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("video `{video_id}` not found"))]
    NotFound {
        video_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("ranking store failure: {source}"))]
    Store {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },

    /// A remote ranking service answered with an error body
    #[snafu(display("{message}"))]
    Remote {
        category: ErrorCategory,
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("could not call `{path}` on the ranking service: {source}"))]
    Transport {
        path: &'static str,
        source: reqwest::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { video_id, location } => {
                ServiceError::NotFound { video_id, location }
            }
            RepositoryError::Store { source, location } => ServiceError::Store { source, location },
        }
    }
}

impl Located for ServiceError {
    fn location(&self) -> Location {
        match self {
            ServiceError::InvalidArgument { location, .. }
            | ServiceError::NotFound { location, .. }
            | ServiceError::Store { location, .. }
            | ServiceError::Remote { location, .. }
            | ServiceError::Transport { location, .. } => *location,
        }
    }
}
