use snafu::{Location, Snafu};

use crate::store::StoreError;
use crate::Located;

pub type Result<T, E = RepositoryError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RepositoryError {
    /// The video was never posted nor viewed
    #[snafu(display("video `{video_id}` has no lifetime entry"))]
    NotFound {
        video_id: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("ranked store call failed at {location}: {source}"))]
    Store {
        source: StoreError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Located for RepositoryError {
    fn location(&self) -> Location {
        match self {
            RepositoryError::NotFound { location, .. }
            | RepositoryError::Store { location, .. } => *location,
        }
    }
}
