use snafu::{Location, Snafu};

use crate::Located;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum StoreError {
    #[snafu(display("cannot connect to the ranked store `{url}` at {location}: {source}"))]
    Connect {
        url: String,
        source: redis::RedisError,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("`{command}` on key `{key}` failed at {location}: {source}"))]
    Command {
        command: &'static str,
        key: String,
        source: redis::RedisError,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Located for StoreError {
    fn location(&self) -> Location {
        match self {
            StoreError::Connect { location, .. } | StoreError::Command { location, .. } => {
                *location
            }
        }
    }
}
