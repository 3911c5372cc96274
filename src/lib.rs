pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod repository;
pub mod service;
pub mod store;

pub trait Located {
    fn location(&self) -> snafu::Location;
}
