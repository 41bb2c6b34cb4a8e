// Library crate exposing modules for integration tests

pub mod model;
pub mod repository;

pub use model::Report;
pub use repository::{statistics, Analyzer, StatsError};
