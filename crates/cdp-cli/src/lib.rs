//! CLI library components for the crime and demographics pipeline.

pub mod config;
pub mod logging;
pub mod summary;
