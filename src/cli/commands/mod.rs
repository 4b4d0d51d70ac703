//! CLI command implementations

pub mod optimize;
