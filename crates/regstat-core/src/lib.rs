//! regstat-core: shared types, errors, configuration, tracing, and the
//! collaborator traits consumed by the storage and analysis crates.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
