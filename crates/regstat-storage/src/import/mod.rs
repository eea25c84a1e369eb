//! Import Pipeline: fact rows and their dimensions, loaded together.

pub mod fields;
mod license;
pub mod pipeline;
pub mod session;
mod vehicle;

pub(crate) use pipeline::BatchContext;
pub use pipeline::{ImportOutcome, ImportPipeline};
pub use session::{ImportSession, IndexStrategy, SessionSummary};
