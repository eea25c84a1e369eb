//! Collaborator traits implemented outside the engine.

pub mod row_decoder;

pub use row_decoder::{RawRow, RowDecoder, StandardRowDecoder};
