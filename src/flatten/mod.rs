//! Flattening - turn nested configuration trees into path-keyed flat maps
//!
//! [`Flattener`] joins key paths with a configurable separator, recursing
//! into mappings and (optionally) sequences. [`Cleaner`] flattens with `/`
//! and unboxes numeric-library scalars so the result can go straight to an
//! experiment tracker. [`flatten_reader`] drives either one over a JSON
//! document or a JSON Lines stream.

pub mod types;
pub mod flattener;
pub mod clean;
pub mod writer;
pub mod reader;

pub use types::{CollisionPolicy, FlatMap, FlattenConfig};
pub use flattener::{flatten, Flattener};
pub use clean::{clean, Cleaner, CLEAN_SEPARATOR};
pub use writer::FlatWriter;
pub use reader::{flatten_reader, record_to_mapping, RecordMode};
