//! # Anvil - Flattening and Experiment Utilities
//!
//! A small library for turning nested configuration and result trees into
//! flat, path-keyed records for experiment tracking, plus the helpers that
//! usually surround a time-series experiment run.
//!
//! ## Modules
//!
//! - **value**: The nested value model, including boxed numeric values
//! - **flatten**: Flatten nested mappings; clean boxed numerics out of them
//! - **encode**: JSON encoding for values carrying boxed numerics
//! - **cv**: Temporal cross-validation grouping of time-series datasets
//! - **utils**: Directory cleanup, argument snapshots, cyclic sampling
//!
//! ## Quick Start
//!
//! ```rust
//! use anvil::flatten::{Flattener, FlattenConfig};
//! use anvil::value::Value;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Value::from(json!({
//!     "model": {"layers": [64, 32], "dropout": 0.1},
//!     "seed": 7
//! }));
//!
//! let flattener = Flattener::new(FlattenConfig::default());
//! let flat = flattener.flatten(config.as_mapping().unwrap())?;
//!
//! assert_eq!(
//!     flat.keys().collect::<Vec<_>>(),
//!     vec!["model.layers.0", "model.layers.1", "model.dropout", "seed"]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Cleaning boxed numerics
//!
//! ```rust
//! use anvil::flatten::clean;
//! use anvil::value::{Mapping, NumericArray, Value};
//!
//! let mut metrics = Mapping::new();
//! metrics.insert("loss", NumericArray::scalar(0.25));
//!
//! let mut run = Mapping::new();
//! run.insert("metrics", metrics);
//!
//! let cleaned = clean(&run).unwrap();
//! assert_eq!(cleaned.get("metrics/loss"), Some(&Value::Float(0.25)));
//! ```

use anyhow::Result;
use std::io::{BufRead, Write};

pub mod cv;
pub mod encode;
pub mod error;
pub mod flatten;
pub mod utils;
pub mod value;

// Re-export commonly used types for convenience
pub use error::Error;
pub use flatten::{
    clean, flatten, flatten_reader, record_to_mapping, Cleaner, CollisionPolicy, FlatMap, FlatWriter,
    FlattenConfig, Flattener, RecordMode,
};
pub use value::{Mapping, Numeric, NumericArray, ScalarExtractable, Value};

/// Main entry point: flatten a stream of JSON Lines records
///
/// Returns the number of records written.
pub fn flatten_json_lines<R: BufRead, W: Write>(
    reader: R,
    writer: &mut FlatWriter<W>,
    config: FlattenConfig,
) -> Result<usize> {
    flatten_reader(reader, writer, &RecordMode::Flatten(Flattener::new(config)), true)
}
