//! Temporal cross-validation grouping for exchange-rate style datasets
//!
//! Each training series is cut into overlapping windows; every window is
//! assigned to a group identified by its series and by the checkpoint
//! period its start date falls in. Groups can then serve as folds or as
//! separate tasks.

pub mod types;
pub mod dataset;
pub mod splitter;

pub use types::{CvSplit, SplitConfig, TimeSeriesEntry, DEFAULT_CHECKPOINTS};
pub use dataset::Dataset;
pub use splitter::CvSplitter;
