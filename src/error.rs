use thiserror::Error;

/// Errors produced while flattening, cleaning, encoding or splitting
#[derive(Error, Debug)]
pub enum Error {
    /// Two distinct leaves resolved to the same composite key
    #[error("ambiguous composite key '{key}': more than one leaf maps to it")]
    AmbiguousKey { key: String },

    #[error("nesting below '{key}' exceeds the maximum depth of {max_depth}")]
    DepthExceeded { key: String, max_depth: usize },

    /// A boxed numeric value did not hold exactly one element
    #[error("value at '{key}' is not a scalar: it holds {len} elements")]
    NotScalar { key: String, len: usize },

    #[error("array shape {shape:?} needs {expected} elements but {actual} were given")]
    ShapeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[error("value of type '{type_name}' is not JSON serializable")]
    NotSerializable { type_name: String },

    #[error("requested {requested} series but the {split} split only has {available}")]
    NotEnoughSeries {
        split: &'static str,
        requested: usize,
        available: usize,
    },

    #[error("group index {gid} is out of range for {num_groups} groups")]
    GroupOutOfRange { gid: usize, num_groups: usize },

    #[error("no training windows could be cut from the selected series")]
    NoTrainingWindows,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
