use crate::value::Mapping;

/// A single-level mapping keyed by separator-joined paths
pub type FlatMap = Mapping;

/// What to do when two leaves produce the same composite key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Fail with `Error::AmbiguousKey`
    #[default]
    Error,
    /// Keep the later leaf, in the position of the earlier one
    LastWins,
}

/// Configuration for the flattening process
#[derive(Debug, Clone)]
pub struct FlattenConfig {
    /// Separator joining path segments
    pub separator: String,

    /// Whether sequences are recursed into (keyed by index) or kept as leaves
    pub flatten_sequences: bool,

    /// Handling of composite key collisions
    pub on_collision: CollisionPolicy,

    /// Maximum container nesting below the root mapping (None = unbounded)
    pub max_depth: Option<usize>,
}

impl FlattenConfig {
    pub fn with_separator(separator: impl Into<String>) -> Self {
        FlattenConfig {
            separator: separator.into(),
            ..FlattenConfig::default()
        }
    }
}

impl Default for FlattenConfig {
    fn default() -> Self {
        FlattenConfig {
            separator: String::from("."),
            flatten_sequences: true,
            on_collision: CollisionPolicy::Error,
            max_depth: None,
        }
    }
}
