use crate::error::{Error, Result};
use crate::flatten::flattener::Flattener;
use crate::flatten::types::{FlatMap, FlattenConfig};
use crate::value::{Mapping, Value};

/// Separator used for cleaned keys, matching experiment-tracker metric paths
pub const CLEAN_SEPARATOR: &str = "/";

/// Flattens with `/` and unboxes numeric-library scalars into native values
#[derive(Debug, Clone)]
pub struct Cleaner {
    flattener: Flattener,
}

impl Cleaner {
    pub fn new() -> Self {
        Cleaner {
            flattener: Flattener::new(FlattenConfig::with_separator(CLEAN_SEPARATOR)),
        }
    }

    /// Clean a nested mapping so that no boxed numeric values remain
    pub fn clean(&self, mapping: &Mapping) -> Result<FlatMap> {
        let mut flat = self.flattener.flatten(mapping)?;

        for (key, value) in flat.iter_mut() {
            let native = match value.as_scalar_extractable() {
                Some(boxed) => boxed.item().ok_or_else(|| Error::NotScalar {
                    key: key.to_string(),
                    len: boxed.element_count(),
                })?,
                None => continue,
            };
            *value = Value::from(native);
        }

        Ok(flat)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Cleaner::new()
    }
}

/// Flatten `mapping` with `/` and unbox every boxed numeric leaf
pub fn clean(mapping: &Mapping) -> Result<FlatMap> {
    Cleaner::new().clean(mapping)
}
