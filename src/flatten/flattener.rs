use crate::error::{Error, Result};
use crate::flatten::types::{CollisionPolicy, FlatMap, FlattenConfig};
use crate::value::{Mapping, Value};

/// The core flattener that turns nested mappings into path-keyed flat mappings
#[derive(Debug, Clone, Default)]
pub struct Flattener {
    config: FlattenConfig,
}

impl Flattener {
    pub fn new(config: FlattenConfig) -> Self {
        Flattener { config }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten a nested mapping into a flat mapping
    pub fn flatten(&self, mapping: &Mapping) -> Result<FlatMap> {
        self.flatten_with_prefix(mapping, "")
    }

    /// Flatten a nested mapping, prepending `prefix` to every generated key
    pub fn flatten_with_prefix(&self, mapping: &Mapping, prefix: &str) -> Result<FlatMap> {
        let mut flat = FlatMap::with_capacity(mapping.len());
        self.flatten_mapping(mapping, prefix, 0, &mut flat)?;
        Ok(flat)
    }

    /// Flatten without recursion, for inputs nested deeper than the call stack allows
    ///
    /// Produces exactly the same keys, values and ordering as [`Flattener::flatten`].
    pub fn flatten_iterative(&self, mapping: &Mapping) -> Result<FlatMap> {
        let mut flat = FlatMap::with_capacity(mapping.len());

        // Children are pushed in reverse so they pop in iteration order
        let mut stack: Vec<(String, &Value, usize)> = mapping
            .iter()
            .rev()
            .map(|(key, value)| (key.to_string(), value, 0))
            .collect();

        while let Some((key, value, depth)) = stack.pop() {
            match value {
                Value::Mapping(nested) => {
                    self.check_depth(&key, depth + 1)?;
                    stack.extend(
                        nested
                            .iter()
                            .rev()
                            .map(|(k, v)| (self.join(&key, k), v, depth + 1)),
                    );
                }
                Value::Sequence(items) if self.config.flatten_sequences => {
                    self.check_depth(&key, depth + 1)?;
                    stack.extend(
                        items
                            .iter()
                            .enumerate()
                            .rev()
                            .map(|(idx, v)| (self.join(&key, &idx.to_string()), v, depth + 1)),
                    );
                }
                _ => self.emit(key, value, &mut flat)?,
            }
        }

        Ok(flat)
    }

    /// Recursively flatten every entry of a mapping under `prefix`
    fn flatten_mapping(
        &self,
        mapping: &Mapping,
        prefix: &str,
        depth: usize,
        flat: &mut FlatMap,
    ) -> Result<()> {
        for (key, value) in mapping.iter() {
            let composite_key = self.join(prefix, key);
            self.flatten_value(value, composite_key, depth, flat)?;
        }
        Ok(())
    }

    /// Flatten one value already positioned at `key`
    fn flatten_value(
        &self,
        value: &Value,
        key: String,
        depth: usize,
        flat: &mut FlatMap,
    ) -> Result<()> {
        match value {
            Value::Mapping(nested) => {
                self.check_depth(&key, depth + 1)?;
                self.flatten_mapping(nested, &key, depth + 1, flat)
            }
            Value::Sequence(items) if self.config.flatten_sequences => {
                self.check_depth(&key, depth + 1)?;
                // Each element behaves like the single-entry mapping {index: element}
                for (idx, item) in items.iter().enumerate() {
                    let composite_key = self.join(&key, &idx.to_string());
                    self.flatten_value(item, composite_key, depth + 1, flat)?;
                }
                Ok(())
            }
            _ => self.emit(key, value, flat),
        }
    }

    fn join(&self, prefix: &str, key: &str) -> String {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", prefix, self.config.separator, key)
        }
    }

    fn check_depth(&self, key: &str, depth: usize) -> Result<()> {
        match self.config.max_depth {
            Some(max_depth) if depth > max_depth => Err(Error::DepthExceeded {
                key: key.to_string(),
                max_depth,
            }),
            _ => Ok(()),
        }
    }

    /// Emit a terminal entry, enforcing the collision policy
    fn emit(&self, key: String, value: &Value, flat: &mut FlatMap) -> Result<()> {
        if flat.contains_key(&key) {
            match self.config.on_collision {
                CollisionPolicy::Error => return Err(Error::AmbiguousKey { key }),
                CollisionPolicy::LastWins => {
                    log::debug!("composite key '{}' produced twice, keeping the later leaf", key);
                }
            }
        }
        flat.insert(key, value.clone());
        Ok(())
    }
}

/// Flatten `mapping` with the given configuration
pub fn flatten(mapping: &Mapping, config: &FlattenConfig) -> Result<FlatMap> {
    Flattener::new(config.clone()).flatten(mapping)
}
