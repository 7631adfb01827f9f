//! Small helpers used around experiment runs: output-directory cleanup,
//! argument snapshots and cyclic sampling.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Remove a file, a symlink or a whole directory tree
///
/// Failures are logged and swallowed; errors inside a directory tree are
/// ignored altogether.
pub fn rm_file_or_dir<P: AsRef<Path>>(path: P) {
    let path = path.as_ref();

    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            let _ = fs::remove_dir_all(path);
            Ok(())
        }
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        log::warn!("Failed to delete {}. Reason: {}", path.display(), e);
    }
}

/// Remove every entry inside `path`, keeping the directory itself
pub fn clear_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let entries = fs::read_dir(path)
        .with_context(|| format!("Failed to list directory: {}", path.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", path.display()))?;
        rm_file_or_dir(entry.path());
    }

    log::debug!("cleared {}", path.display());
    Ok(())
}

/// Save run arguments as JSON with sorted keys and 4-space indentation
pub fn save_args<T: Serialize, P: AsRef<Path>>(args: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let value = serde_json::to_value(args).context("Failed to serialize arguments")?;

    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let mut ser = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    sort_keys(value)
        .serialize(&mut ser)
        .context("Failed to write arguments")?;
    writer.flush().context("Failed to flush arguments file")?;

    Ok(())
}

fn sort_keys(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(obj) => {
            let mut entries: Vec<(String, JsonValue)> = obj.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            JsonValue::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        JsonValue::Array(arr) => JsonValue::Array(arr.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// The first `n` items of `items` repeated endlessly
pub fn take_n_cycle<I>(items: I, n: usize) -> Vec<I::Item>
where
    I: IntoIterator,
    I::IntoIter: Clone,
{
    items.into_iter().cycle().take(n).collect()
}
