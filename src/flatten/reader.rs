use crate::flatten::clean::Cleaner;
use crate::flatten::flattener::Flattener;
use crate::flatten::types::FlatMap;
use crate::flatten::writer::FlatWriter;
use crate::value::{Mapping, Value};
use anyhow::{bail, Context, Result};
use std::io::{Read, Write};

/// How each record is turned into a flat map
#[derive(Debug, Clone)]
pub enum RecordMode {
    Flatten(Flattener),
    Clean(Cleaner),
}

impl RecordMode {
    pub fn apply(&self, record: serde_json::Value) -> Result<FlatMap> {
        let mapping = record_to_mapping(record)?;
        let flat = match self {
            RecordMode::Flatten(flattener) => flattener.flatten(&mapping)?,
            RecordMode::Clean(cleaner) => cleaner.clean(&mapping)?,
        };
        Ok(flat)
    }
}

/// Convert a parsed JSON record into a mapping, rejecting non-object records
pub fn record_to_mapping(record: serde_json::Value) -> Result<Mapping> {
    match Value::from(record) {
        Value::Mapping(mapping) => Ok(mapping),
        other => bail!("expected a JSON object record, got {}", other.type_name()),
    }
}

/// Read every record from `reader` and write its flat form
///
/// Unless `ndjson` is set, the whole input is first parsed as one document
/// with simd-json; a top-level array is treated as a stream of records.
/// Input simd-json rejects is retried one JSON value per line.
///
/// Returns the number of records written.
pub fn flatten_reader<R: Read, W: Write>(
    mut reader: R,
    writer: &mut FlatWriter<W>,
    mode: &RecordMode,
    ndjson: bool,
) -> Result<usize> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if !ndjson {
        // simd-json parses in place, keep the original bytes for the fallback
        let mut scratch = content.clone();
        match simd_json::serde::from_slice::<serde_json::Value>(&mut scratch) {
            Ok(serde_json::Value::Array(records)) => {
                let count = records.len();
                for (i, record) in records.into_iter().enumerate() {
                    let flat = mode
                        .apply(record)
                        .with_context(|| format!("Failed to flatten record {}", i))?;
                    writer.write_record(&flat)?;
                }
                return Ok(count);
            }
            Ok(record) => {
                writer.write_record(&mode.apply(record)?)?;
                return Ok(1);
            }
            Err(e) => {
                log::debug!("SIMD parse failed ({}), falling back to line-by-line parsing", e);
            }
        }
    }

    let content = std::str::from_utf8(&content).context("Input is not valid UTF-8")?;
    let mut count = 0;
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: serde_json::Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", lineno + 1))?;
        let flat = mode
            .apply(record)
            .with_context(|| format!("Failed to flatten record on line {}", lineno + 1))?;
        writer.write_record(&flat)?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::types::FlattenConfig;

    fn run(input: &[u8], mode: &RecordMode, ndjson: bool) -> Result<Vec<String>> {
        let mut buffer = Vec::new();
        let mut writer = FlatWriter::new(&mut buffer);
        let count = flatten_reader(input, &mut writer, mode, ndjson)?;
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<String> = output.lines().map(str::to_string).collect();
        assert_eq!(lines.len(), count);
        Ok(lines)
    }

    fn flatten_mode() -> RecordMode {
        RecordMode::Flatten(Flattener::new(FlattenConfig::default()))
    }

    #[test]
    fn test_document_keeps_key_order() {
        // Wide objects are where hash-ordered maps reorder keys
        let keys: Vec<String> = (0..40).rev().map(|i| format!("k{:02}", i)).collect();
        let body: Vec<String> = keys.iter().map(|k| format!("\"{}\": 1", k)).collect();
        let input = format!("{{\"cfg\": {{\n{}\n}}}}", body.join(",\n"));

        let lines = run(input.as_bytes(), &flatten_mode(), false).unwrap();
        assert_eq!(lines.len(), 1);

        let record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let got: Vec<&str> = record.as_object().unwrap().keys().map(String::as_str).collect();
        let want: Vec<String> = keys.iter().map(|k| format!("cfg.{}", k)).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn test_top_level_array_is_a_record_stream() {
        let input = br#"[{"a": {"b": 1}}, {"z": 2, "y": [3, 4]}]"#;

        let lines = run(input, &flatten_mode(), false).unwrap();
        assert_eq!(lines, vec![r#"{"a.b":1}"#, r#"{"z":2,"y.0":3,"y.1":4}"#]);
    }

    #[test]
    fn test_ndjson_input() {
        let input = b"{\"a\": {\"b\": 1}}\n\n{\"a\": {\"b\": 2}}\n";

        let lines = run(input, &flatten_mode(), true).unwrap();
        assert_eq!(lines, vec![r#"{"a.b":1}"#, r#"{"a.b":2}"#]);
    }

    #[test]
    fn test_clean_mode() {
        let input = br#"{"model": {"lr": 0.1, "layers": [2, 3]}}"#;

        let lines = run(input, &RecordMode::Clean(Cleaner::new()), false).unwrap();
        assert_eq!(lines, vec![r#"{"model/lr":0.1,"model/layers/0":2,"model/layers/1":3}"#]);
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let input = b"{\"a\": \"\xff\"}\n";

        for ndjson in [false, true] {
            let err = run(input, &flatten_mode(), ndjson).unwrap_err();
            assert!(format!("{:#}", err).contains("not valid UTF-8"));
        }
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        let err = run(b"[1, 2]", &flatten_mode(), false).unwrap_err();
        assert!(format!("{:#}", err).contains("record 0"));

        let err = run(b"\"text\"\n", &flatten_mode(), true).unwrap_err();
        assert!(format!("{:#}", err).contains("line 1"));
    }
}
