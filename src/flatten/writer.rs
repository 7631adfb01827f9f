use crate::encode::encode_mapping;
use crate::flatten::types::FlatMap;
use anyhow::{Context, Result};
use std::io::Write;

/// Writes flat mappings as JSON, one object per line unless pretty-printing
pub struct FlatWriter<W: Write> {
    writer: W,
    pretty: bool,
    written: usize,
}

impl<W: Write> FlatWriter<W> {
    pub fn new(writer: W) -> Self {
        FlatWriter {
            writer,
            pretty: false,
            written: 0,
        }
    }

    /// Indent each record (the output is then no longer JSON Lines)
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write_record(&mut self, record: &FlatMap) -> Result<()> {
        let obj = encode_mapping(record).context("Failed to encode flat record")?;
        let json = if self.pretty {
            serde_json::to_string_pretty(&obj)
        } else {
            serde_json::to_string(&obj)
        }
        .context("Failed to serialize flat record")?;

        writeln!(self.writer, "{}", json).context("Failed to write flat record")?;
        self.written += 1;
        Ok(())
    }

    pub fn write_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a FlatMap>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Extension, Numeric, Value};

    #[derive(Debug)]
    struct Unencodable;

    impl Extension for Unencodable {
        fn type_name(&self) -> &str {
            "unencodable"
        }
    }

    #[test]
    fn test_writes_json_lines() {
        let mut buffer = Vec::new();
        {
            let mut writer = FlatWriter::new(&mut buffer);

            let mut first = FlatMap::new();
            first.insert("model.name", "ffn");
            first.insert("model.layers", Numeric::Integer(2));
            let mut second = FlatMap::new();
            second.insert("lr", 0.01);

            writer.write_records([&first, &second]).unwrap();
            assert_eq!(writer.written(), 2);
            writer.flush().unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec![r#"{"model.name":"ffn","model.layers":2}"#, r#"{"lr":0.01}"#]);
    }

    #[test]
    fn test_unencodable_record_fails() {
        let mut buffer = Vec::new();
        let mut writer = FlatWriter::new(&mut buffer);

        let mut record = FlatMap::new();
        record.insert("handle", Value::extension(Unencodable));

        let err = writer.write_record(&record).unwrap_err();
        assert!(format!("{:#}", err).contains("not JSON serializable"));
        assert_eq!(writer.written(), 0);
    }
}
