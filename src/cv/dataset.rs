use crate::cv::types::{CvSplit, TimeSeriesEntry};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A dataset stored locally in the GluonTS layout
///
/// ```text
/// <dir>/metadata.json      {"freq": "1B", ...}
/// <dir>/train/data.json    one series per line
/// <dir>/test/data.json     one series per line
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    pub freq: String,
    pub train: Vec<TimeSeriesEntry>,
    pub test: Vec<TimeSeriesEntry>,
}

#[derive(Deserialize)]
struct Metadata {
    freq: String,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        let metadata_path = dir.join("metadata.json");
        let metadata: Metadata = serde_json::from_reader(BufReader::new(
            File::open(&metadata_path)
                .with_context(|| format!("Failed to open file: {}", metadata_path.display()))?,
        ))
        .with_context(|| format!("Failed to parse metadata: {}", metadata_path.display()))?;

        let train = read_entries(&dir.join("train").join("data.json"))?;
        let test = read_entries(&dir.join("test").join("data.json"))?;

        log::info!(
            "loaded {} train and {} test series from {}",
            train.len(),
            test.len(),
            dir.display()
        );

        Ok(Dataset {
            freq: metadata.freq,
            train,
            test,
        })
    }
}

/// Read JSON Lines of series, skipping blank lines
fn read_entries(path: &Path) -> Result<Vec<TimeSeriesEntry>> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let mut entries = Vec::new();
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: TimeSeriesEntry = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse series at {}:{}", path.display(), lineno + 1))?;
        entries.push(entry);
    }
    Ok(entries)
}

impl CvSplit {
    /// Write the split to `<dir>/<name>_data.json`, returning the path written
    pub fn save<P: AsRef<Path>>(&self, dir: P, name: &str) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).context("Failed to create output directory")?;

        let path = dir.join(format!("{}_data.json", name));
        let file = File::create(&path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).context("Failed to serialize split")?;
        writer.flush().context("Failed to flush writer")?;

        Ok(path)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse split: {}", path.display()))
    }
}
