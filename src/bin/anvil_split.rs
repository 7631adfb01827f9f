//! anvil-split: Group an exchange-rate style dataset for temporal cross-validation
//!
//! Reads a local GluonTS-layout dataset directory, cuts the first series
//! into windows, groups them by series and checkpoint period and writes the
//! result as `<output-dir>/<file-name>_data.json`.
//!
//! Usage:
//!   anvil-split ./datasets/exchange_rate --seed 1 --output-dir ./dataset
//!
//!   # Custom periods, saving the arguments next to the split
//!   anvil-split ./datasets/exchange_rate --checkpoints 1995-01-01,2000-01-01 --save-args

use anvil::cv::{CvSplitter, Dataset, SplitConfig};
use anvil::utils::{clear_dir, save_args};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Serialize)]
#[command(name = "anvil-split")]
#[command(about = "Group a time-series dataset for temporal cross-validation", long_about = None)]
struct Args {
    /// Dataset directory (metadata.json, train/data.json, test/data.json)
    #[arg(value_name = "DIR")]
    dataset: PathBuf,

    /// Number of training series to use (default: 10)
    #[arg(long)]
    num_ts: Option<usize>,

    /// Total number of groups (default: num_ts * (checkpoints + 1))
    #[arg(long)]
    num_groups: Option<usize>,

    /// Context length of each window (default: 15)
    #[arg(long)]
    context_length: Option<usize>,

    /// Prediction length of each window, also the stride (default: 10)
    #[arg(long)]
    prediction_length: Option<usize>,

    /// Comma-separated checkpoint dates (default: 1994-01-01,1998-01-01,2002-01-01)
    #[arg(long)]
    checkpoints: Option<String>,

    /// Share of num_ts taken from the test split (default: 0.2)
    #[arg(long)]
    test_fraction: Option<f64>,

    /// Seed for shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(long, short = 'o', default_value = "dataset")]
    output_dir: PathBuf,

    /// Output file name prefix
    #[arg(long, default_value = "default")]
    file_name: String,

    /// Remove everything in the output directory first
    #[arg(long)]
    clear_output: bool,

    /// Also write the arguments to <file-name>_args.json
    #[arg(long)]
    save_args: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Build config
    let mut config = SplitConfig::default();
    if let Some(num_ts) = args.num_ts {
        config.num_ts = num_ts;
    }
    if let Some(num_groups) = args.num_groups {
        config.num_groups = Some(num_groups);
    }
    if let Some(context_length) = args.context_length {
        config.context_length = context_length;
    }
    if let Some(prediction_length) = args.prediction_length {
        config.prediction_length = prediction_length;
    }
    if let Some(dates) = &args.checkpoints {
        config.checkpoints = parse_checkpoints(dates)?;
    }
    if let Some(test_fraction) = args.test_fraction {
        config.test_fraction = test_fraction;
    }
    config.seed = args.seed;

    std::fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;
    if args.clear_output {
        clear_dir(&args.output_dir)?;
    }

    let dataset = Dataset::load(&args.dataset)?;
    let split = CvSplitter::new(config)
        .split(&dataset)
        .context("Failed to group dataset")?;

    let path = split.save(&args.output_dir, &args.file_name)?;
    log::info!(
        "wrote {} training, {} validation windows in {} groups to {}",
        split.whole_data.len(),
        split.val_data.len(),
        split.group_data.len(),
        path.display()
    );

    if args.save_args {
        let args_path = args.output_dir.join(format!("{}_args.json", args.file_name));
        save_args(&args, &args_path)?;
    }

    Ok(())
}

fn parse_checkpoints(dates: &str) -> Result<Vec<NaiveDate>> {
    dates
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid checkpoint date: {}", s))
        })
        .collect()
}
