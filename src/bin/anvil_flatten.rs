//! anvil-flatten: Flatten nested JSON records into path-keyed objects
//!
//! Usage:
//!   # Read from file, output to stdout
//!   anvil-flatten config.json
//!
//!   # Read from stdin with a custom separator
//!   echo '{"model": {"depth": 3}}' | anvil-flatten --separator /
//!
//!   # Process NDJSON, unboxing numerics the way experiment trackers expect
//!   anvil-flatten --ndjson --clean runs.jsonl

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anvil::flatten::{flatten_reader, Cleaner, CollisionPolicy, FlatWriter, FlattenConfig, Flattener, RecordMode};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, Read};

#[derive(Parser, Debug)]
#[command(name = "anvil-flatten")]
#[command(about = "Flatten nested JSON records into path-keyed objects", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one JSON object per line)
    #[arg(long)]
    ndjson: bool,

    /// Separator joining key paths (default: ".")
    #[arg(long)]
    separator: Option<String>,

    /// Keep lists as values instead of flattening them by index
    #[arg(long)]
    no_flatten_lists: bool,

    /// Let a later leaf overwrite an earlier one with the same flattened key
    #[arg(long)]
    allow_collisions: bool,

    /// Maximum nesting depth to accept
    #[arg(long)]
    max_depth: Option<usize>,

    /// Flatten with "/" and unbox numeric scalars (ignores --separator)
    #[arg(long, conflicts_with = "separator")]
    clean: bool,

    /// Pretty-print each flattened record
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Build config
    let mut config = FlattenConfig::default();
    if let Some(sep) = args.separator {
        config.separator = sep;
    }
    if args.no_flatten_lists {
        config.flatten_sequences = false;
    }
    if args.allow_collisions {
        config.on_collision = CollisionPolicy::LastWins;
    }
    config.max_depth = args.max_depth;

    let mode = if args.clean {
        RecordMode::Clean(Cleaner::new())
    } else {
        RecordMode::Flatten(Flattener::new(config))
    };

    let reader = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).with_context(|| format!("Failed to open file: {}", file_path))?,
        )) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };

    let mut writer = FlatWriter::new(std::io::stdout().lock()).pretty(args.pretty);
    let count = flatten_reader(reader, &mut writer, &mode, args.ndjson)?;
    writer.flush()?;

    if count == 0 {
        log::warn!("No JSON objects found in input");
    } else {
        log::info!("flattened {} records", count);
    }

    Ok(())
}
