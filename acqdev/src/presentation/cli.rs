use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Salvage channel data from a truncated .acq recording into CSV",
    long_about = None
)]
pub struct Cli {
    /// Damaged source recording (.acq)
    pub source: PathBuf,

    /// CSV destination; `.csv` is appended when missing
    pub dest: PathBuf,

    /// Layout manifest (JSON, or CBOR with a .cbor extension).
    /// Defaults to `<SOURCE>.layout.json`
    #[arg(long)]
    pub layout: Option<PathBuf>,

    /// Records per sequential read (0 = read the whole extent at once)
    #[arg(long, default_value_t = 0)]
    pub chunk_records: usize,

    /// Write a JSON salvage report to this path, committed together with the CSV
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Zero the report timestamp
    #[arg(long)]
    pub deterministic: bool,

    /// Resolve layout and extent, print them, and stop
    #[arg(long)]
    pub dry_run: bool,

    /// Read the whole source into memory before decoding
    #[arg(long)]
    pub in_memory: bool,

    /// Render this channel against time to `<DEST>.<CHANNEL>.png`
    #[cfg(feature = "plot")]
    #[arg(long)]
    pub plot: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
