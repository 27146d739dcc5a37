use std::path::PathBuf;
use thiserror::Error;

/// Problems with the container's layout metadata. All of them abort a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("channel {channel} declares unsupported encoding `{encoding}`")]
    UnsupportedEncoding { channel: usize, encoding: String },

    #[error("record stride mismatch: channel widths sum to {computed} bytes, metadata reports {reported}")]
    StrideMismatch { computed: u64, reported: u64 },

    #[error("no data: file size {file_size} does not exceed data section start {data_start}")]
    NoData { file_size: u64, data_start: u64 },

    #[error("channel {channel} header offset {header_offset} leaves no room for the data section")]
    HeaderOffsetOverflow { channel: usize, header_offset: u64 },

    #[error("channel table is empty")]
    NoChannels,

    #[error("duplicate channel name `{0}`")]
    DuplicateChannel(String),

    #[error("channel {channel} has invalid sampling rate {rate}")]
    InvalidSampleRate { channel: usize, rate: f64 },
}

#[derive(Error, Debug)]
pub enum AcqError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Layout manifest error: {0}")]
    Manifest(String),

    /// A length or alignment check that correct layout math can never trip.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    #[error("no such channel: {0}")]
    UnknownChannel(String),

    #[error("invalid source extension (expected .acq): {}", .0.display())]
    InvalidSourceExtension(PathBuf),
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, AcqError>;
