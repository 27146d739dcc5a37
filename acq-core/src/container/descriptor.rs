use crate::error::{FormatError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Sample encodings the salvage path understands. Both are little-endian on
/// disk regardless of host byte order.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Encoding {
    Int16Le = 0,
    Float64Le = 1,
}

impl Encoding {
    /// Byte width of one sample. A pure function of the encoding.
    pub const fn width(self) -> usize {
        match self {
            Encoding::Int16Le => 2,
            Encoding::Float64Le => 8,
        }
    }

    /// Parse a declared encoding tag. Accepts the descriptive names and the
    /// numpy-style dtype strings found in exported channel tables.
    pub fn from_tag(channel: usize, tag: &str) -> Result<Self> {
        match tag.trim() {
            "Int16LE" | "int16le" | "<i2" => Ok(Encoding::Int16Le),
            "Float64LE" | "float64le" | "<f8" => Ok(Encoding::Float64Le),
            other => Err(FormatError::UnsupportedEncoding {
                channel,
                encoding: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Int16Le => f.write_str("Int16LE"),
            Encoding::Float64Le => f.write_str("Float64LE"),
        }
    }
}

/// Static metadata for one channel, taken from the intact leading section of
/// the container. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelDescriptor {
    pub index: usize,
    pub name: String,
    pub encoding: Encoding,
    /// Position of this channel's entry in the file's channel table.
    pub header_offset: u64,
    pub scale: f64,
    pub offset: f64,
    pub samples_per_second: f64,
}

impl ChannelDescriptor {
    #[inline]
    pub fn width(&self) -> usize {
        self.encoding.width()
    }
}

/// Ordered channel descriptors plus the stride the metadata itself reports,
/// kept separately so the layout calculator can cross-check it.
#[derive(Clone, Debug)]
pub struct DescriptorTable {
    channels: Vec<ChannelDescriptor>,
    reported_stride: u64,
}

impl DescriptorTable {
    /// Build a table from descriptors in ascending index order.
    ///
    /// `reported_stride` is the sum of per-channel sample sizes as read from
    /// the channel headers, independent of the declared encodings.
    pub fn new(channels: Vec<ChannelDescriptor>, reported_stride: u64) -> Result<Self> {
        if channels.is_empty() {
            return Err(FormatError::NoChannels.into());
        }
        let mut seen = HashSet::with_capacity(channels.len());
        for (i, ch) in channels.iter().enumerate() {
            if ch.index != i {
                return Err(crate::error::AcqError::Manifest(format!(
                    "channel `{}` has index {} at position {i}",
                    ch.name, ch.index
                )));
            }
            if !seen.insert(ch.name.as_str()) {
                return Err(FormatError::DuplicateChannel(ch.name.clone()).into());
            }
        }
        let rate = channels[0].samples_per_second;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(FormatError::InvalidSampleRate { channel: 0, rate }.into());
        }
        Ok(Self {
            channels,
            reported_stride,
        })
    }

    pub fn channels(&self) -> &[ChannelDescriptor] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn reported_stride(&self) -> u64 {
        self.reported_stride
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Sampling rate of channel 0; the time base of the recovered table.
    pub fn base_rate(&self) -> f64 {
        self.channels[0].samples_per_second
    }
}
