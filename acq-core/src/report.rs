use crate::container::descriptor::{DescriptorTable, Encoding};
use crate::container::extent::DecodableExtent;
use crate::container::layout::RecordLayout;
use crate::error::{AcqError, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Clone, Debug, Serialize)]
pub struct ChannelReport {
    pub name: String,
    pub encoding: Encoding,
    pub width: usize,
    /// Byte offset of the channel within a record.
    pub record_offset: usize,
    pub samples: u64,
}

/// What a recovery run salvaged and what it threw away.
#[derive(Clone, Debug, Serialize)]
pub struct SalvageReport {
    pub revision: Option<String>,
    pub channels: Vec<ChannelReport>,
    pub stride: u64,
    pub data_start: u64,
    pub file_size: u64,
    pub records: u64,
    pub dropped_tail_bytes: u64,
    /// blake3 of the exact decodable extent that was read (hex).
    pub extent_blake3: String,
    /// Unix seconds; zero for deterministic runs.
    pub recovered_at: i64,
}

impl SalvageReport {
    pub fn new(
        table: &DescriptorTable,
        layout: &RecordLayout,
        ext: &DecodableExtent,
        digest: blake3::Hash,
        recovered_at: i64,
    ) -> Self {
        let channels = table
            .channels()
            .iter()
            .zip(layout.spans())
            .map(|(c, s)| ChannelReport {
                name: c.name.clone(),
                encoding: c.encoding,
                width: s.width,
                record_offset: s.start,
                samples: ext.record_count,
            })
            .collect();
        Self {
            revision: None,
            channels,
            stride: ext.stride,
            data_start: ext.data_start,
            file_size: ext.file_size,
            records: ext.record_count,
            dropped_tail_bytes: ext.dropped_tail(),
            extent_blake3: digest.to_hex().to_string(),
            recovered_at,
        }
    }

    pub fn write_json(&self, w: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| AcqError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}
