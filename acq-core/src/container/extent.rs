use crate::container::layout::RecordLayout;
use crate::error::{AcqError, FormatError, Result};
use tracing::{debug, warn};

/// The whole-record prefix of the data section that is safe to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodableExtent {
    pub file_size: u64,
    pub data_start: u64,
    pub stride: u64,
    pub record_count: u64,
    /// `record_count * stride`; never more than `file_size - data_start`.
    pub byte_len: u64,
}

impl DecodableExtent {
    /// Bytes past the last whole record. They are never read.
    pub fn dropped_tail(&self) -> u64 {
        self.file_size - self.data_start - self.byte_len
    }

    /// Absolute file offset one past the last decodable byte.
    pub fn end(&self) -> u64 {
        self.data_start + self.byte_len
    }
}

/// Work out how many complete records survive in a file of `file_size` bytes.
///
/// A partial trailing record is dropped, not reported: the point is to salvage
/// every whole record, not to validate the file.
pub fn resolve_extent(file_size: u64, layout: &RecordLayout) -> Result<DecodableExtent> {
    let data_start = layout.data_start();
    if file_size <= data_start {
        return Err(FormatError::NoData {
            file_size,
            data_start,
        }
        .into());
    }
    let stride = layout.stride() as u64;
    if stride == 0 {
        return Err(AcqError::Invariant("record stride is zero".to_string()));
    }

    let available = file_size - data_start;
    let record_count = available / stride;
    let byte_len = record_count * stride;
    let ext = DecodableExtent {
        file_size,
        data_start,
        stride,
        record_count,
        byte_len,
    };

    debug!(file_size, data_start, stride, record_count, "decodable extent");
    if ext.dropped_tail() > 0 {
        warn!(
            dropped = ext.dropped_tail(),
            "discarding partial trailing record"
        );
    }
    Ok(ext)
}
