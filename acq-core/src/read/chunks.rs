use crate::container::extent::DecodableExtent;
use crate::error::{AcqError, Result};
use crate::source::RecordSource;

/// Sequential, record-aligned reads over a decodable extent. Every chunk is a
/// whole number of records, so no record ever straddles two chunks.
pub struct RecordChunks<'a> {
    src: &'a dyn RecordSource,
    pos: u64,
    end: u64,
    chunk_bytes: u64,
}

impl<'a> RecordChunks<'a> {
    /// `chunk_records == 0` reads the whole extent in one go.
    pub fn new(src: &'a dyn RecordSource, ext: &DecodableExtent, chunk_records: usize) -> Result<Self> {
        if ext.end() > src.size() {
            return Err(AcqError::Invariant(format!(
                "extent ends at {} but source has {} bytes",
                ext.end(),
                src.size()
            )));
        }
        let chunk_bytes = if chunk_records == 0 {
            ext.byte_len
        } else {
            (chunk_records as u64).saturating_mul(ext.stride)
        };
        Ok(Self {
            src,
            pos: ext.data_start,
            end: ext.end(),
            chunk_bytes,
        })
    }

    pub fn chunk_bytes(&self) -> u64 {
        self.chunk_bytes
    }
}

impl Iterator for RecordChunks<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let len = self.chunk_bytes.min(self.end - self.pos);
        let len = match usize::try_from(len) {
            Ok(l) => l,
            Err(_) => {
                self.pos = self.end;
                return Some(Err(AcqError::Invariant(format!(
                    "chunk of {len} bytes does not fit in memory"
                ))));
            }
        };
        let out = self.src.read_at(self.pos, len);
        // a failed read is fatal to the run; stop iterating after reporting it
        self.pos = if out.is_ok() { self.pos + len as u64 } else { self.end };
        Some(out)
    }
}
