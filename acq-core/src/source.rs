// acq_core/src/source.rs
use crate::error::Result;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct OpenParams {
    pub source_path: PathBuf,
}

/// Random-access view of a (possibly damaged) container.
pub trait RecordSource: Send + Sync {
    /// Total size in bytes, as probed when the source was opened.
    fn size(&self) -> u64;

    /// Read exactly `len` bytes at `offset`. Fails if the range runs past the
    /// end of the source.
    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>>;
}

/// In-memory source, for buffers that are already loaded.
pub struct MemSource {
    bytes: Vec<u8>,
}

impl MemSource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl RecordSource for MemSource {
    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let start = usize::try_from(offset).map_err(|_| out_of_range(offset, len, self.size()))?;
        let end = start
            .checked_add(len)
            .filter(|&e| e <= self.bytes.len())
            .ok_or_else(|| out_of_range(offset, len, self.size()))?;
        Ok(self.bytes[start..end].to_vec())
    }
}

pub(crate) fn out_of_range(offset: u64, len: usize, size: u64) -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::UnexpectedEof,
        format!("read of {len} bytes at {offset} exceeds source size {size}"),
    )
}
