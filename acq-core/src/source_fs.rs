use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::sync::Mutex;

use crate::error::Result;
use crate::source::{OpenParams, RecordSource, out_of_range};
use tracing::debug;

pub struct FsRecordSource {
    f: Mutex<File>,
    size: u64,
}

impl FsRecordSource {
    pub fn new(params: OpenParams) -> Result<Self> {
        let mut f = File::open(&params.source_path)?;
        let size = f.seek(SeekFrom::End(0))?;
        debug!(path = %params.source_path.display(), size, "opened source");
        Ok(Self {
            f: Mutex::new(f),
            size,
        })
    }
}

impl RecordSource for FsRecordSource {
    fn size(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        if offset.saturating_add(len as u64) > self.size {
            return Err(out_of_range(offset, len, self.size).into());
        }
        let mut f = self
            .f
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        f.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        f.read_exact(&mut buf)?;
        Ok(buf)
    }
}
