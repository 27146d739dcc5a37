use crate::error::Result;
use crate::source::{MemSource, OpenParams, RecordSource};
use crate::source_fs::FsRecordSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// Positioned reads against the open file.
    #[default]
    Fs,
    /// Read the whole file up front and serve ranges from memory.
    Mem,
}

pub fn open_source(backend: Backend, p: OpenParams) -> Result<Box<dyn RecordSource>> {
    match backend {
        Backend::Fs => Ok(Box::new(FsRecordSource::new(p)?)),
        Backend::Mem => Ok(Box::new(MemSource::new(std::fs::read(&p.source_path)?))),
    }
}
