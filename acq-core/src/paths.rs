use crate::error::{AcqError, Result};
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "acq";
pub const EXPORT_EXTENSION: &str = "csv";

/// Only containers carrying the `.acq` extension are accepted.
pub fn check_source(path: &Path) -> Result<()> {
    let ok = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(SOURCE_EXTENSION));
    if ok {
        Ok(())
    } else {
        Err(AcqError::InvalidSourceExtension(path.to_path_buf()))
    }
}

/// Append `.csv` unless the destination already ends with it.
pub fn export_path(dest: &Path) -> PathBuf {
    if dest
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(EXPORT_EXTENSION))
    {
        return dest.to_path_buf();
    }
    let mut s = dest.as_os_str().to_owned();
    s.push(".");
    s.push(EXPORT_EXTENSION);
    PathBuf::from(s)
}
