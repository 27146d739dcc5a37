use crate::error::Result;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{info, warn};

fn parent_dir(dest: &Path) -> &Path {
    match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Outputs of one run, each written to a temporary next to its destination
/// and renamed into place together by [`StagedOutputs::commit`]. Dropping an
/// uncommitted set removes every temporary.
#[derive(Default)]
pub struct StagedOutputs {
    files: Vec<(NamedTempFile, PathBuf)>,
}

impl StagedOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the content for `dest`. `write` gets the temporary's path and an
    /// open handle; writers that pick a format by extension can use the path,
    /// since the temporary keeps the destination's extension.
    pub fn stage<F>(&mut self, dest: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&Path, &mut File) -> Result<()>,
    {
        let suffix = dest
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let mut tmp = Builder::new()
            .prefix(".acq-stage-")
            .suffix(&suffix)
            .tempfile_in(parent_dir(dest))?;
        let path = tmp.path().to_path_buf();
        write(&path, tmp.as_file_mut())?;
        tmp.as_file().sync_all()?;
        self.files.push((tmp, dest.to_path_buf()));
        Ok(())
    }

    pub fn destinations(&self) -> impl Iterator<Item = &Path> + '_ {
        self.files.iter().map(|(_, d)| d.as_path())
    }

    /// Rename every staged file into place, in staging order. If one rename
    /// fails, the outputs already placed by this call are removed again.
    pub fn commit(self) -> Result<Vec<PathBuf>> {
        let mut placed: Vec<PathBuf> = Vec::with_capacity(self.files.len());
        for (tmp, dest) in self.files {
            if let Err(e) = tmp.persist(&dest) {
                for p in &placed {
                    if let Err(err) = std::fs::remove_file(p) {
                        warn!(path = %p.display(), error = %err, "could not roll back output");
                    }
                }
                return Err(e.error.into());
            }
            info!(path = %dest.display(), "wrote output");
            placed.push(dest);
        }
        Ok(placed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn commit_replaces_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.csv");
        std::fs::write(&dest, "stale").unwrap();

        let mut staged = StagedOutputs::new();
        staged
            .stage(&dest, |_, f| Ok(f.write_all(b"fresh\n")?))
            .unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "stale");

        assert_eq!(staged.commit().unwrap(), [dest.clone()]);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "fresh\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn temporary_keeps_destination_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedOutputs::new();
        staged
            .stage(&dir.path().join("run.SAP.png"), |tmp, _| {
                assert_eq!(tmp.extension().unwrap(), "png");
                assert_eq!(tmp.parent().unwrap(), dir.path());
                Ok(())
            })
            .unwrap();
        assert_eq!(
            staged.destinations().collect::<Vec<_>>(),
            [dir.path().join("run.SAP.png").as_path()]
        );
    }

    #[test]
    fn failed_stage_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("out.csv");
        let mut staged = StagedOutputs::new();
        staged.stage(&csv, |_, f| Ok(f.write_all(b"a\n")?)).unwrap();
        let missing = dir.path().join("no-such-dir").join("r.json");
        assert!(staged.stage(&missing, |_, _| Ok(())).is_err());
        drop(staged);
        assert!(!csv.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failing_writer_aborts_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut staged = StagedOutputs::new();
        let err = staged.stage(&dir.path().join("x.csv"), |_, _| {
            Err(std::io::Error::other("disk full").into())
        });
        assert!(err.is_err());
        assert_eq!(staged.destinations().count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn commit_rolls_back_placed_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let blocked = dir.path().join("b.json");
        let mut staged = StagedOutputs::new();
        staged.stage(&first, |_, f| Ok(f.write_all(b"a")?)).unwrap();
        staged.stage(&blocked, |_, f| Ok(f.write_all(b"b")?)).unwrap();
        // a non-empty directory at the destination makes the rename fail
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), "x").unwrap();

        assert!(staged.commit().is_err());
        assert!(!first.exists());
        assert!(blocked.join("keep").exists());
    }
}
