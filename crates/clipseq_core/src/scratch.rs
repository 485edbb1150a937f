//! Per-run scratch directory.
//!
//! Holds generated silence and the concat manifest. The directory is only
//! created on first use and is removed when the area is closed or dropped,
//! whichever comes first.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Exclusive working directory of one run: `<base>/run-<run_id>`.
#[derive(Debug)]
pub struct ScratchArea {
    path: PathBuf,
    /// Set once we created (or tried to create) the directory.
    touched: bool,
}

impl ScratchArea {
    pub fn new(base: &Path, run_id: &str) -> Self {
        Self {
            path: base.join(format!("run-{}", run_id)),
            touched: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the directory (and parents) if missing.
    pub fn ensure(&mut self) -> io::Result<&Path> {
        self.touched = true;
        fs::create_dir_all(&self.path)?;
        Ok(&self.path)
    }

    /// Path of a file inside the area. Does not create anything.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Remove the directory, reporting failures to the caller.
    pub fn close(mut self) -> io::Result<()> {
        self.remove()
    }

    fn remove(&mut self) -> io::Result<()> {
        if !self.touched {
            return Ok(());
        }
        self.touched = false;
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {
                tracing::debug!("Removed scratch area {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        if let Err(e) = self.remove() {
            tracing::warn!(
                "Failed to remove scratch area {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn created_lazily() {
        let base = tempdir().unwrap();
        let mut scratch = ScratchArea::new(base.path(), "abc");

        assert_eq!(scratch.path(), base.path().join("run-abc"));
        assert!(!scratch.exists());

        scratch.ensure().unwrap();
        assert!(scratch.exists());
        assert_eq!(scratch.file("concat.txt"), base.path().join("run-abc/concat.txt"));
    }

    #[test]
    fn close_removes_contents() {
        let base = tempdir().unwrap();
        let mut scratch = ScratchArea::new(base.path(), "close");
        scratch.ensure().unwrap();
        fs::write(scratch.file("silence-1.mp3"), b"x").unwrap();
        let path = scratch.path().to_path_buf();

        scratch.close().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn drop_removes_directory() {
        let base = tempdir().unwrap();
        let path = {
            let mut scratch = ScratchArea::new(base.path(), "drop");
            scratch.ensure().unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn untouched_area_leaves_foreign_directory_alone() {
        let base = tempdir().unwrap();
        let foreign = base.path().join("run-same");
        fs::create_dir_all(&foreign).unwrap();

        ScratchArea::new(base.path(), "same").close().unwrap();
        assert!(foreign.exists());
    }

    #[test]
    fn distinct_runs_do_not_collide() {
        let base = tempdir().unwrap();
        let a = ScratchArea::new(base.path(), "one");
        let b = ScratchArea::new(base.path(), "two");
        assert_ne!(a.path(), b.path());
    }
}
