//! Staging Area
//!
//! Per-repository working directories for downloaded snapshots. Each
//! repository gets `<root>/<owner>__<name>`, which is removed once its scan
//! finishes unless files are being kept.

use super::error::{ScanError, ScanResult};
use super::types::RepositoryRef;
use std::path::{Path, PathBuf};

/// Root under which per-repository staging directories are created
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    /// Whether to keep files after processing
    keep_files: bool,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>, keep_files: bool) -> Self {
        Self {
            root: root.into(),
            keep_files,
        }
    }

    pub fn path_for(&self, repo: &RepositoryRef) -> PathBuf {
        self.root.join(repo.staging_key())
    }

    /// Create a fresh staging directory for `repo`, replacing leftovers from earlier runs
    pub fn prepare(&self, repo: &RepositoryRef) -> ScanResult<StagingDir> {
        let path = self.path_for(repo);

        if path.exists() {
            if !path.is_dir() {
                return Err(ScanError::StagingConflict(path));
            }
            log::debug!("Removing stale staging directory {}", path.display());
            std::fs::remove_dir_all(&path)?;
        }
        std::fs::create_dir_all(&path)?;

        Ok(StagingDir {
            path,
            keep_files: self.keep_files,
            released: false,
        })
    }
}

/// A repository's staging directory, removed on cleanup or drop
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    keep_files: bool,
    released: bool,
}

impl StagingDir {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory now (no-op when keeping files)
    pub fn cleanup(mut self) -> ScanResult<()> {
        self.released = true;
        self.remove()
    }

    fn remove(&self) -> ScanResult<()> {
        if !self.keep_files && self.path.exists() {
            std::fs::remove_dir_all(&self.path)?;
        }
        Ok(())
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.released {
            // Best effort cleanup on drop
            let _ = self.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo/demo", "main")
    }

    #[test]
    fn test_prepare_creates_per_repository_dir() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::new(temp.path(), false);

        let staging = area.prepare(&repo()).unwrap();

        assert_eq!(staging.path(), temp.path().join("octo__demo"));
        assert!(staging.path().is_dir());
    }

    #[test]
    fn test_prepare_replaces_stale_content() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::new(temp.path(), false);
        let stale = area.path_for(&repo());
        std::fs::create_dir_all(&stale).unwrap();
        std::fs::write(stale.join("old.txt"), "old").unwrap();

        let staging = area.prepare(&repo()).unwrap();

        assert!(staging.path().exists());
        assert!(!staging.path().join("old.txt").exists());
    }

    #[test]
    fn test_prepare_rejects_file_in_the_way() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::new(temp.path(), false);
        std::fs::write(area.path_for(&repo()), "not a dir").unwrap();

        let result = area.prepare(&repo());
        assert!(matches!(result, Err(ScanError::StagingConflict(_))));
    }

    #[test]
    fn test_cleanup_removes_directory() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::new(temp.path(), false);
        let staging = area.prepare(&repo()).unwrap();
        let path = staging.path().to_path_buf();

        staging.cleanup().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_cleanup_with_keep_files() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::new(temp.path(), true);
        let staging = area.prepare(&repo()).unwrap();
        let path = staging.path().to_path_buf();

        staging.cleanup().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_drop_cleanup() {
        let temp = TempDir::new().unwrap();
        let area = StagingArea::new(temp.path(), false);

        let path = {
            let staging = area.prepare(&repo()).unwrap();
            staging.path().to_path_buf()
        }; // staging drops here

        assert!(!path.exists());
    }
}
