//! Directory-backed key-value store
//!
//! Each key is a `<key>.json` file. Writes land in a sibling temporary file
//! that is renamed over the target, so a reader never sees a partial value.

use crate::core::error::StorageError;
use crate::core::storage::KeyValueStore;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File-per-key [`KeyValueStore`] rooted at a directory
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Use `dir` as the store root; it is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_reads_none() {
        let temp_dir = TempDir::new().unwrap();
        let kv = FileKv::new(temp_dir.path().join("data"));
        assert_eq!(kv.get("grades").unwrap(), None);
    }

    #[test]
    fn test_set_creates_directory_and_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut kv = FileKv::new(temp_dir.path().join("nested").join("data"));

        kv.set("grades", "[]").unwrap();

        assert!(kv.path_for("grades").exists());
        assert!(!kv.dir().join("grades.json.tmp").exists());
        assert_eq!(kv.get("grades").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_set_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let mut kv = FileKv::new(temp_dir.path());
        kv.set("k", "old").unwrap();
        kv.set("k", "new").unwrap();
        assert_eq!(kv.get("k").unwrap(), Some("new".to_string()));
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let mut kv = FileKv::new(temp_dir.path());
        assert!(kv.remove("absent").is_ok());

        kv.set("k", "v").unwrap();
        kv.remove("k").unwrap();
        assert_eq!(kv.get("k").unwrap(), None);
    }
}
