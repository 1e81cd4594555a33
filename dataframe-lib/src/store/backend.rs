//! Persistence adapters for [`Store`](super::Store).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use dashmap::DashMap;

use crate::error::StoreError;

/// Where a store keeps its encoded state between mounts.
///
/// Backends deal in opaque bytes keyed by store name; encoding is the
/// store's job.
pub trait StoreBackend {
    /// Returns the saved bytes, or `None` if nothing was saved under `key`.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    fn save(&self, key: &str, data: &[u8]) -> Result<(), StoreError>;

    /// Forgets `key`. Removing a key that was never saved is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Keeps saved state in memory for the life of the backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StoreBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Writes each store to `<dir>/<key>.bin`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Uses `dir`, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.bin"))
    }
}

impl StoreBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path(key);
        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.load("cart").unwrap(), None);

        backend.save("cart", b"abc").unwrap();
        assert_eq!(backend.load("cart").unwrap(), Some(b"abc".to_vec()));

        backend.remove("cart").unwrap();
        backend.remove("cart").unwrap();
        assert!(backend.is_empty());
    }

    #[test]
    fn test_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("state")).unwrap();
        assert_eq!(backend.load("quote").unwrap(), None);

        backend.save("quote", &[1, 2, 3]).unwrap();
        assert!(backend.dir().join("quote.bin").exists());
        assert_eq!(backend.load("quote").unwrap(), Some(vec![1, 2, 3]));

        backend.remove("quote").unwrap();
        assert_eq!(backend.load("quote").unwrap(), None);
    }
}
