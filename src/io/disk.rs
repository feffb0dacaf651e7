//! Durable write primitive
//!
//! The probe measures persisted-write latency, so every write must reach
//! stable storage before it returns. `FsStorage` writes zero-filled data
//! and forces it out with `sync_all` (fsync).

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::WRITE_CHUNK_SIZE;

/// Storage under test, as seen by the prober
pub trait ProbeStorage {
    /// Write exactly `len` zero bytes to `path` and force them to stable
    /// storage before returning.
    fn write_durable(&self, path: &Path, len: u64) -> io::Result<()>;
}

/// Real-filesystem storage
#[derive(Debug, Clone, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ProbeStorage for FsStorage {
    fn write_durable(&self, path: &Path, len: u64) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let chunk = vec![0u8; WRITE_CHUNK_SIZE.min(len.max(1) as usize)];
        let mut remaining = len;

        while remaining > 0 {
            let take = chunk.len().min(remaining as usize);
            file.write_all(&chunk[..take])?;
            remaining -= take as u64;
        }

        // Force data to stable storage before the caller's clock stops
        file.sync_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_durable_exact_size() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("probe.dat");

        FsStorage::new().write_durable(&path, 4096).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
    }

    #[test]
    fn test_write_durable_larger_than_chunk() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("probe.dat");
        let len = (WRITE_CHUNK_SIZE as u64) * 2 + 123;

        FsStorage::new().write_durable(&path, len).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), len);
    }

    #[test]
    fn test_write_durable_truncates_previous_content() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("probe.dat");

        std::fs::write(&path, vec![1u8; 8192]).unwrap();
        FsStorage::new().write_durable(&path, 16).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 16);
    }

    #[test]
    fn test_write_durable_missing_directory_fails() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("probe.dat");

        assert!(FsStorage::new().write_durable(&path, 16).is_err());
    }
}
