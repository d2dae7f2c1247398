//! Storage abstraction for index directories.
//!
//! An index directory is a flat set of named files: the bound schema, one segment per
//! committed generation and the commit metadata. The [`Storage`] trait hides whether
//! those files live on disk or in memory, so the index code is identical for both.
//!
//! # Storage Types
//!
//! ## FileStorage
//! - Disk-based persistent storage rooted at a directory
//! - Optional `fsync` on close of every written file
//!
//! ## MemoryStorage
//! - In-memory storage for tests and throwaway indexes
//!
//! # Example
//!
//! ```
//! use wolfsearch::storage::{StorageConfig, StorageFactory};
//! use wolfsearch::storage::memory::MemoryStorageConfig;
//!
//! # fn main() -> wolfsearch::error::Result<()> {
//! let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default()))?;
//! storage.write_atomic("meta.json", b"{}")?;
//! assert_eq!(storage.read_all("meta.json")?, b"{}");
//! # Ok(())
//! # }
//! ```

use std::io::{Read, Seek, Write};
use std::sync::Arc;

use crate::error::{Result, WolfError};

pub mod file;
pub mod memory;

/// A backend that stores named files.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open an existing file for reading; fails if it does not exist.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create a file for writing, truncating any previous content.
    ///
    /// The content becomes visible under `name` once the output is closed.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    fn file_exists(&self, name: &str) -> bool;

    /// Delete a file. Deleting a missing file is not an error.
    fn delete_file(&self, name: &str) -> Result<()>;

    /// Names of all files, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Atomically replace `new_name` with `old_name`.
    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()>;

    /// Create a uniquely named temporary file starting with `prefix`.
    fn create_temp_output(&self, prefix: &str) -> Result<(String, Box<dyn StorageOutput>)> {
        let temp_name = format!("{prefix}.{}.tmp", uuid::Uuid::new_v4().simple());
        let output = self.create_output(&temp_name)?;
        Ok((temp_name, output))
    }

    /// Flush any pending state to the backing medium.
    fn sync(&self) -> Result<()>;

    /// Close the storage. Every later operation fails with [`StorageError::StorageClosed`].
    fn close(&self) -> Result<()>;

    fn is_closed(&self) -> bool;

    /// Read a whole file into memory.
    fn read_all(&self, name: &str) -> Result<Vec<u8>> {
        let mut input = self.open_input(name)?;
        let mut buffer = Vec::with_capacity(input.size()? as usize);
        input.read_to_end(&mut buffer)?;
        input.close()?;
        Ok(buffer)
    }

    /// Write `data` to a temporary file and rename it over `name`.
    ///
    /// Readers see either the previous content or `data`, never a mix. The temporary
    /// file is removed if any step fails.
    fn write_atomic(&self, name: &str, data: &[u8]) -> Result<()> {
        let (temp_name, mut output) = self.create_temp_output(name)?;

        let written = output
            .write_all(data)
            .map_err(WolfError::from)
            .and_then(|_| output.close());
        drop(output);

        match written.and_then(|_| self.rename_file(&temp_name, name)) {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = self.delete_file(&temp_name);
                Err(e)
            }
        }
    }
}

/// A readable file handle.
pub trait StorageInput: Read + Seek + Send + std::fmt::Debug {
    /// Size of the file in bytes.
    fn size(&self) -> Result<u64>;

    fn close(&mut self) -> Result<()>;
}

/// A writable file handle.
pub trait StorageOutput: Write + Send + std::fmt::Debug {
    /// Flush buffered bytes and sync them to the backing medium.
    fn flush_and_sync(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;
}

/// Configuration for storage backends.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// File-based storage configuration (includes path)
    File(file::FileStorageConfig),

    /// Memory-based storage configuration
    Memory(memory::MemoryStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(memory::MemoryStorageConfig::default())
    }
}

/// Creates storage instances from a [`StorageConfig`].
pub struct StorageFactory;

impl StorageFactory {
    /// Create a storage backend, creating the index directory if needed.
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::File(file_config) => {
                Ok(Arc::new(file::FileStorage::new(file_config)?))
            }
            StorageConfig::Memory(memory_config) => {
                Ok(Arc::new(memory::MemoryStorage::new(memory_config)))
            }
        }
    }
}

/// Error types specific to storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// File not found.
    FileNotFound(String),

    /// I/O error.
    IoError(String),

    /// Storage is closed.
    StorageClosed,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::FileNotFound(name) => write!(f, "File not found: {name}"),
            StorageError::IoError(msg) => write!(f, "I/O error: {msg}"),
            StorageError::StorageClosed => write!(f, "Storage is closed"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<StorageError> for WolfError {
    fn from(err: StorageError) -> Self {
        WolfError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::storage::file::FileStorageConfig;
    use crate::storage::memory::MemoryStorageConfig;

    #[test]
    fn test_storage_config_default() {
        assert!(matches!(StorageConfig::default(), StorageConfig::Memory(_)));
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(
            StorageError::FileNotFound("meta.json".to_string()).to_string(),
            "File not found: meta.json"
        );
        assert_eq!(StorageError::StorageClosed.to_string(), "Storage is closed");

        let err: WolfError = StorageError::StorageClosed.into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_storage_factory_memory() {
        let storage =
            StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default())).unwrap();
        storage.write_atomic("a", b"one").unwrap();
        storage.write_atomic("a", b"two").unwrap();
        assert_eq!(storage.read_all("a").unwrap(), b"two");
        assert_eq!(storage.list_files().unwrap(), vec!["a".to_string()]);
    }

    #[test]
    fn test_storage_factory_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = FileStorageConfig::new(dir.path().join("index"));
        let storage = StorageFactory::create(StorageConfig::File(config)).unwrap();

        storage.write_atomic("schema.json", b"{}").unwrap();
        assert!(dir.path().join("index").join("schema.json").exists());
        assert_eq!(storage.list_files().unwrap(), vec!["schema.json".to_string()]);
    }
}
