//! Infrastructure traits for abstracting filesystem I/O.
//!
//! The cache store, the config loader and the audit engine all read and write
//! through [`FileSystem`], so tests can swap in an in-memory or failing
//! implementation without touching the real disk.

use std::fs::{Metadata, ReadDir};
use std::io;
use std::path::Path;

/// Trait for abstracting filesystem operations.
pub trait FileSystem {
    /// Create a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Read the contents of a directory.
    fn read_dir(&self, path: &Path) -> io::Result<ReadDir>;

    /// Get metadata for a file or directory.
    fn metadata(&self, path: &Path) -> io::Result<Metadata>;

    /// Read the entire contents of a file into a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write a slice of bytes to a file, replacing any previous contents.
    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()>;

    /// Whether a path exists. Errors while probing count as "does not exist".
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}

/// Real filesystem implementation that delegates to std::fs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<ReadDir> {
        std::fs::read_dir(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<Metadata> {
        std::fs::metadata(path)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: impl AsRef<[u8]>) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn test_real_filesystem_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("rows.json");

        let fs = RealFileSystem;
        fs.write(&file_path, "[{\"source\": \"Прямые заходы\"}]")
            .unwrap();

        let read_content = fs.read_to_string(&file_path).unwrap();
        assert_eq!(read_content, "[{\"source\": \"Прямые заходы\"}]");
    }

    #[test]
    fn test_real_filesystem_create_dir_all() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("data_cache").join("acme");

        let fs = RealFileSystem;
        fs.create_dir_all(&nested_path).unwrap();

        assert!(nested_path.is_dir());
        assert!(fs.exists(&nested_path));
    }

    #[test]
    fn test_real_filesystem_metadata_reports_file_length() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("workbook.json");

        let fs = RealFileSystem;
        fs.write(&file_path, b"content").unwrap();

        let metadata = fs.metadata(&file_path).unwrap();
        assert!(metadata.is_file());
        assert_eq!(metadata.len(), 7);
    }

    #[test]
    fn test_real_filesystem_read_dir_lists_entries() {
        let temp_dir = TempDir::new().unwrap();
        let fs = RealFileSystem;

        fs.write(&temp_dir.path().join("a.json"), b"[]").unwrap();
        fs.write(&temp_dir.path().join("b.json"), b"[]").unwrap();

        let entries: Vec<_> = fs
            .read_dir(temp_dir.path())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_real_filesystem_read_nonexistent_file_returns_error() {
        let fs = RealFileSystem;
        let result = fs.read_to_string(Path::new("/nonexistent/file.json"));
        assert!(result.is_err());
        assert!(!fs.exists(Path::new("/nonexistent/file.json")));
    }
}
