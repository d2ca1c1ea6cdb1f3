//! Per-client cache and workbook persistence (I/O)

use super::builder::Workbook;
use crate::analysis::row::{rows_from_json, rows_to_json};
use crate::analysis::NormalizedRow;
use crate::infra::{FileSystem, RealFileSystem};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a cached normalized file could not be reused
///
/// A miss is never fatal: the caller fetches fresh rows instead.
#[derive(Error, Debug)]
pub enum CacheMiss {
    /// No file at the expected path
    #[error("no cache file at {0}")]
    Missing(PathBuf),

    /// The file exists but could not be read
    #[error("cache file {path} is unreadable: {reason}")]
    Unreadable {
        /// Cache file path
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// The file is not a JSON list
    #[error("cache file {path} is malformed: {reason}")]
    Malformed {
        /// Cache file path
        path: PathBuf,
        /// Parse failure
        reason: String,
    },

    /// Fewer rows than the kind requires to trust the cache
    #[error("cache file {path} has {found} rows, need at least {required}")]
    TooShort {
        /// Cache file path
        path: PathBuf,
        /// Rows present
        found: usize,
        /// Rows required
        required: usize,
    },
}

/// Reads and writes a client's `data_cache/<client>` directory
pub struct AnalysisCache<FS: FileSystem = RealFileSystem> {
    cache_dir: PathBuf,
    fs: FS,
}

impl AnalysisCache<RealFileSystem> {
    /// Cache rooted at `cache_dir` on the real filesystem
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(cache_dir, RealFileSystem)
    }
}

impl<FS: FileSystem> AnalysisCache<FS> {
    /// Cache rooted at `cache_dir` using `fs`
    pub fn with_fs(cache_dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            fs,
        }
    }

    /// Directory holding this client's files
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Full path of a file in the cache directory
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.cache_dir.join(file_name)
    }

    fn ensure_cache_dir(&self) -> Result<()> {
        self.fs
            .create_dir_all(&self.cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", self.cache_dir.display()))
    }

    /// Load normalized rows if the file exists, parses and is long enough
    pub fn load_normalized(
        &self,
        file_name: &str,
        key_field: &str,
        min_rows: usize,
    ) -> Result<Vec<NormalizedRow>, CacheMiss> {
        let path = self.path_for(file_name);

        let contents = match self.fs.read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheMiss::Missing(path));
            }
            Err(e) => {
                return Err(CacheMiss::Unreadable {
                    path,
                    reason: e.to_string(),
                });
            }
        };

        let value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|e| CacheMiss::Malformed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let rows = rows_from_json(&value, key_field).ok_or_else(|| CacheMiss::Malformed {
            path: path.clone(),
            reason: "expected a JSON list".to_string(),
        })?;

        if rows.len() < min_rows {
            return Err(CacheMiss::TooShort {
                path,
                found: rows.len(),
                required: min_rows,
            });
        }

        log::debug!("Cache hit: {} ({} rows)", path.display(), rows.len());
        Ok(rows)
    }

    /// Write any serializable value as 2-space pretty JSON
    ///
    /// Non-ASCII text is written as-is.
    pub fn save_json<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<PathBuf> {
        self.ensure_cache_dir()?;

        let path = self.path_for(file_name);
        let contents = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", file_name))?;
        self.fs
            .write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }

    /// Persist a vendor payload as received
    pub fn save_raw(&self, file_name: &str, payload: &serde_json::Value) -> Result<PathBuf> {
        let path = self.save_json(file_name, payload)?;
        log::debug!("Saved raw payload to {}", path.display());
        Ok(path)
    }

    /// Persist normalized rows
    pub fn save_normalized(
        &self,
        file_name: &str,
        rows: &[NormalizedRow],
        key_field: &str,
    ) -> Result<PathBuf> {
        let path = self.save_json(file_name, &rows_to_json(rows, key_field))?;
        log::debug!("Saved {} normalized rows to {}", rows.len(), path.display());
        Ok(path)
    }

    /// Persist a workbook
    pub fn save_workbook(&self, file_name: &str, workbook: &Workbook) -> Result<PathBuf> {
        let path = self.save_json(file_name, workbook)?;
        log::info!("Saved workbook to {}", path.display());
        Ok(path)
    }
}
