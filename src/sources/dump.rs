//! Payloads exported to a dump directory

use super::{FetchRequest, RowSource};
use crate::error::AnalyticsError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::workbook::naming::dump_file_name;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Reads `<dir>/<provider>_<kind>[_<id>]_<start>_<end>.json`
pub struct DumpDirSource<FS: FileSystem = RealFileSystem> {
    dir: PathBuf,
    fs: FS,
}

impl DumpDirSource<RealFileSystem> {
    /// Source reading from `dir` on the real filesystem
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(dir, RealFileSystem)
    }
}

impl<FS: FileSystem> DumpDirSource<FS> {
    /// Source reading from `dir` through `fs`
    pub fn with_fs(dir: impl Into<PathBuf>, fs: FS) -> Self {
        Self { dir: dir.into(), fs }
    }

    /// Path probed for a request
    pub fn path_for(&self, request: &FetchRequest<'_>) -> PathBuf {
        self.dir.join(dump_file_name(
            request.kind,
            request.identifier,
            request.period,
        ))
    }
}

impl<FS: FileSystem> RowSource for DumpDirSource<FS> {
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<serde_json::Value> {
        let path = self.path_for(request);

        let contents = match self.fs.read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AnalyticsError::PayloadNotFound {
                    kind: request.kind.to_string(),
                    path,
                }
                .into());
            }
            Err(e) => {
                return Err(AnalyticsError::Io {
                    context: path.display().to_string(),
                    source: e,
                }
                .into());
            }
        };

        log::debug!(
            "Read {} payload for {} from {} (limit {})",
            request.kind,
            request.period,
            path.display(),
            request.limit
        );
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse payload {}", path.display()))
    }
}
