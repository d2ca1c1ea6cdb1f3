//! Analysis pipeline executor
//!
//! Runs one comparison end to end:
//! 1. load normalized rows for each period from cache, or fetch and normalize
//! 2. compare, attribute contributions and rank
//! 3. build the workbook
//! 4. persist it next to the per-period caches

use super::request::AnalysisRequest;
use crate::analysis::{compare_periods, NormalizedRow, Period};
use crate::infra::{FileSystem, RealFileSystem};
use crate::sources::{normalize, FetchRequest, RowSource};
use crate::workbook::{
    cache_file_name, workbook_file_name, AnalysisCache, CacheStage, Workbook, WorkbookBuilder,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Where a period's rows came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Reused a normalized cache file
    Cache,
    /// Fetched from the row source
    Fetched,
}

/// Result of a pipeline run
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// The built workbook
    pub workbook: Workbook,
    /// Where the workbook was written
    pub workbook_path: PathBuf,
    /// Origin of period 1 and period 2 rows
    pub origins: [RowOrigin; 2],
}

/// Load-or-fetch, compare and persist
pub struct AnalysisPipeline<'a, S: RowSource, FS: FileSystem = RealFileSystem> {
    cache: AnalysisCache<FS>,
    source: &'a S,
}

impl<'a, S: RowSource> AnalysisPipeline<'a, S, RealFileSystem> {
    /// Pipeline writing into `cache_dir` on the real filesystem
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use traffic_audit::analysis::{AnalysisKind, Period};
    /// use traffic_audit::config::{ConfigLoader, ProjectLayout};
    /// use traffic_audit::pipeline::{AnalysisPipeline, AnalysisRequest};
    /// use traffic_audit::sources::DumpDirSource;
    ///
    /// let layout = ProjectLayout::new(".");
    /// let config = ConfigLoader::load(&layout, "acme")?;
    /// let request = AnalysisRequest::from_config(
    ///     "acme",
    ///     &config,
    ///     AnalysisKind::Sources,
    ///     Period::parse("2025-01-01", "2025-01-31")?,
    ///     Period::parse("2025-02-01", "2025-02-28")?,
    ///     None,
    /// )?;
    ///
    /// let source = DumpDirSource::new("dumps");
    /// let outcome = AnalysisPipeline::new(layout.cache_dir("acme"), &source).run(&request)?;
    /// println!("Wrote {}", outcome.workbook_path.display());
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn new(cache_dir: impl Into<PathBuf>, source: &'a S) -> Self {
        Self::with_fs(cache_dir, source, RealFileSystem)
    }
}

impl<'a, S: RowSource, FS: FileSystem> AnalysisPipeline<'a, S, FS> {
    /// Pipeline with a custom filesystem implementation
    pub fn with_fs(cache_dir: impl Into<PathBuf>, source: &'a S, fs: FS) -> Self {
        Self {
            cache: AnalysisCache::with_fs(cache_dir, fs),
            source,
        }
    }

    /// Cache directory in use
    pub fn cache_dir(&self) -> &Path {
        self.cache.cache_dir()
    }

    /// Run the full comparison for `request`
    pub fn run(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        log::info!(
            "Comparing {} for '{}': {} vs {}",
            request.kind,
            request.client,
            request.p1,
            request.p2
        );

        let (rows_p1, origin_p1) = self.load_or_fetch(request, &request.p1)?;
        let (rows_p2, origin_p2) = self.load_or_fetch(request, &request.p2)?;

        let schema = request.kind.schema();
        let ranked = compare_periods(&schema, &rows_p1, &rows_p2);
        let workbook = WorkbookBuilder::new(&schema).build(
            request.workbook_meta(),
            request.limit,
            &ranked,
            &ranked,
        );

        let identifier = request.identifier();
        let file_name = workbook_file_name(
            request.kind,
            identifier.as_deref(),
            &request.p1,
            &request.p2,
        );
        let workbook_path = self.cache.save_workbook(&file_name, &workbook)?;

        Ok(AnalysisOutcome {
            workbook,
            workbook_path,
            origins: [origin_p1, origin_p2],
        })
    }

    /// Rows for one period, from cache unless refreshing or the cache misses
    pub fn load_or_fetch(
        &self,
        request: &AnalysisRequest,
        period: &Period,
    ) -> Result<(Vec<NormalizedRow>, RowOrigin)> {
        let kind = request.kind;
        let key_field = kind.key_field();
        let identifier = request.identifier();
        let fetch_limit = kind.fetch_limit(request.limit);
        let norm_name = cache_file_name(kind, CacheStage::Normalized, identifier.as_deref(), period);

        if request.refresh {
            log::debug!("Refresh requested, skipping {}", norm_name);
        } else {
            match self
                .cache
                .load_normalized(&norm_name, key_field, kind.min_cached_rows(fetch_limit))
            {
                Ok(rows) => return Ok((rows, RowOrigin::Cache)),
                Err(miss) => log::debug!("Cache miss: {}", miss),
            }
        }

        let payload = self
            .source
            .fetch(&FetchRequest {
                kind,
                period,
                limit: fetch_limit,
                identifier: identifier.as_deref(),
            })
            .with_context(|| format!("Failed to fetch {} for {}", kind, period))?;

        let raw_name = cache_file_name(kind, CacheStage::Raw, identifier.as_deref(), period);
        self.cache.save_raw(&raw_name, &payload)?;

        let rows = normalize(kind, &payload);
        self.cache.save_normalized(&norm_name, &rows, key_field)?;
        log::info!("Fetched {} {} rows for {}", rows.len(), kind, period);

        Ok((rows, RowOrigin::Fetched))
    }
}
