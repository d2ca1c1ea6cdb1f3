//! Raw data collaborators
//!
//! The analysis core never talks to vendor APIs. A [`RowSource`] hands it
//! one raw payload per period, and [`normalize`] turns that payload into
//! rows. [`DumpDirSource`] reads payloads exported to a directory.

pub mod dump;
pub mod normalize;

pub use dump::DumpDirSource;
pub use normalize::{
    normalize, normalize_goals_by_page, normalize_goals_by_source, normalize_gsc_rows,
    normalize_pages, normalize_sources, normalize_webmaster_queries,
};

use crate::analysis::{AnalysisKind, Period};
use anyhow::Result;

/// What to fetch for one period
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    /// Analysis kind
    pub kind: AnalysisKind,
    /// Period to fetch
    pub period: &'a Period,
    /// Maximum number of rows wanted
    pub limit: usize,
    /// Goal id, traffic source or host id, depending on the kind
    pub identifier: Option<&'a str>,
}

/// Provider of raw vendor payloads
pub trait RowSource {
    /// Fetch the raw payload for one period
    fn fetch(&self, request: &FetchRequest<'_>) -> Result<serde_json::Value>;
}
