//! Analysis requests resolved against a client config

use crate::analysis::{AnalysisKind, Period, Provider};
use crate::config::ClientConfig;
use crate::error::AnalyticsError;
use crate::workbook::WorkbookMeta;

/// Traffic source used by `pages-by-source` when none is given
pub const DEFAULT_TRAFFIC_SOURCE: &str = "Search engine traffic";

/// Everything needed to run one comparison
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Client name
    pub client: String,
    /// Analysis kind
    pub kind: AnalysisKind,
    /// Baseline period
    pub p1: Period,
    /// Comparison period
    pub p2: Period,
    /// Row limit; zero or negative keeps all rows
    pub limit: i64,
    /// Bypass normalized caches
    pub refresh: bool,
    /// Analytics counter id
    pub counter_id: Option<i64>,
    /// Goal id for goal kinds
    pub goal_id: Option<i64>,
    /// Search-console property for search-console kinds
    pub site_url: Option<String>,
    /// Webmaster host for webmaster kinds
    pub host_id: Option<String>,
    /// Traffic source for `pages-by-source`
    pub source: Option<String>,
}

impl AnalysisRequest {
    /// Resolve the identifiers `kind` needs from `config`
    ///
    /// Fails fast with [`AnalyticsError::MissingIdentifier`] before anything
    /// is read or fetched.
    pub fn from_config(
        client: &str,
        config: &ClientConfig,
        kind: AnalysisKind,
        p1: Period,
        p2: Period,
        source: Option<&str>,
    ) -> Result<Self, AnalyticsError> {
        let missing = |field: &str| AnalyticsError::MissingIdentifier {
            field: field.to_string(),
            client: client.to_string(),
        };

        let mut request = Self {
            client: client.to_string(),
            kind,
            p1,
            p2,
            limit: kind.default_limit(),
            refresh: false,
            counter_id: None,
            goal_id: None,
            site_url: None,
            host_id: None,
            source: None,
        };

        match kind.provider() {
            Provider::Metrika => {
                request.counter_id =
                    Some(config.counter_id().ok_or_else(|| missing("metrika.counter_id"))?);
                if kind.needs_goal() {
                    request.goal_id = Some(config.goal_id().ok_or_else(|| missing("metrika.goal_id"))?);
                }
                if kind == AnalysisKind::PagesBySource {
                    let source = source
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .unwrap_or(DEFAULT_TRAFFIC_SOURCE);
                    request.source = Some(source.to_string());
                }
            }
            Provider::Gsc => {
                let site_url = config.gsc_site_url().ok_or_else(|| missing("gsc.site_url"))?;
                request.site_url = Some(site_url.to_string());
            }
            Provider::Webmaster => {
                let host_id = config
                    .webmaster_host_id()
                    .ok_or_else(|| missing("webmaster.host_id"))?;
                request.host_id = Some(host_id.to_string());
            }
        }

        Ok(request)
    }

    /// Set the row limit
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Bypass normalized caches
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Identifier embedded in file names and passed to the row source
    pub fn identifier(&self) -> Option<String> {
        match self.kind {
            AnalysisKind::GoalsBySource | AnalysisKind::GoalsByPage => {
                self.goal_id.map(|id| id.to_string())
            }
            AnalysisKind::PagesBySource => self.source.clone(),
            AnalysisKind::WebmasterQueries => self.host_id.clone(),
            AnalysisKind::GscQueries | AnalysisKind::GscPages => self.site_url.clone(),
            _ => None,
        }
    }

    /// Workbook metadata for this request
    pub fn workbook_meta(&self) -> WorkbookMeta {
        let mut meta = WorkbookMeta::new(&self.client, self.kind, &self.p1, &self.p2)
            .with_refresh(self.refresh);
        meta.counter_id = self.counter_id;
        meta.goal_id = self.goal_id;
        meta.site_url = self.site_url.clone();
        meta.host_id = self.host_id.clone();
        meta.source = self.source.clone();
        meta
    }
}
