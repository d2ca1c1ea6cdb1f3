//! Analysis kinds and their row schemas
//!
//! Every analysis compares rows keyed by one dimension. What differs between
//! kinds is the key field, the measures carried per row, how each measure's
//! change is expressed, and which measure drives contribution and ranking.

use crate::error::AnalyticsError;
use std::fmt;
use std::str::FromStr;

/// How a measure's period-over-period change is expressed and aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureKind {
    /// Additive count (visits, clicks). Relative delta, summed in totals.
    Count,
    /// Per-visit average (page depth, duration). Relative delta, not summed.
    Mean,
    /// Ratio or position (conversion rate, CTR, bounce rate, position).
    /// Delta in percentage points, not summed.
    Rate,
}

impl MeasureKind {
    /// Whether the measure can be summed across rows
    pub fn is_additive(&self) -> bool {
        matches!(self, MeasureKind::Count)
    }

    /// Whether the change is a plain difference rather than percent-of-baseline
    pub fn uses_percentage_points(&self) -> bool {
        matches!(self, MeasureKind::Rate)
    }
}

/// A named measure within a schema
#[derive(Debug, Clone, PartialEq)]
pub struct Measure {
    /// Field name in normalized rows
    pub name: String,
    /// Delta semantics
    pub kind: MeasureKind,
}

/// A rate recomputed for totals from two summed counts
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRate {
    /// Name used in totals (`total_<name>_p1`)
    pub name: String,
    /// Count measure in the numerator
    pub numerator: String,
    /// Count measure in the denominator (floored at 1.0)
    pub denominator: String,
}

/// Shape of the rows for one comparison
///
/// # Examples
///
/// ```
/// use traffic_audit::analysis::{AnalysisSchema, MeasureKind};
///
/// let schema = AnalysisSchema::new("source", "visits")
///     .measure("visits", MeasureKind::Count)
///     .measure("bounceRate", MeasureKind::Rate);
///
/// assert_eq!(schema.key_field, "source");
/// assert_eq!(schema.measures.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSchema {
    /// Dimension key field name (`source`, `landingPage`, `query`, `page`)
    pub key_field: String,
    /// Measures in output order
    pub measures: Vec<Measure>,
    /// Measure whose delta drives contribution and ranking
    pub primary: String,
    /// Rates recomputed from summed counts in totals
    pub derived_rates: Vec<DerivedRate>,
}

impl AnalysisSchema {
    /// Create a schema with no measures yet
    pub fn new(key_field: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            measures: Vec::new(),
            primary: primary.into(),
            derived_rates: Vec::new(),
        }
    }

    /// Append a measure
    pub fn measure(mut self, name: impl Into<String>, kind: MeasureKind) -> Self {
        self.measures.push(Measure {
            name: name.into(),
            kind,
        });
        self
    }

    /// Append a derived total rate
    pub fn derived_rate(
        mut self,
        name: impl Into<String>,
        numerator: impl Into<String>,
        denominator: impl Into<String>,
    ) -> Self {
        self.derived_rates.push(DerivedRate {
            name: name.into(),
            numerator: numerator.into(),
            denominator: denominator.into(),
        });
        self
    }

    /// Look up a measure by name
    pub fn find(&self, name: &str) -> Option<&Measure> {
        self.measures.iter().find(|m| m.name == name)
    }
}

/// Which vendor API a kind's data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Web-analytics platform
    Metrika,
    /// Search-console service
    Gsc,
    /// Webmaster-tools service
    Webmaster,
}

const TRAFFIC_MEASURES: [(&str, MeasureKind); 5] = [
    ("visits", MeasureKind::Count),
    ("users", MeasureKind::Count),
    ("bounceRate", MeasureKind::Rate),
    ("pageDepth", MeasureKind::Mean),
    ("avgVisitDurationSeconds", MeasureKind::Mean),
];

const GOAL_MEASURES: [(&str, MeasureKind); 3] = [
    ("visits", MeasureKind::Count),
    ("goal_visits", MeasureKind::Count),
    ("goal_cr_pct", MeasureKind::Rate),
];

const SEARCH_MEASURES: [(&str, MeasureKind); 4] = [
    ("clicks", MeasureKind::Count),
    ("impressions", MeasureKind::Count),
    ("ctr", MeasureKind::Rate),
    ("position", MeasureKind::Rate),
];

const WEBMASTER_MEASURES: [(&str, MeasureKind); 3] = [
    ("shows", MeasureKind::Count),
    ("clicks", MeasureKind::Count),
    ("position", MeasureKind::Rate),
];

/// Supported period comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    /// Traffic sources
    Sources,
    /// Landing pages
    Pages,
    /// Landing pages within one traffic source
    PagesBySource,
    /// Goal conversions by traffic source
    GoalsBySource,
    /// Goal conversions by landing page
    GoalsByPage,
    /// Search-console queries
    GscQueries,
    /// Search-console pages
    GscPages,
    /// Webmaster-tools popular queries
    WebmasterQueries,
}

impl AnalysisKind {
    /// All kinds, in CLI listing order
    pub const ALL: [AnalysisKind; 8] = [
        AnalysisKind::Sources,
        AnalysisKind::Pages,
        AnalysisKind::PagesBySource,
        AnalysisKind::GoalsBySource,
        AnalysisKind::GoalsByPage,
        AnalysisKind::GscQueries,
        AnalysisKind::GscPages,
        AnalysisKind::WebmasterQueries,
    ];

    /// Name used on the command line
    pub fn cli_name(&self) -> &'static str {
        match self {
            AnalysisKind::Sources => "sources",
            AnalysisKind::Pages => "pages",
            AnalysisKind::PagesBySource => "pages-by-source",
            AnalysisKind::GoalsBySource => "goals-by-source",
            AnalysisKind::GoalsByPage => "goals-by-page",
            AnalysisKind::GscQueries => "gsc-queries",
            AnalysisKind::GscPages => "gsc-pages",
            AnalysisKind::WebmasterQueries => "webmaster-queries",
        }
    }

    /// Name used in workbook file names and workbook metadata
    pub fn workbook_name(&self) -> &'static str {
        match self {
            AnalysisKind::Sources => "sources",
            AnalysisKind::Pages => "pages",
            AnalysisKind::PagesBySource => "pages_by_source",
            AnalysisKind::GoalsBySource => "goals_by_source",
            AnalysisKind::GoalsByPage => "goals_by_page",
            AnalysisKind::GscQueries => "gsc_queries",
            AnalysisKind::GscPages => "gsc_pages",
            AnalysisKind::WebmasterQueries => "ym_webmaster_queries",
        }
    }

    /// Prefix of per-period cache and raw payload file names
    pub fn cache_stem(&self) -> &'static str {
        match self {
            AnalysisKind::Sources => "metrika_sources",
            AnalysisKind::Pages => "metrika_pages",
            AnalysisKind::PagesBySource => "metrika_pages_by_source",
            AnalysisKind::GoalsBySource => "metrika_goals_by_source",
            AnalysisKind::GoalsByPage => "metrika_goals_by_page",
            AnalysisKind::GscQueries => "gsc_queries",
            AnalysisKind::GscPages => "gsc_pages",
            AnalysisKind::WebmasterQueries => "ym_webmaster_queries",
        }
    }

    /// Vendor API behind this kind
    pub fn provider(&self) -> Provider {
        match self {
            AnalysisKind::GscQueries | AnalysisKind::GscPages => Provider::Gsc,
            AnalysisKind::WebmasterQueries => Provider::Webmaster,
            _ => Provider::Metrika,
        }
    }

    /// Dimension key field of normalized rows
    pub fn key_field(&self) -> &'static str {
        match self {
            AnalysisKind::Sources | AnalysisKind::GoalsBySource => "source",
            AnalysisKind::Pages | AnalysisKind::PagesBySource | AnalysisKind::GoalsByPage => {
                "landingPage"
            }
            AnalysisKind::GscQueries | AnalysisKind::WebmasterQueries => "query",
            AnalysisKind::GscPages => "page",
        }
    }

    /// Whether rows are keyed by URL, which yields many more rows per period
    pub fn is_page_dimension(&self) -> bool {
        matches!(self.key_field(), "landingPage" | "page")
    }

    /// Whether the kind needs a conversion goal id
    pub fn needs_goal(&self) -> bool {
        matches!(self, AnalysisKind::GoalsBySource | AnalysisKind::GoalsByPage)
    }

    /// Row schema for this kind
    pub fn schema(&self) -> AnalysisSchema {
        let (primary, measures): (&str, &[(&str, MeasureKind)]) = match self {
            AnalysisKind::Sources | AnalysisKind::Pages | AnalysisKind::PagesBySource => {
                ("visits", &TRAFFIC_MEASURES)
            }
            AnalysisKind::GoalsBySource | AnalysisKind::GoalsByPage => {
                ("goal_visits", &GOAL_MEASURES)
            }
            AnalysisKind::GscQueries | AnalysisKind::GscPages => ("clicks", &SEARCH_MEASURES),
            AnalysisKind::WebmasterQueries => ("clicks", &WEBMASTER_MEASURES),
        };

        let mut schema = measures
            .iter()
            .fold(AnalysisSchema::new(self.key_field(), primary), |s, (name, kind)| {
                s.measure(*name, *kind)
            });

        match self.provider() {
            Provider::Metrika if self.needs_goal() => {
                schema = schema.derived_rate("goal_cr", "goal_visits", "visits");
            }
            Provider::Gsc => {
                schema = schema.derived_rate("ctr", "clicks", "impressions");
            }
            _ => {}
        }
        schema
    }

    /// Row limit used when none is given on the command line
    pub fn default_limit(&self) -> i64 {
        match self.provider() {
            Provider::Metrika => 50,
            Provider::Gsc => 1000,
            Provider::Webmaster => 500,
        }
    }

    /// Number of rows to request from the provider for a display limit
    ///
    /// Page dimensions fetch far more rows so totals and contributions stay
    /// close to reality without extra API calls.
    pub fn fetch_limit(&self, limit: i64) -> usize {
        let requested = if limit > 0 { limit as usize } else { 0 };
        if self.is_page_dimension() {
            requested.max(5000)
        } else if requested > 0 {
            requested
        } else {
            50
        }
    }

    /// Minimum row count for a cached normalized file to be reused
    pub fn min_cached_rows(&self, fetch_limit: usize) -> usize {
        if self.is_page_dimension() {
            fetch_limit.max(1)
        } else {
            fetch_limit.min(50).max(1)
        }
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|k| k.cli_name().to_string()).collect()
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cli_name())
    }
}

impl FromStr for AnalysisKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let normalized = normalized
            .strip_prefix("ym-")
            .unwrap_or(&normalized)
            .to_string();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.cli_name() == normalized)
            .ok_or_else(|| AnalyticsError::UnknownAnalysisKind {
                kind: s.to_string(),
                valid_kinds: Self::valid_names(),
            })
    }
}
