//! Deterministic cache and workbook file names

use crate::analysis::{AnalysisKind, Period};
use regex::Regex;
use std::sync::OnceLock;

static NON_ALNUM_RE: OnceLock<Regex> = OnceLock::new();

/// Which stage of a per-period cache file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStage {
    /// Vendor payload as received
    Raw,
    /// Normalized rows
    Normalized,
}

impl CacheStage {
    fn tag(&self) -> &'static str {
        match self {
            CacheStage::Raw => "raw",
            CacheStage::Normalized => "norm",
        }
    }
}

/// Lowercase, collapse every run of non `[a-z0-9]` into `_`, trim `_`
///
/// Returns `unknown` when nothing is left.
///
/// ```
/// use traffic_audit::workbook::naming::slugify;
///
/// assert_eq!(slugify("Search engine traffic"), "search_engine_traffic");
/// assert_eq!(slugify("https:example.com:443"), "https_example_com_443");
/// assert_eq!(slugify("Прямые заходы"), "unknown");
/// ```
pub fn slugify(value: &str) -> String {
    let re = NON_ALNUM_RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug regex is valid"));
    let lowered = value.to_lowercase();
    let slug = re.replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug.to_string()
    }
}

/// FNV-1a over the raw bytes; stable across builds and platforms
fn fnv1a32(value: &str) -> u32 {
    value.bytes().fold(0x811c_9dc5, |hash: u32, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

/// File-name fragment for an identifier
///
/// Plain ASCII identifiers map to their slug. When slugging drops letters
/// (Cyrillic source names, say) a short hash of the raw identifier is
/// appended so distinct identifiers keep distinct files.
///
/// ```
/// use traffic_audit::workbook::naming::identifier_slug;
///
/// assert_eq!(identifier_slug("Search engine traffic"), "search_engine_traffic");
/// assert!(identifier_slug("Прямые заходы").starts_with("unknown_"));
/// assert_ne!(identifier_slug("Прямые заходы"), identifier_slug("Социальные сети"));
/// ```
pub fn identifier_slug(identifier: &str) -> String {
    let slug = slugify(identifier);
    let lossy = identifier
        .chars()
        .any(|c| c.is_alphanumeric() && !c.is_ascii_alphanumeric())
        || slug == "unknown";
    if lossy {
        format!("{}_{:08x}", slug, fnv1a32(identifier))
    } else {
        slug
    }
}

fn id_part(identifier: Option<&str>) -> String {
    identifier
        .map(|id| format!("_{}", identifier_slug(id)))
        .unwrap_or_default()
}

/// `<provider>_<kind>_<stage>[_<id>]_<start>_<end>.json`
///
/// ```
/// use traffic_audit::analysis::{AnalysisKind, Period};
/// use traffic_audit::workbook::naming::{cache_file_name, CacheStage};
///
/// let period = Period::parse("2025-01-01", "2025-01-31")?;
/// assert_eq!(
///     cache_file_name(AnalysisKind::GoalsBySource, CacheStage::Normalized, Some("123"), &period),
///     "metrika_goals_by_source_norm_123_2025-01-01_2025-01-31.json"
/// );
/// # Ok::<(), traffic_audit::error::AnalyticsError>(())
/// ```
pub fn cache_file_name(
    kind: AnalysisKind,
    stage: CacheStage,
    identifier: Option<&str>,
    period: &Period,
) -> String {
    format!(
        "{}_{}{}_{}_{}.json",
        kind.cache_stem(),
        stage.tag(),
        id_part(identifier),
        period.start_str(),
        period.end_str()
    )
}

/// `analysis_<kind>[_<id>]_<p1start><p1end>__<p2start><p2end>.json`
pub fn workbook_file_name(
    kind: AnalysisKind,
    identifier: Option<&str>,
    p1: &Period,
    p2: &Period,
) -> String {
    format!(
        "analysis_{}{}_{}__{}.json",
        kind.workbook_name(),
        id_part(identifier),
        p1.compact(),
        p2.compact()
    )
}

/// `<provider>_<kind>[_<id>]_<start>_<end>.json`, the raw payload name a
/// dump directory is expected to hold
pub fn dump_file_name(kind: AnalysisKind, identifier: Option<&str>, period: &Period) -> String {
    format!(
        "{}{}_{}_{}.json",
        kind.cache_stem(),
        id_part(identifier),
        period.start_str(),
        period.end_str()
    )
}
