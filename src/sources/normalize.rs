//! Vendor payload normalizers
//!
//! Each normalizer turns one raw API response into [`NormalizedRow`]s keyed
//! by the kind's dimension field. Malformed entries are skipped or read as
//! zero; normalizers never fail.

use crate::analysis::row::lenient_f64;
use crate::analysis::{AnalysisKind, NormalizedRow, UNKNOWN_KEY};
use serde_json::Value;

/// Metric order requested from the analytics API for traffic reports
pub const TRAFFIC_METRICS: [&str; 5] = [
    "visits",
    "users",
    "bounceRate",
    "pageDepth",
    "avgVisitDurationSeconds",
];

/// Metric order requested from the analytics API for goal reports
pub const GOAL_METRICS: [&str; 3] = ["visits", "goal_visits", "goal_cr_pct"];

/// Dispatch to the normalizer for `kind`
pub fn normalize(kind: AnalysisKind, payload: &Value) -> Vec<NormalizedRow> {
    match kind {
        AnalysisKind::Sources => normalize_sources(payload),
        AnalysisKind::Pages | AnalysisKind::PagesBySource => normalize_pages(payload),
        AnalysisKind::GoalsBySource => normalize_goals_by_source(payload),
        AnalysisKind::GoalsByPage => normalize_goals_by_page(payload),
        AnalysisKind::GscQueries => normalize_gsc_rows(payload, "query"),
        AnalysisKind::GscPages => normalize_gsc_rows(payload, "page"),
        AnalysisKind::WebmasterQueries => normalize_webmaster_queries(payload),
    }
}

fn key_or_unknown(value: Option<&Value>) -> String {
    let text = match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    if text.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        text
    }
}

/// Analytics report: `data[].dimensions[0].name` plus positional `metrics[]`
fn normalize_metrika(payload: &Value, key_field: &str, metric_names: &[&str]) -> Vec<NormalizedRow> {
    let Some(data) = payload.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };

    data.iter()
        .map(|item| {
            let key = key_or_unknown(
                item.get("dimensions")
                    .and_then(|d| d.get(0))
                    .and_then(|d| d.get("name")),
            );
            let metrics = item
                .get("metrics")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            log::trace!("Normalizing {} row '{}'", key_field, key);
            metric_names
                .iter()
                .enumerate()
                .fold(NormalizedRow::new(key), |row, (i, name)| {
                    row.with(*name, metrics.get(i).map_or(0.0, lenient_f64))
                })
        })
        .collect()
}

/// Traffic by source
pub fn normalize_sources(payload: &Value) -> Vec<NormalizedRow> {
    normalize_metrika(payload, "source", &TRAFFIC_METRICS)
}

/// Traffic by landing page
pub fn normalize_pages(payload: &Value) -> Vec<NormalizedRow> {
    normalize_metrika(payload, "landingPage", &TRAFFIC_METRICS)
}

/// Goal conversions by source
pub fn normalize_goals_by_source(payload: &Value) -> Vec<NormalizedRow> {
    normalize_metrika(payload, "source", &GOAL_METRICS)
}

/// Goal conversions by landing page
pub fn normalize_goals_by_page(payload: &Value) -> Vec<NormalizedRow> {
    normalize_metrika(payload, "landingPage", &GOAL_METRICS)
}

/// Search-console analytics rows for a single dimension
///
/// CTR arrives as a fraction and is stored in percent.
pub fn normalize_gsc_rows(payload: &Value, dimension: &str) -> Vec<NormalizedRow> {
    let Some(rows) = payload.get("rows").and_then(Value::as_array) else {
        return Vec::new();
    };

    rows.iter()
        .filter(|r| r.is_object())
        .map(|r| {
            let key = key_or_unknown(r.get("keys").and_then(|k| k.get(0)));
            let metric = |name: &str| r.get(name).map_or(0.0, lenient_f64);
            log::trace!("Normalizing {} row '{}'", dimension, key);

            NormalizedRow::new(key)
                .with("clicks", metric("clicks"))
                .with("impressions", metric("impressions"))
                .with("ctr", metric("ctr") * 100.0)
                .with("position", metric("position"))
        })
        .collect()
}

/// Webmaster-tools popular queries
pub fn normalize_webmaster_queries(payload: &Value) -> Vec<NormalizedRow> {
    let Some(queries) = payload.get("queries").and_then(Value::as_array) else {
        return Vec::new();
    };

    queries
        .iter()
        .filter(|q| q.is_object())
        .map(|q| {
            let key = key_or_unknown(q.get("query_text"));
            let indicator = |name: &str| {
                q.get("indicators")
                    .and_then(|ind| ind.get(name))
                    .map_or(0.0, lenient_f64)
            };

            NormalizedRow::new(key)
                .with("shows", indicator("TOTAL_SHOWS"))
                .with("clicks", indicator("TOTAL_CLICKS"))
                .with("position", indicator("AVG_SHOW_POSITION"))
        })
        .collect()
}
