//! Normalized per-period rows

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Key used when a row has no value for its dimension field
pub const UNKNOWN_KEY: &str = "(unknown)";

/// One dimension value with its measures for a single period
///
/// # Examples
///
/// ```
/// use traffic_audit::analysis::NormalizedRow;
///
/// let row = NormalizedRow::new("organic").with("visits", 100.0);
/// assert_eq!(row.value("visits"), 100.0);
/// assert_eq!(row.value("users"), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    /// Dimension key value
    pub key: String,
    /// Measure name to value
    pub values: BTreeMap<String, f64>,
}

impl NormalizedRow {
    /// Row with no measures
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a measure, builder style
    pub fn with(mut self, measure: impl Into<String>, value: f64) -> Self {
        self.values.insert(measure.into(), value);
        self
    }

    /// Measure value; absent measures read as zero
    pub fn value(&self, measure: &str) -> f64 {
        self.values.get(measure).copied().unwrap_or(0.0)
    }

    /// Read a row from its flat JSON form
    ///
    /// The key field falls back to `(unknown)` when missing or null.
    /// Non-numeric measure values read as zero.
    pub fn from_json(value: &Value, key_field: &str) -> Self {
        let key = match value.get(key_field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => UNKNOWN_KEY.to_string(),
            Some(other) => other.to_string(),
        };

        let values = value
            .as_object()
            .map(|obj| {
                obj.iter()
                    .filter(|(name, _)| name.as_str() != key_field)
                    .map(|(name, v)| (name.clone(), lenient_f64(v)))
                    .collect()
            })
            .unwrap_or_default();

        Self { key, values }
    }

    /// Flat JSON form with the key under `key_field`
    pub fn to_json(&self, key_field: &str) -> Value {
        let mut obj = Map::new();
        obj.insert(key_field.to_string(), Value::String(self.key.clone()));
        for (name, value) in &self.values {
            obj.insert(name.clone(), json_number(*value));
        }
        Value::Object(obj)
    }
}

/// Parse a JSON array of flat rows; `None` when `value` is not an array
pub fn rows_from_json(value: &Value, key_field: &str) -> Option<Vec<NormalizedRow>> {
    value.as_array().map(|items| {
        items
            .iter()
            .map(|item| NormalizedRow::from_json(item, key_field))
            .collect()
    })
}

/// Serialize rows as a JSON array of flat objects
pub fn rows_to_json(rows: &[NormalizedRow], key_field: &str) -> Value {
    Value::Array(rows.iter().map(|r| r.to_json(key_field)).collect())
}

/// Numeric reading of a payload value: numbers as-is, numeric strings parsed,
/// everything else zero
pub fn lenient_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// JSON number for `value`; non-finite values become `0.0`
pub(crate) fn json_number(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_reads_key_and_measures() {
        let row = NormalizedRow::from_json(
            &json!({"source": "Поисковые системы", "visits": 120, "bounceRate": "12.5"}),
            "source",
        );
        assert_eq!(row.key, "Поисковые системы");
        assert_eq!(row.value("visits"), 120.0);
        assert_eq!(row.value("bounceRate"), 12.5);
        assert!(!row.values.contains_key("source"));
    }

    #[test]
    fn test_from_json_missing_key_is_unknown() {
        let row = NormalizedRow::from_json(&json!({"visits": 5}), "landingPage");
        assert_eq!(row.key, UNKNOWN_KEY);

        let row = NormalizedRow::from_json(&json!({"query": null, "clicks": 1}), "query");
        assert_eq!(row.key, UNKNOWN_KEY);
    }

    #[test]
    fn test_from_json_non_numeric_measures_read_as_zero() {
        let row = NormalizedRow::from_json(
            &json!({"page": "/a", "clicks": null, "ctr": "n/a", "position": [1]}),
            "page",
        );
        assert_eq!(row.value("clicks"), 0.0);
        assert_eq!(row.value("ctr"), 0.0);
        assert_eq!(row.value("position"), 0.0);
    }

    #[test]
    fn test_rows_from_json_rejects_non_arrays() {
        assert!(rows_from_json(&json!({"source": "x"}), "source").is_none());
        let rows = rows_from_json(&json!([{"source": "a"}, {"source": "b"}]), "source").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_to_json_places_key_under_field_name() {
        let row = NormalizedRow::new("/pricing").with("visits", 3.0);
        let value = row.to_json("landingPage");
        assert_eq!(value["landingPage"], "/pricing");
        assert_eq!(value["visits"], 3.0);
    }

    #[test]
    fn test_json_number_replaces_non_finite() {
        assert_eq!(json_number(f64::NAN), json!(0.0));
        assert_eq!(json_number(1.5), json!(1.5));
    }
}
