//! Period-over-period row comparison

use super::row::{json_number, NormalizedRow};
use super::schema::{AnalysisSchema, MeasureKind};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{HashMap, HashSet};

/// Percent change against a baseline floored at 1.0
///
/// The floor keeps brand-new keys (baseline 0) finite: 0 → 20 reads as +2000%.
///
/// ```
/// use traffic_audit::analysis::percent_change;
///
/// assert_eq!(percent_change(100.0, 150.0), 50.0);
/// assert_eq!(percent_change(0.0, 20.0), 2000.0);
/// assert_eq!(percent_change(0.5, 1.0), 50.0);
/// ```
pub fn percent_change(v1: f64, v2: f64) -> f64 {
    (v2 - v1) / v1.max(1.0) * 100.0
}

/// How a measure's change is expressed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change {
    /// Percent of the (floored) baseline
    Percent(f64),
    /// Plain difference of two rates
    PercentagePoints(f64),
}

impl Change {
    /// The numeric change regardless of unit
    pub fn value(&self) -> f64 {
        match self {
            Change::Percent(v) | Change::PercentagePoints(v) => *v,
        }
    }
}

/// One measure of one key across both periods
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureDelta {
    /// Measure name
    pub name: String,
    /// Measure semantics
    pub kind: MeasureKind,
    /// Period 1 value
    pub p1: f64,
    /// Period 2 value
    pub p2: f64,
    /// `p2 - p1`
    pub delta_abs: f64,
    /// Relative or percentage-point change
    pub change: Change,
}

impl MeasureDelta {
    fn new(name: &str, kind: MeasureKind, p1: f64, p2: f64) -> Self {
        let delta_abs = p2 - p1;
        let change = if kind.uses_percentage_points() {
            Change::PercentagePoints(delta_abs)
        } else {
            Change::Percent(percent_change(p1, p2))
        };
        Self {
            name: name.to_string(),
            kind,
            p1,
            p2,
            delta_abs,
            change,
        }
    }
}

/// One dimension key compared across two periods
#[derive(Debug, Clone, PartialEq)]
pub struct ComparedRow {
    /// Dimension key value
    pub key: String,
    /// Per-measure deltas in schema order
    pub measures: Vec<MeasureDelta>,
    /// Absolute delta of the primary measure
    pub delta_abs: f64,
    /// Percent delta of the primary measure
    pub delta_pct: f64,
    /// Share of the total net delta, set by the contribution step
    pub contribution_pct: f64,
}

impl ComparedRow {
    /// Delta for a measure by name
    pub fn measure(&self, name: &str) -> Option<&MeasureDelta> {
        self.measures.iter().find(|m| m.name == name)
    }

    /// Serializable flat view with the key under `key_field`
    pub fn keyed<'a>(&'a self, key_field: &'a str) -> KeyedRow<'a> {
        KeyedRow {
            key_field,
            row: self,
        }
    }
}

/// Flat JSON view of a [`ComparedRow`]
///
/// Field order: key, then per measure `<m>_p1`, `<m>_p2`, `delta_<m>_abs`,
/// `delta_<m>_pct` or `delta_<m>_pp`, then `delta_abs`, `delta_pct`,
/// `contribution_pct`.
pub struct KeyedRow<'a> {
    key_field: &'a str,
    row: &'a ComparedRow,
}

impl Serialize for KeyedRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self.row;
        let mut map = serializer.serialize_map(Some(4 + row.measures.len() * 4))?;
        map.serialize_entry(self.key_field, &row.key)?;
        for m in &row.measures {
            map.serialize_entry(&format!("{}_p1", m.name), &json_number(m.p1))?;
            map.serialize_entry(&format!("{}_p2", m.name), &json_number(m.p2))?;
            map.serialize_entry(&format!("delta_{}_abs", m.name), &json_number(m.delta_abs))?;
            match m.change {
                Change::Percent(v) => {
                    map.serialize_entry(&format!("delta_{}_pct", m.name), &json_number(v))?
                }
                Change::PercentagePoints(v) => {
                    map.serialize_entry(&format!("delta_{}_pp", m.name), &json_number(v))?
                }
            }
        }
        map.serialize_entry("delta_abs", &json_number(row.delta_abs))?;
        map.serialize_entry("delta_pct", &json_number(row.delta_pct))?;
        map.serialize_entry("contribution_pct", &json_number(row.contribution_pct))?;
        map.end()
    }
}

/// Merges two periods of normalized rows by dimension key
pub struct PeriodComparator<'a> {
    schema: &'a AnalysisSchema,
}

impl<'a> PeriodComparator<'a> {
    /// Comparator for rows shaped by `schema`
    pub fn new(schema: &'a AnalysisSchema) -> Self {
        Self { schema }
    }

    /// One [`ComparedRow`] per distinct key in either period
    ///
    /// Keys missing from a period read as all-zero. When a period repeats a
    /// key, the later row wins. `contribution_pct` is left at zero.
    pub fn compare(&self, p1: &[NormalizedRow], p2: &[NormalizedRow]) -> Vec<ComparedRow> {
        let index_p1 = index_by_key(p1);
        let index_p2 = index_by_key(p2);

        let mut seen = HashSet::with_capacity(index_p1.len() + index_p2.len());
        let keys: Vec<&str> = p1
            .iter()
            .chain(p2)
            .map(|r| r.key.as_str())
            .filter(|k| seen.insert(*k))
            .collect();

        keys.into_iter()
            .map(|key| self.compare_key(key, index_p1.get(key), index_p2.get(key)))
            .collect()
    }

    fn compare_key(
        &self,
        key: &str,
        row_p1: Option<&&NormalizedRow>,
        row_p2: Option<&&NormalizedRow>,
    ) -> ComparedRow {
        let value = |row: Option<&&NormalizedRow>, name: &str| row.map_or(0.0, |r| r.value(name));

        let measures: Vec<MeasureDelta> = self
            .schema
            .measures
            .iter()
            .map(|m| MeasureDelta::new(&m.name, m.kind, value(row_p1, &m.name), value(row_p2, &m.name)))
            .collect();

        let primary_p1 = value(row_p1, &self.schema.primary);
        let primary_p2 = value(row_p2, &self.schema.primary);

        ComparedRow {
            key: key.to_string(),
            measures,
            delta_abs: primary_p2 - primary_p1,
            delta_pct: percent_change(primary_p1, primary_p2),
            contribution_pct: 0.0,
        }
    }
}

fn index_by_key(rows: &[NormalizedRow]) -> HashMap<&str, &NormalizedRow> {
    rows.iter().map(|r| (r.key.as_str(), r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisKind;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn visits(key: &str, v: f64) -> NormalizedRow {
        NormalizedRow::new(key).with("visits", v)
    }

    fn sources_schema() -> AnalysisSchema {
        AnalysisKind::Sources.schema()
    }

    #[test]
    fn test_key_only_in_second_period_is_zero_filled() {
        let schema = sources_schema();
        let rows = PeriodComparator::new(&schema).compare(&[], &[visits("direct", 20.0)]);

        assert_eq!(rows.len(), 1);
        let visits = rows[0].measure("visits").unwrap();
        assert_eq!(visits.p1, 0.0);
        assert_eq!(visits.p2, 20.0);
        assert_eq!(rows[0].delta_abs, 20.0);
        assert_eq!(rows[0].delta_pct, 2000.0);
    }

    #[test]
    fn test_key_only_in_first_period_drops_to_zero() {
        let schema = sources_schema();
        let rows = PeriodComparator::new(&schema).compare(&[visits("ads", 40.0)], &[]);

        assert_eq!(rows[0].delta_abs, -40.0);
        assert_eq!(rows[0].delta_pct, -100.0);
    }

    #[test]
    fn test_rate_measures_use_percentage_points() {
        let schema = sources_schema();
        let p1 = [NormalizedRow::new("organic").with("bounceRate", 20.0)];
        let p2 = [NormalizedRow::new("organic").with("bounceRate", 25.5)];

        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        let bounce = rows[0].measure("bounceRate").unwrap();
        assert_eq!(bounce.change, Change::PercentagePoints(5.5));
    }

    #[test]
    fn test_mean_measures_use_relative_change() {
        let schema = sources_schema();
        let p1 = [NormalizedRow::new("organic").with("pageDepth", 2.0)];
        let p2 = [NormalizedRow::new("organic").with("pageDepth", 3.0)];

        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        assert_eq!(
            rows[0].measure("pageDepth").unwrap().change,
            Change::Percent(50.0)
        );
    }

    #[test]
    fn test_duplicate_keys_later_row_wins() {
        let schema = sources_schema();
        let p1 = [visits("organic", 10.0), visits("organic", 30.0)];

        let rows = PeriodComparator::new(&schema).compare(&p1, &[]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].measure("visits").unwrap().p1, 30.0);
    }

    #[test]
    fn test_primary_measure_drives_delta_abs() {
        let schema = AnalysisKind::GoalsBySource.schema();
        let p1 = [NormalizedRow::new("organic")
            .with("visits", 1000.0)
            .with("goal_visits", 10.0)];
        let p2 = [NormalizedRow::new("organic")
            .with("visits", 500.0)
            .with("goal_visits", 15.0)];

        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        assert_eq!(rows[0].delta_abs, 5.0);
        assert_eq!(rows[0].delta_pct, 50.0);
    }

    #[test]
    fn test_keyed_row_serializes_flat_fields_in_order() {
        let schema = AnalysisKind::GscQueries.schema();
        let p1 = [NormalizedRow::new("купить слона")
            .with("clicks", 10.0)
            .with("position", 4.0)];
        let p2 = [NormalizedRow::new("купить слона")
            .with("clicks", 12.0)
            .with("position", 3.0)];

        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        let json = serde_json::to_value(rows[0].keyed("query")).unwrap();

        assert_eq!(json["query"], "купить слона");
        assert_eq!(json["clicks_p1"], 10.0);
        assert_eq!(json["delta_clicks_pct"], 20.0);
        assert_eq!(json["delta_position_pp"], -1.0);
        assert!(json.get("delta_position_pct").is_none());
        assert_eq!(json["delta_abs"], 2.0);

        let text = serde_json::to_string(&rows[0].keyed("query")).unwrap();
        assert!(text.starts_with("{\"query\":"));
        assert!(text.ends_with("\"contribution_pct\":0.0}"));
    }

    fn arb_rows() -> impl Strategy<Value = Vec<NormalizedRow>> {
        prop::collection::vec(("[a-e]{1,2}", 0u32..10_000), 0..20).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(k, v)| visits(&k, f64::from(v)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_output_keys_are_union_without_duplicates(p1 in arb_rows(), p2 in arb_rows()) {
            let schema = sources_schema();
            let rows = PeriodComparator::new(&schema).compare(&p1, &p2);

            let expected: BTreeSet<_> = p1.iter().chain(&p2).map(|r| r.key.clone()).collect();
            let actual: BTreeSet<_> = rows.iter().map(|r| r.key.clone()).collect();
            prop_assert_eq!(rows.len(), actual.len());
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_delta_abs_is_p2_minus_p1(p1 in arb_rows(), p2 in arb_rows()) {
            let schema = sources_schema();
            for row in PeriodComparator::new(&schema).compare(&p1, &p2) {
                let v = row.measure("visits").unwrap();
                prop_assert_eq!(row.delta_abs, v.p2 - v.p1);
                prop_assert!(v.p1.is_finite() && v.p2.is_finite());
            }
        }
    }
}
