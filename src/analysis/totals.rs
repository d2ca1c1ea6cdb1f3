//! Totals across all compared rows

use super::comparator::{percent_change, ComparedRow};
use super::row::json_number;
use super::schema::AnalysisSchema;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Summed count measure
#[derive(Debug, Clone, PartialEq)]
pub struct TotalMeasure {
    /// Measure name
    pub name: String,
    /// Sum over period 1
    pub p1: f64,
    /// Sum over period 2
    pub p2: f64,
    /// `p2 - p1`
    pub delta_abs: f64,
    /// Percent change with the 1.0 baseline floor
    pub delta_pct: f64,
}

/// Rate recomputed from summed counts
#[derive(Debug, Clone, PartialEq)]
pub struct TotalRate {
    /// Rate name
    pub name: String,
    /// Period 1 rate in percent
    pub p1: f64,
    /// Period 2 rate in percent
    pub p2: f64,
    /// Change in percentage points
    pub delta_pp: f64,
}

/// Totals for a comparison, computed from raw per-row values
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    /// Primary measure name
    pub primary: String,
    /// Additive measures in schema order
    pub measures: Vec<TotalMeasure>,
    /// Derived rates
    pub rates: Vec<TotalRate>,
}

impl Totals {
    /// Sum every additive measure over `rows` and derive the schema's rates
    ///
    /// Pass the full compared set, not a truncated top-N.
    pub fn from_rows(schema: &AnalysisSchema, rows: &[ComparedRow]) -> Self {
        let sum = |name: &str| -> (f64, f64) {
            rows.iter()
                .filter_map(|r| r.measure(name))
                .fold((0.0, 0.0), |(a, b), m| (a + m.p1, b + m.p2))
        };

        let measures = schema
            .measures
            .iter()
            .filter(|m| m.kind.is_additive())
            .map(|m| {
                let (p1, p2) = sum(&m.name);
                TotalMeasure {
                    name: m.name.clone(),
                    p1,
                    p2,
                    delta_abs: p2 - p1,
                    delta_pct: percent_change(p1, p2),
                }
            })
            .collect();

        let rates = schema
            .derived_rates
            .iter()
            .map(|rate| {
                let (num_p1, num_p2) = sum(&rate.numerator);
                let (den_p1, den_p2) = sum(&rate.denominator);
                let p1 = num_p1 / den_p1.max(1.0) * 100.0;
                let p2 = num_p2 / den_p2.max(1.0) * 100.0;
                TotalRate {
                    name: rate.name.clone(),
                    p1,
                    p2,
                    delta_pp: p2 - p1,
                }
            })
            .collect();

        Self {
            primary: schema.primary.clone(),
            measures,
            rates,
        }
    }

    /// Total for a measure by name
    pub fn measure(&self, name: &str) -> Option<&TotalMeasure> {
        self.measures.iter().find(|m| m.name == name)
    }

    /// Net delta of the primary measure
    pub fn total_delta_abs(&self) -> f64 {
        self.measure(&self.primary).map_or(0.0, |m| m.delta_abs)
    }

    /// Percent change of the primary measure
    pub fn total_delta_pct(&self) -> f64 {
        self.measure(&self.primary).map_or(0.0, |m| m.delta_pct)
    }
}

impl Serialize for Totals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for m in &self.measures {
            map.serialize_entry(&format!("total_{}_p1", m.name), &json_number(m.p1))?;
            map.serialize_entry(&format!("total_{}_p2", m.name), &json_number(m.p2))?;
            map.serialize_entry(&format!("total_delta_{}_abs", m.name), &json_number(m.delta_abs))?;
            map.serialize_entry(&format!("total_delta_{}_pct", m.name), &json_number(m.delta_pct))?;
        }
        for r in &self.rates {
            map.serialize_entry(&format!("total_{}_p1", r.name), &json_number(r.p1))?;
            map.serialize_entry(&format!("total_{}_p2", r.name), &json_number(r.p2))?;
            map.serialize_entry(&format!("total_delta_{}_pp", r.name), &json_number(r.delta_pp))?;
        }
        map.serialize_entry("total_delta_abs", &json_number(self.total_delta_abs()))?;
        map.serialize_entry("total_delta_pct", &json_number(self.total_delta_pct()))?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisKind, NormalizedRow, PeriodComparator};
    use proptest::prelude::*;

    #[test]
    fn test_totals_sum_counts_and_skip_means() {
        let schema = AnalysisKind::Sources.schema();
        let p1 = [
            NormalizedRow::new("organic").with("visits", 100.0).with("users", 80.0),
            NormalizedRow::new("direct").with("pageDepth", 3.0),
        ];
        let p2 = [
            NormalizedRow::new("organic").with("visits", 150.0).with("users", 90.0),
            NormalizedRow::new("direct").with("visits", 20.0),
        ];
        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        let totals = Totals::from_rows(&schema, &rows);

        let visits = totals.measure("visits").unwrap();
        assert_eq!((visits.p1, visits.p2), (100.0, 170.0));
        assert_eq!(totals.total_delta_abs(), 70.0);
        assert_eq!(totals.total_delta_pct(), 70.0);
        assert!(totals.measure("pageDepth").is_none());
        assert!(totals.measure("bounceRate").is_none());
    }

    #[test]
    fn test_goal_conversion_rate_from_summed_counts() {
        let schema = AnalysisKind::GoalsBySource.schema();
        let p1 = [NormalizedRow::new("organic")
            .with("visits", 200.0)
            .with("goal_visits", 4.0)];
        let p2 = [NormalizedRow::new("organic")
            .with("visits", 100.0)
            .with("goal_visits", 5.0)];
        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        let totals = Totals::from_rows(&schema, &rows);

        let cr = &totals.rates[0];
        assert_eq!(cr.name, "goal_cr");
        assert_eq!(cr.p1, 2.0);
        assert_eq!(cr.p2, 5.0);
        assert_eq!(cr.delta_pp, 3.0);
    }

    #[test]
    fn test_derived_rate_denominator_is_floored() {
        let schema = AnalysisKind::GscPages.schema();
        let p2 = [NormalizedRow::new("/").with("clicks", 1.0)];
        let rows = PeriodComparator::new(&schema).compare(&[], &p2);
        let totals = Totals::from_rows(&schema, &rows);

        assert_eq!(totals.rates[0].p1, 0.0);
        assert_eq!(totals.rates[0].p2, 100.0);
    }

    #[test]
    fn test_totals_serialize_flat_keys() {
        let schema = AnalysisKind::GscQueries.schema();
        let p1 = [NormalizedRow::new("q")
            .with("clicks", 10.0)
            .with("impressions", 100.0)];
        let p2 = [NormalizedRow::new("q")
            .with("clicks", 20.0)
            .with("impressions", 100.0)];
        let rows = PeriodComparator::new(&schema).compare(&p1, &p2);
        let json = serde_json::to_value(Totals::from_rows(&schema, &rows)).unwrap();

        assert_eq!(json["total_clicks_p2"], 20.0);
        assert_eq!(json["total_delta_impressions_abs"], 0.0);
        assert_eq!(json["total_delta_ctr_pp"], 10.0);
        assert_eq!(json["total_delta_abs"], 10.0);
        assert_eq!(json["total_delta_pct"], 100.0);
    }

    proptest! {
        #[test]
        fn prop_total_delta_matches_row_deltas(
            p1 in prop::collection::vec(("[a-f]", 0u32..100_000), 0..15),
            p2 in prop::collection::vec(("[a-f]", 0u32..100_000), 0..15)
        ) {
            let schema = AnalysisKind::Pages.schema();
            let to_rows = |pairs: &[(String, u32)]| -> Vec<NormalizedRow> {
                pairs
                    .iter()
                    .map(|(k, v)| NormalizedRow::new(k.clone()).with("visits", f64::from(*v)))
                    .collect()
            };
            let rows = PeriodComparator::new(&schema).compare(&to_rows(&p1), &to_rows(&p2));
            let totals = Totals::from_rows(&schema, &rows);
            let row_sum: f64 = rows.iter().map(|r| r.delta_abs).sum();

            prop_assert!((totals.total_delta_abs() - row_sum).abs() < 1e-9);
        }
    }
}
