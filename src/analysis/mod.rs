//! Period-over-period comparison engine
//!
//! Rows for two periods go through four steps:
//! 1. [`PeriodComparator`] merges them by dimension key
//! 2. [`apply_contributions`] assigns each key its share of the net change
//! 3. [`rank_rows`] orders keys by impact
//! 4. [`Totals`] sums the full row set for the workbook
//!
//! Everything is driven by an [`AnalysisSchema`], so one comparator serves
//! traffic, goal, search-console and webmaster analyses alike.

pub mod comparator;
pub mod contribution;
pub mod period;
pub mod ranker;
pub mod row;
pub mod schema;
pub mod totals;

pub use comparator::{percent_change, Change, ComparedRow, MeasureDelta, PeriodComparator};
pub use contribution::apply_contributions;
pub use period::Period;
pub use ranker::rank_rows;
pub use row::{NormalizedRow, UNKNOWN_KEY};
pub use schema::{AnalysisKind, AnalysisSchema, Measure, MeasureKind, Provider};
pub use totals::Totals;

/// Compare, attribute and rank in one call
///
/// # Examples
///
/// ```
/// use traffic_audit::analysis::{compare_periods, AnalysisKind, NormalizedRow};
///
/// let schema = AnalysisKind::Sources.schema();
/// let p1 = vec![NormalizedRow::new("organic").with("visits", 100.0)];
/// let p2 = vec![
///     NormalizedRow::new("organic").with("visits", 150.0),
///     NormalizedRow::new("direct").with("visits", 20.0),
/// ];
///
/// let rows = compare_periods(&schema, &p1, &p2);
/// assert_eq!(rows[0].key, "organic");
/// assert!((rows[0].contribution_pct - 71.43).abs() < 0.01);
/// ```
pub fn compare_periods(
    schema: &AnalysisSchema,
    p1: &[NormalizedRow],
    p2: &[NormalizedRow],
) -> Vec<ComparedRow> {
    let mut rows = PeriodComparator::new(schema).compare(p1, p2);
    apply_contributions(&mut rows);
    rank_rows(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_contribution_and_ranking() {
        let schema = AnalysisKind::Sources.schema();
        let p1 = vec![NormalizedRow::new("organic").with("visits", 100.0)];
        let p2 = vec![
            NormalizedRow::new("organic").with("visits", 150.0),
            NormalizedRow::new("direct").with("visits", 20.0),
        ];

        let rows = compare_periods(&schema, &p1, &p2);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "organic");
        assert_eq!(rows[0].delta_abs, 50.0);
        assert!((rows[0].contribution_pct - 71.43).abs() < 0.01);
        assert_eq!(rows[1].key, "direct");
        assert_eq!(rows[1].delta_abs, 20.0);
        assert!((rows[1].contribution_pct - 28.57).abs() < 0.01);
    }
}
