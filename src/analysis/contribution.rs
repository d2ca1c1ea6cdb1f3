//! Contribution of each row to the net change

use super::comparator::ComparedRow;

/// Set `contribution_pct` on every row and return the total net delta
///
/// Each row's share is `delta_abs / Σ delta_abs * 100`. Shares are not
/// clamped: when rows move in opposite directions a single row can exceed
/// 100% or go negative. A zero net delta gives every row 0.
pub fn apply_contributions(rows: &mut [ComparedRow]) -> f64 {
    let total_net_delta: f64 = rows.iter().map(|r| r.delta_abs).sum();

    for row in rows.iter_mut() {
        row.contribution_pct = if total_net_delta == 0.0 {
            0.0
        } else {
            row.delta_abs / total_net_delta * 100.0
        };
    }

    total_net_delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisKind, NormalizedRow, PeriodComparator};
    use proptest::prelude::*;

    fn compared(deltas: &[(&str, f64, f64)]) -> Vec<ComparedRow> {
        let schema = AnalysisKind::Sources.schema();
        let p1: Vec<_> = deltas
            .iter()
            .map(|(k, v1, _)| NormalizedRow::new(*k).with("visits", *v1))
            .collect();
        let p2: Vec<_> = deltas
            .iter()
            .map(|(k, _, v2)| NormalizedRow::new(*k).with("visits", *v2))
            .collect();
        PeriodComparator::new(&schema).compare(&p1, &p2)
    }

    #[test]
    fn test_contributions_split_net_growth() {
        let mut rows = compared(&[("organic", 100.0, 150.0), ("direct", 0.0, 20.0)]);
        let total = apply_contributions(&mut rows);

        assert_eq!(total, 70.0);
        assert!((rows[0].contribution_pct - 71.428_571).abs() < 1e-4);
        assert!((rows[1].contribution_pct - 28.571_428).abs() < 1e-4);
    }

    #[test]
    fn test_zero_net_change_gives_zero_contributions() {
        let mut rows = compared(&[("a", 100.0, 150.0), ("b", 50.0, 0.0)]);
        let total = apply_contributions(&mut rows);

        assert_eq!(total, 0.0);
        assert!(rows.iter().all(|r| r.contribution_pct == 0.0));
    }

    #[test]
    fn test_opposing_moves_are_not_clamped() {
        let mut rows = compared(&[("up", 0.0, 300.0), ("down", 200.0, 0.0)]);
        apply_contributions(&mut rows);

        assert_eq!(rows[0].contribution_pct, 300.0);
        assert_eq!(rows[1].contribution_pct, -200.0);
    }

    proptest! {
        #[test]
        fn prop_contributions_sum_to_100_or_all_zero(
            values in prop::collection::vec((0u32..10_000, 0u32..10_000), 1..30)
        ) {
            let keyed: Vec<(String, f64, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, (a, b))| (format!("k{i}"), f64::from(*a), f64::from(*b)))
                .collect();
            let borrowed: Vec<(&str, f64, f64)> =
                keyed.iter().map(|(k, a, b)| (k.as_str(), *a, *b)).collect();

            let mut rows = compared(&borrowed);
            let total = apply_contributions(&mut rows);
            let sum: f64 = rows.iter().map(|r| r.contribution_pct).sum();

            if total == 0.0 {
                prop_assert!(rows.iter().all(|r| r.contribution_pct == 0.0));
            } else {
                prop_assert!((sum - 100.0).abs() < 1e-6, "sum was {}", sum);
            }
        }
    }
}
