//! Deterministic impact ordering

use super::comparator::ComparedRow;

/// Sort rows by largest absolute primary delta first, then by key
///
/// Keys are unique after comparison, so this is a total order and the
/// result does not depend on input order.
pub fn rank_rows(rows: &mut [ComparedRow]) {
    rows.sort_by(|a, b| {
        b.delta_abs
            .abs()
            .total_cmp(&a.delta_abs.abs())
            .then_with(|| a.key.cmp(&b.key))
    });
}
