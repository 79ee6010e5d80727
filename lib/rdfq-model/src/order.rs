use crate::{ComparisonMode, Literal};
use std::cmp::Ordering;

/// Whether an order-by entry sorts ascending or descending (spec §4.2's
/// `Asc`/`Desc` wrappers).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Lifts [`Literal::compare`] to lexicographic order over an array of
/// literals — the comparator `Sort` and `Distinct` both key off (spec
/// §4.2). Unbound (`None`) entries sort first; a `Desc` direction inverts
/// the sign of its column's contribution. A type error on any column
/// degrades to `Ordering::Equal` for that column (an incomparable pair
/// never panics — a `Sort` row source that can't decide an order keeps the
/// rows in their relative input order, i.e. a stable sort).
pub fn compare_literal_sequences(
    a: &[Option<Literal>],
    b: &[Option<Literal>],
    directions: &[SortDirection],
    mode: ComparisonMode,
) -> Ordering {
    for (i, (av, bv)) in a.iter().zip(b.iter()).enumerate() {
        let direction = directions.get(i).copied().unwrap_or(SortDirection::Asc);
        let column = match (av, bv) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(av), Some(bv)) => av.compare(bv, mode).unwrap_or(Ordering::Equal),
        };
        let column = if direction == SortDirection::Desc {
            column.reverse()
        } else {
            column
        };
        if column != Ordering::Equal {
            return column;
        }
    }
    Ordering::Equal
}

/// Value equality over an array of literals under the same rules, used by
/// `Distinct`'s dedup key (spec §4.7): two rows with the same values under
/// value equality are the same row, NaN notwithstanding (NaN never equals
/// itself, so two rows both containing NaN in a column are never merged,
/// matching IEEE 754 semantics and the `compare` that backs it).
pub fn literal_sequences_value_equal(a: &[Option<Literal>], b: &[Option<Literal>]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(av, bv)| match (av, bv) {
        (None, None) => true,
        (Some(av), Some(bv)) => av
            .compare(bv, ComparisonMode::XQuery)
            .map(|o| o == Ordering::Equal)
            .unwrap_or(false),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Literal;

    #[test]
    fn unbound_sorts_first() {
        let a = vec![None];
        let b = vec![Some(Literal::from_i64(1))];
        assert_eq!(
            compare_literal_sequences(&a, &b, &[SortDirection::Asc], ComparisonMode::XQuery),
            Ordering::Less
        );
    }

    #[test]
    fn desc_inverts_only_its_column() {
        let a = vec![Some(Literal::from_i64(1)), Some(Literal::from_i64(1))];
        let b = vec![Some(Literal::from_i64(2)), Some(Literal::from_i64(0))];
        let dirs = [SortDirection::Desc, SortDirection::Asc];
        assert_eq!(
            compare_literal_sequences(&a, &b, &dirs, ComparisonMode::XQuery),
            Ordering::Greater
        );
    }

    #[test]
    fn nan_rows_never_merge_in_distinct() {
        let a = vec![Some(Literal::from_f64(f64::NAN))];
        let b = vec![Some(Literal::from_f64(f64::NAN))];
        assert!(!literal_sequences_value_equal(&a, &b));
    }
}
