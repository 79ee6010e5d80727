use crate::{RowSource, Schema};
use rdfq_model::{literal_sequences_value_equal, Literal, Row};

/// `SELECT DISTINCT` (spec §4.7): suppresses any row whose values are all
/// value-equal to one already yielded, via [`literal_sequences_value_equal`]
/// — the same comparator [`super::Sort`] keys off, so a `NaN` column never
/// collapses two rows together. A linear scan against everything seen so
/// far, since `Literal` has no `Hash` impl to key a `HashSet` with (Design
/// Notes §9 — comparison is contextual, not structural).
pub struct Distinct {
    inner: Box<dyn RowSource>,
    seen: Vec<Vec<Option<Literal>>>,
}

impl Distinct {
    pub fn new(inner: Box<dyn RowSource>) -> Self {
        Self {
            inner,
            seen: Vec::new(),
        }
    }
}

impl RowSource for Distinct {
    fn ensure_variables(&mut self) -> &Schema {
        self.inner.ensure_variables()
    }

    fn read_row(&mut self) -> Option<Row> {
        loop {
            let row = self.inner.read_row()?;
            if self
                .seen
                .iter()
                .any(|values| literal_sequences_value_equal(values, row.values()))
            {
                continue;
            }
            self.seen.push(row.values().to_vec());
            return Some(row);
        }
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.seen.clear();
    }

    fn get_inner(&self, index: usize) -> Option<&dyn RowSource> {
        if index == 0 {
            Some(self.inner.as_ref())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::RowSequence;
    use rdfq_model::{Variable, VariablesTable};

    #[test]
    fn duplicate_rows_are_suppressed() {
        let mut table = VariablesTable::new();
        let x = table.get_or_insert(Variable::new("x"));

        let mut a = Row::with_width(1);
        a.set(0, Some(Literal::from_uri("urn:a")));
        let b = a.clone();
        let inner = Box::new(RowSequence::new(vec![x], vec![a, b]));

        let mut distinct = Distinct::new(inner);
        distinct.ensure_variables();
        assert_eq!(distinct.read_all_rows().len(), 1);
    }
}
