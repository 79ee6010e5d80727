use crate::{RowSource, Schema};
use rdfq_model::Row;

/// `OFFSET`/`LIMIT` (spec §4.7): skips the first `offset` rows from `inner`,
/// then yields at most `limit` more. `limit: None` means unbounded — spec
/// §3's "negative = unset" `i64` encoding is translated to this at the plan
/// builder, not carried through to the row-source layer.
pub struct Slice {
    inner: Box<dyn RowSource>,
    offset: usize,
    limit: Option<usize>,
    skipped: usize,
    yielded: usize,
}

impl Slice {
    pub fn new(inner: Box<dyn RowSource>, offset: usize, limit: Option<usize>) -> Self {
        Self {
            inner,
            offset,
            limit,
            skipped: 0,
            yielded: 0,
        }
    }
}

impl RowSource for Slice {
    fn ensure_variables(&mut self) -> &Schema {
        self.inner.ensure_variables()
    }

    fn read_row(&mut self) -> Option<Row> {
        if let Some(limit) = self.limit {
            if self.yielded >= limit {
                return None;
            }
        }
        while self.skipped < self.offset {
            self.inner.read_row()?;
            self.skipped += 1;
        }
        let row = self.inner.read_row()?;
        self.yielded += 1;
        Some(row)
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.skipped = 0;
        self.yielded = 0;
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
    use rdfq_model::{Literal, Variable, VariablesTable};

    #[test]
    fn offset_then_limit() {
        let mut table = VariablesTable::new();
        let x = table.get_or_insert(Variable::new("x"));
        let rows: Vec<Row> = (0..5)
            .map(|i| {
                let mut row = Row::with_width(1);
                row.set(0, Some(Literal::from_i64(i)));
                row
            })
            .collect();
        let inner = Box::new(RowSequence::new(vec![x], rows));
        let mut slice = Slice::new(inner, 1, Some(2));
        slice.ensure_variables();
        let out = slice.read_all_rows();
        assert_eq!(out.len(), 2);
        assert!(out[0].get(0).unwrap().same_term(&Literal::from_i64(1)));
        assert!(out[1].get(0).unwrap().same_term(&Literal::from_i64(2)));
    }
}
