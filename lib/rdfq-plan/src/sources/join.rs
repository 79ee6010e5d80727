use crate::util::{merge_rows, rows_compatible, union_schema};
use crate::{RowSource, Schema};
use rdfq_model::Row;

/// The general binary nested-loop join (spec §4.7, "Join"): for each row of
/// `left`, scans all of `right` and yields the merge of every compatible
/// pair. `right` is rewound between outer rows, so its inputs must support
/// `reset`. Used to fold an n-ary `Group` of non-`Basic` children into a
/// left-deep chain, binary join by binary join, in source order.
pub struct Join {
    left: Box<dyn RowSource>,
    right: Box<dyn RowSource>,
    schema: Schema,
    left_row: Option<Row>,
}

impl Join {
    pub fn new(left: Box<dyn RowSource>, right: Box<dyn RowSource>) -> Self {
        Self {
            left,
            right,
            schema: Schema::default(),
            left_row: None,
        }
    }

    fn advance_left(&mut self) -> bool {
        match self.left.read_row() {
            Some(row) => {
                self.left_row = Some(row);
                self.right.reset();
                true
            }
            None => {
                self.left_row = None;
                false
            }
        }
    }
}

impl RowSource for Join {
    fn ensure_variables(&mut self) -> &Schema {
        let left_schema = self.left.ensure_variables().clone();
        let right_schema = self.right.ensure_variables().clone();
        self.schema = union_schema(&left_schema, &right_schema);
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        loop {
            if self.left_row.is_none() && !self.advance_left() {
                return None;
            }
            let left_schema = self.left.ensure_variables().clone();
            let right_schema = self.right.ensure_variables().clone();
            match self.right.read_row() {
                Some(right_row) => {
                    let left_row = self.left_row.as_ref().unwrap();
                    if rows_compatible(left_row, &left_schema, &right_row, &right_schema) {
                        return Some(merge_rows(
                            left_row,
                            &left_schema,
                            &right_row,
                            &right_schema,
                            &self.schema,
                        ));
                    }
                }
                None => self.left_row = None,
            }
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.left_row = None;
    }

    fn get_inner(&self, index: usize) -> Option<&dyn RowSource> {
        match index {
            0 => Some(self.left.as_ref()),
            1 => Some(self.right.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::RowSequence;
    use rdfq_model::{Literal, VariablesTable};

    #[test]
    fn join_keeps_only_compatible_pairs() {
        let mut table = VariablesTable::new();
        let x = table.get_or_insert(rdfq_model::Variable::new("x"));
        let y = table.get_or_insert(rdfq_model::Variable::new("y"));

        let mut left_a = Row::with_width(1);
        left_a.set(0, Some(Literal::from_uri("urn:a")));
        let mut left_b = Row::with_width(1);
        left_b.set(0, Some(Literal::from_uri("urn:b")));
        let left = Box::new(RowSequence::new(vec![x], vec![left_a, left_b]));

        let mut right_a = Row::with_width(2);
        right_a.set(0, Some(Literal::from_uri("urn:a")));
        right_a.set(1, Some(Literal::from_i64(1)));
        let right = Box::new(RowSequence::new(vec![x, y], vec![right_a]));

        let mut join = Join::new(left, right);
        join.ensure_variables();
        let rows = join.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_uri("urn:a")));
        assert!(rows[0].get(1).unwrap().same_term(&Literal::from_i64(1)));
    }
}
