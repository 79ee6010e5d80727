use crate::util::{reposition, union_schema};
use crate::{RowSource, Schema};
use rdfq_model::Row;

/// `UNION` (spec §4.7): yields every row of `left` reprojected onto the
/// combined schema, then every row of `right` likewise — no compatibility
/// check, unlike [`super::Join`]. An n-ary `Union` folds into a left-deep
/// chain of these the same way `Group`/`Optional` fold into `Join`/`LeftJoin`.
pub struct Union {
    left: Box<dyn RowSource>,
    right: Box<dyn RowSource>,
    schema: Schema,
    on_right: bool,
}

impl Union {
    pub fn new(left: Box<dyn RowSource>, right: Box<dyn RowSource>) -> Self {
        Self {
            left,
            right,
            schema: Schema::default(),
            on_right: false,
        }
    }
}

impl RowSource for Union {
    fn ensure_variables(&mut self) -> &Schema {
        let left_schema = self.left.ensure_variables().clone();
        let right_schema = self.right.ensure_variables().clone();
        self.schema = union_schema(&left_schema, &right_schema);
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        if !self.on_right {
            let left_schema = self.left.ensure_variables().clone();
            if let Some(row) = self.left.read_row() {
                return Some(reposition(&row, &left_schema, &self.schema));
            }
            self.on_right = true;
        }
        let right_schema = self.right.ensure_variables().clone();
        self.right
            .read_row()
            .map(|row| reposition(&row, &right_schema, &self.schema))
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.on_right = false;
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
    fn union_concatenates_both_sides() {
        let mut table = VariablesTable::new();
        let x = table.get_or_insert(rdfq_model::Variable::new("x"));

        let mut a = Row::with_width(1);
        a.set(0, Some(Literal::from_uri("urn:a")));
        let mut b = Row::with_width(1);
        b.set(0, Some(Literal::from_uri("urn:b")));

        let left = Box::new(RowSequence::new(vec![x], vec![a]));
        let right = Box::new(RowSequence::new(vec![x], vec![b]));
        let mut u = Union::new(left, right);
        u.ensure_variables();
        assert_eq!(u.read_all_rows().len(), 2);
    }
}
