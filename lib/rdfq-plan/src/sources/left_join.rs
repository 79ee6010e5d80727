use crate::util::{bind_row, merge_rows, reposition, rows_compatible, union_schema, unbind_row};
use crate::{RowSource, Schema};
use rdfq_expr::{EvalContext, EvalOutcome, Expression};
use rdfq_model::{Row, VariablesTable};
use std::cell::RefCell;
use std::rc::Rc;

/// The binary left (outer) join spec §4.7 describes for `Optional`: for
/// each row of `left`, scans all of `right` and yields every compatible
/// merge; if none of `right`'s rows are compatible, yields `left`'s row
/// once with `right`'s columns left unbound rather than dropping it. Folds
/// an n-ary `Optional` into a left-deep chain the same way [`super::Join`]
/// folds `Group`.
///
/// Filter expressions attached to the optional arm (via
/// [`LeftJoin::with_filters`]) are evaluated inside this inner loop,
/// against the merged row, so they can reference either side's variables;
/// a merged row failing one is treated as a non-match, same as an
/// incompatible one, rather than as a dropped row.
pub struct LeftJoin {
    left: Box<dyn RowSource>,
    right: Box<dyn RowSource>,
    schema: Schema,
    left_row: Option<Row>,
    matched_current_left: bool,
    filters: Vec<Expression>,
    vars: Option<Rc<RefCell<VariablesTable>>>,
}

impl LeftJoin {
    pub fn new(left: Box<dyn RowSource>, right: Box<dyn RowSource>) -> Self {
        Self {
            left,
            right,
            schema: Schema::default(),
            left_row: None,
            matched_current_left: false,
            filters: Vec::new(),
            vars: None,
        }
    }

    /// Attaches the optional arm's own filter expressions, evaluated
    /// against the merged row before it is accepted as a match.
    pub fn with_filters(mut self, filters: Vec<Expression>, vars: Rc<RefCell<VariablesTable>>) -> Self {
        self.filters = filters;
        self.vars = Some(vars);
        self
    }

    fn passes_filters(&self, row: &Row) -> bool {
        if self.filters.is_empty() {
            return true;
        }
        let Some(vars) = &self.vars else {
            return true;
        };
        let previous = bind_row(vars, &self.schema, row);
        let table = vars.borrow();
        let ctx = EvalContext::new(&table);
        let result = self.filters.iter().all(|expr| {
            matches!(
                ctx.evaluate(expr),
                Ok(EvalOutcome::Value(l)) if l.effective_boolean_value().unwrap_or(false)
            )
        });
        drop(table);
        unbind_row(vars, previous);
        result
    }

    fn advance_left(&mut self) -> bool {
        match self.left.read_row() {
            Some(row) => {
                self.left_row = Some(row);
                self.matched_current_left = false;
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

impl RowSource for LeftJoin {
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
                        let merged = merge_rows(
                            left_row,
                            &left_schema,
                            &right_row,
                            &right_schema,
                            &self.schema,
                        );
                        if self.passes_filters(&merged) {
                            self.matched_current_left = true;
                            return Some(merged);
                        }
                    }
                }
                None => {
                    let left_row = self.left_row.take().unwrap();
                    if !self.matched_current_left {
                        return Some(reposition(&left_row, &left_schema, &self.schema));
                    }
                }
            }
        }
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.left_row = None;
        self.matched_current_left = false;
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
    fn unmatched_left_row_survives_with_right_unbound() {
        let mut table = VariablesTable::new();
        let x = table.get_or_insert(rdfq_model::Variable::new("x"));
        let y = table.get_or_insert(rdfq_model::Variable::new("y"));

        let mut left_row = Row::with_width(1);
        left_row.set(0, Some(Literal::from_uri("urn:a")));
        let left = Box::new(RowSequence::new(vec![x], vec![left_row]));
        let right = Box::new(RowSequence::new(vec![y], Vec::new()));

        let mut lj = LeftJoin::new(left, right);
        lj.ensure_variables();
        let rows = lj.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_uri("urn:a")));
        assert!(rows[0].get(1).is_none());
    }

    #[test]
    fn filter_failing_the_merged_row_falls_back_to_unbound_right() {
        use rdfq_model::Variable;

        let vars = Rc::new(RefCell::new(VariablesTable::new()));
        let x = vars.borrow_mut().get_or_insert(Variable::new("x"));
        let y = vars.borrow_mut().get_or_insert(Variable::new("y"));

        let mut left_row = Row::with_width(1);
        left_row.set(0, Some(Literal::from_uri("urn:a")));
        let left = Box::new(RowSequence::new(vec![x], vec![left_row]));

        let mut right_row = Row::with_width(1);
        right_row.set(0, Some(Literal::from_i64(1)));
        let right = Box::new(RowSequence::new(vec![y], vec![right_row]));

        let expr = Expression::Greater(
            Box::new(Expression::Variable(Variable::new("y"))),
            Box::new(Expression::Constant(Literal::from_i64(5))),
        );
        let mut lj = LeftJoin::new(left, right).with_filters(vec![expr], vars);
        lj.ensure_variables();
        let rows = lj.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_uri("urn:a")));
        assert!(rows[0].get(1).is_none());
    }
}
