use crate::util::{bind_row, unbind_row};
use crate::{RowSource, Schema};
use rdfq_expr::{EvalContext, Expression};
use rdfq_model::{Row, VariablesTable};
use std::cell::RefCell;
use std::rc::Rc;

/// Evaluates a conjunction of filter expressions against each row from
/// `inner`, keeping only the rows whose effective boolean value is `true`
/// (spec §4.5/§4.7): an expression error — a type error, or an unbound
/// operand with no sensible EBV — makes that filter (and so the row) false
/// rather than propagating, per spec §4.5's "errors become false".
pub struct Filter {
    inner: Box<dyn RowSource>,
    filters: Vec<Expression>,
    vars: Rc<RefCell<VariablesTable>>,
}

impl Filter {
    pub fn new(
        inner: Box<dyn RowSource>,
        filters: Vec<Expression>,
        vars: Rc<RefCell<VariablesTable>>,
    ) -> Self {
        Self {
            inner,
            filters,
            vars,
        }
    }

    fn passes(&self, schema: &Schema, row: &Row) -> bool {
        let previous = bind_row(&self.vars, schema, row);
        let table = self.vars.borrow();
        let ctx = EvalContext::new(&table);
        let result = self
            .filters
            .iter()
            .all(|expr| matches!(ctx.evaluate(expr), Ok(outcome) if ebv(&outcome)));
        drop(table);
        unbind_row(&self.vars, previous);
        result
    }
}

fn ebv(outcome: &rdfq_expr::EvalOutcome) -> bool {
    match outcome {
        rdfq_expr::EvalOutcome::Value(l) => l.effective_boolean_value().unwrap_or(false),
        rdfq_expr::EvalOutcome::Null => false,
    }
}

impl RowSource for Filter {
    fn ensure_variables(&mut self) -> &Schema {
        self.inner.ensure_variables()
    }

    fn read_row(&mut self) -> Option<Row> {
        let schema = self.inner.ensure_variables().clone();
        loop {
            let row = self.inner.read_row()?;
            if self.passes(&schema, &row) {
                return Some(row);
            }
        }
    }

    fn reset(&mut self) {
        self.inner.reset();
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
    use rdfq_model::{Literal, Variable};

    #[test]
    fn rows_failing_the_filter_are_dropped() {
        let vars = Rc::new(RefCell::new(VariablesTable::new()));
        let x = vars.borrow_mut().get_or_insert(Variable::new("x"));

        let mut one = Row::with_width(1);
        one.set(0, Some(Literal::from_i64(1)));
        let mut two = Row::with_width(1);
        two.set(0, Some(Literal::from_i64(2)));
        let inner = Box::new(RowSequence::new(vec![x], vec![one, two]));

        let expr = Expression::Greater(
            Box::new(Expression::Variable(Variable::new("x"))),
            Box::new(Expression::Constant(Literal::from_i64(1))),
        );
        let mut filter = Filter::new(inner, vec![expr], vars);
        filter.ensure_variables();
        let rows = filter.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_i64(2)));
    }
}
