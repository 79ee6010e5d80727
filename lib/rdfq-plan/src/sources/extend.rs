use crate::util::{bind_row, unbind_row};
use crate::{RowSource, Schema};
use rdfq_expr::{EvalContext, EvalOutcome, Expression};
use rdfq_model::{Row, VariableHandle, VariablesTable};
use std::cell::RefCell;
use std::rc::Rc;

/// `BIND(expr AS ?v)` (spec §4.5/§4.7, `GraphPatternKind::Extend`): appends
/// `variable` to the schema and evaluates `expression` against each row
/// from `inner`, binding it when the expression produces a value and
/// leaving it unbound — not dropping the row — when the expression errors
/// or evaluates to null. A row where `variable` already carries a
/// non-null value from `inner` is skipped entirely rather than
/// re-evaluated, since re-binding an already-bound variable is undefined.
pub struct Extend {
    inner: Box<dyn RowSource>,
    variable: VariableHandle,
    expression: Expression,
    vars: Rc<RefCell<VariablesTable>>,
    schema: Schema,
}

impl Extend {
    pub fn new(
        inner: Box<dyn RowSource>,
        variable: VariableHandle,
        expression: Expression,
        vars: Rc<RefCell<VariablesTable>>,
    ) -> Self {
        Self {
            inner,
            variable,
            expression,
            vars,
            schema: Schema::default(),
        }
    }
}

impl RowSource for Extend {
    fn ensure_variables(&mut self) -> &Schema {
        let mut variables = self.inner.ensure_variables().variables().to_vec();
        if !variables.contains(&self.variable) {
            variables.push(self.variable);
        }
        self.schema = Schema::new(variables);
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        let inner_schema = self.inner.ensure_variables().clone();
        let row = loop {
            let row = self.inner.read_row()?;
            let already_bound = inner_schema
                .position(self.variable)
                .is_some_and(|pos| row.get(pos).is_some());
            if !already_bound {
                break row;
            }
        };
        let mut out = Row::with_width(self.schema.width());
        for (i, handle) in self.schema.variables().iter().enumerate() {
            if let Some(pos) = inner_schema.position(*handle) {
                out.set(i, row.get(pos).cloned());
            }
        }
        let previous = bind_row(&self.vars, &inner_schema, &row);
        let value = {
            let table = self.vars.borrow();
            let ctx = EvalContext::new(&table);
            ctx.evaluate(&self.expression).ok().and_then(|outcome| match outcome {
                EvalOutcome::Value(l) => Some(l),
                EvalOutcome::Null => None,
            })
        };
        unbind_row(&self.vars, previous);
        if let Some(value) = value {
            if let Some(pos) = self.schema.position(self.variable) {
                out.set(pos, Some(value));
            }
        }
        Some(out)
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
    fn bind_adds_a_computed_column() {
        let vars = Rc::new(RefCell::new(VariablesTable::new()));
        let x = vars.borrow_mut().get_or_insert(Variable::new("x"));
        let doubled = vars.borrow_mut().get_or_insert(Variable::new("doubled"));

        let mut row = Row::with_width(1);
        row.set(0, Some(Literal::from_i64(21)));
        let inner = Box::new(RowSequence::new(vec![x], vec![row]));

        let expr = Expression::Add(
            Box::new(Expression::Variable(Variable::new("x"))),
            Box::new(Expression::Variable(Variable::new("x"))),
        );
        let mut extend = Extend::new(inner, doubled, expr, vars);
        extend.ensure_variables();
        let rows = extend.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(1).unwrap().same_term(&Literal::from_i64(42)));
    }

    #[test]
    fn row_already_binding_the_target_variable_is_skipped() {
        let vars = Rc::new(RefCell::new(VariablesTable::new()));
        let x = vars.borrow_mut().get_or_insert(Variable::new("x"));

        let mut already_bound = Row::with_width(1);
        already_bound.set(0, Some(Literal::from_i64(1)));
        let mut unbound = Row::with_width(1);
        unbound.set(0, None);
        let inner = Box::new(RowSequence::new(vec![x], vec![already_bound, unbound]));

        let expr = Expression::Constant(Literal::from_i64(99));
        let mut extend = Extend::new(inner, x, expr, vars);
        extend.ensure_variables();
        let rows = extend.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_i64(99)));
    }
}
