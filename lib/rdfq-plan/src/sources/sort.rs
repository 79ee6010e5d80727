use crate::util::{bind_row, unbind_row};
use crate::{RowSource, Schema};
use rdfq_algebra::OrderCondition;
use rdfq_expr::{EvalContext, EvalOutcome};
use rdfq_model::{compare_literal_sequences, ComparisonMode, Literal, Row, SortDirection, VariablesTable};
use std::cell::RefCell;
use std::rc::Rc;

/// `ORDER BY` (spec §4.2/§4.7): materializes `inner` fully, evaluates each
/// `ORDER BY` key expression per row, and sorts by
/// [`compare_literal_sequences`] — the same comparator spec §4.2 defines for
/// sequences of literals, direction by direction. A stable sort, so rows
/// that compare equal on every key keep their input relative order.
pub struct Sort {
    inner: Box<dyn RowSource>,
    conditions: Vec<OrderCondition>,
    vars: Rc<RefCell<VariablesTable>>,
    schema: Schema,
    rows: Option<Vec<Row>>,
    position: usize,
}

impl Sort {
    pub fn new(
        inner: Box<dyn RowSource>,
        conditions: Vec<OrderCondition>,
        vars: Rc<RefCell<VariablesTable>>,
    ) -> Self {
        Self {
            inner,
            conditions,
            vars,
            schema: Schema::default(),
            rows: None,
            position: 0,
        }
    }

    fn key_of(&self, schema: &Schema, row: &Row) -> Vec<Option<Literal>> {
        let previous = bind_row(&self.vars, schema, row);
        let table = self.vars.borrow();
        let ctx = EvalContext::new(&table);
        let key = self
            .conditions
            .iter()
            .map(|c| match ctx.evaluate(&c.expression) {
                Ok(EvalOutcome::Value(l)) => Some(l),
                _ => None,
            })
            .collect();
        drop(table);
        unbind_row(&self.vars, previous);
        key
    }

    fn materialize(&mut self) {
        if self.rows.is_some() {
            return;
        }
        let schema = self.inner.ensure_variables().clone();
        let directions: Vec<SortDirection> = self
            .conditions
            .iter()
            .map(|c| {
                if c.descending {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                }
            })
            .collect();
        let mut keyed: Vec<(Vec<Option<Literal>>, Row)> = self
            .inner
            .read_all_rows()
            .into_iter()
            .map(|row| {
                let key = self.key_of(&schema, &row);
                (key, row)
            })
            .collect();
        keyed.sort_by(|(ka, _), (kb, _)| {
            compare_literal_sequences(ka, kb, &directions, ComparisonMode::XQuery)
        });
        self.rows = Some(keyed.into_iter().map(|(_, row)| row).collect());
        self.position = 0;
    }
}

impl RowSource for Sort {
    fn ensure_variables(&mut self) -> &Schema {
        let inner_schema = self.inner.ensure_variables().clone();
        self.schema = inner_schema.with_order_size(self.conditions.len());
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        self.materialize();
        let rows = self.rows.as_ref().unwrap();
        let row = rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        row
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.rows = None;
        self.position = 0;
    }

    fn get_inner(&self, index: usize) -> Option<&dyn RowSource> {
        if index == 0 {
            Some(self.inner.as_ref())
        } else {
            None
        }
    }
}
