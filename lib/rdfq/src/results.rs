//! The result-cursor types a prepared query's execution produces (spec
//! §4.9): `BindingsCursor` for `SELECT`, a plain `bool` for `ASK` (no
//! cursor needed for a single value), and `GraphCursor` for
//! `CONSTRUCT`/`DESCRIBE`.

use rdfq_model::{Literal, Row, Triple, VariablesTable};
use rdfq_plan::{RowSource, Schema};
use std::cell::RefCell;
use std::rc::Rc;

/// A pull cursor over a `SELECT` query's solution sequence (spec §4.9):
/// `next_row` advances, `finished` reports end-of-stream, and
/// `binding_value`/`binding_value_by_name` read the current row. Mirrors
/// the row-source `read_row`/`None`-is-sticky contract one level up, for a
/// caller that doesn't want to work with `Row`/`Schema` directly.
pub struct BindingsCursor {
    source: Box<dyn RowSource>,
    schema: Schema,
    variables: Rc<RefCell<VariablesTable>>,
    current: Option<Row>,
    finished: bool,
}

impl BindingsCursor {
    pub(crate) fn new(mut source: Box<dyn RowSource>, variables: Rc<RefCell<VariablesTable>>) -> Self {
        let schema = source.ensure_variables().clone();
        Self {
            source,
            schema,
            variables,
            current: None,
            finished: false,
        }
    }

    /// Advances to the next solution. Returns `false` (and latches
    /// `finished`) at end-of-stream; calling it again afterwards is a no-op
    /// that keeps returning `false`.
    pub fn next_row(&mut self) -> bool {
        if self.finished {
            return false;
        }
        match self.source.read_row() {
            Some(row) => {
                self.current = Some(row);
                true
            }
            None => {
                self.finished = true;
                self.current = None;
                false
            }
        }
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn binding_count(&self) -> usize {
        self.schema.width()
    }

    pub fn binding_name(&self, index: usize) -> Option<String> {
        let handle = *self.schema.variables().get(index)?;
        Some(self.variables.borrow().variable(handle).name().to_string())
    }

    /// The current row's value at `index`, or `None` if that variable is
    /// unbound in this solution. Same underlying `Literal` (an `Rc` clone)
    /// until the next `next_row` call.
    pub fn binding_value(&self, index: usize) -> Option<Literal> {
        self.current.as_ref()?.get(index).cloned()
    }

    pub fn binding_value_by_name(&self, name: &str) -> Option<Literal> {
        let handle = self.variables.borrow().find(name)?;
        let pos = self.schema.position(handle)?;
        self.current.as_ref()?.get(pos).cloned()
    }
}

/// A pull cursor over a `CONSTRUCT`/`DESCRIBE` query's output graph (spec
/// §4.9): `next_triple` advances, `get_triple` reads the current one.
pub struct GraphCursor {
    triples: Vec<Triple>,
    position: Option<usize>,
}

impl GraphCursor {
    pub(crate) fn new(triples: Vec<Triple>) -> Self {
        Self {
            triples,
            position: None,
        }
    }

    pub fn next_triple(&mut self) -> bool {
        let next = self.position.map_or(0, |p| p + 1);
        if next < self.triples.len() {
            self.position = Some(next);
            true
        } else {
            self.position = Some(self.triples.len());
            false
        }
    }

    pub fn get_triple(&self) -> Option<&Triple> {
        self.position.and_then(|p| self.triples.get(p))
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// What executing a prepared query yields, one variant per `QueryVerb`
/// (spec §4.9).
pub enum QueryResults {
    Solutions(BindingsCursor),
    Boolean(bool),
    Graph(GraphCursor),
}
