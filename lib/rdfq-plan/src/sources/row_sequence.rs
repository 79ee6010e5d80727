use crate::{RowSource, Schema};
use rdfq_model::{Row, VariableHandle};

/// A fixed, already-materialized sequence of rows (spec §4.7): the leaf a
/// `Basic` pattern's first `TriplesMatch` joins against (one empty row, so
/// the first triple pattern sees exactly one "no bindings yet" outer
/// context), and the row source a `VALUES` clause or the RDF-results reader
/// (`rdfq-results`) would also feed rows through.
pub struct RowSequence {
    schema: Schema,
    rows: Vec<Row>,
    position: usize,
}

impl RowSequence {
    pub fn new(variables: Vec<VariableHandle>, rows: Vec<Row>) -> Self {
        Self {
            schema: Schema::new(variables),
            rows,
            position: 0,
        }
    }

    /// A single row with no columns and no bindings — the unit of a `Basic`
    /// pattern's join chain.
    pub fn unit() -> Self {
        Self::new(Vec::new(), vec![Row::with_width(0)])
    }
}

impl RowSource for RowSequence {
    fn ensure_variables(&mut self) -> &Schema {
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        let row = self.rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        row
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn get_inner(&self, _index: usize) -> Option<&dyn RowSource> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_yields_exactly_one_empty_row() {
        let mut source = RowSequence::unit();
        source.ensure_variables();
        assert_eq!(source.read_row().unwrap().len(), 0);
        assert!(source.read_row().is_none());
    }

    #[test]
    fn reset_restarts_iteration() {
        let mut source = RowSequence::new(Vec::new(), vec![Row::with_width(0), Row::with_width(0)]);
        source.ensure_variables();
        source.read_row();
        source.read_row();
        assert!(source.read_row().is_none());
        source.reset();
        assert!(source.read_row().is_some());
    }
}
