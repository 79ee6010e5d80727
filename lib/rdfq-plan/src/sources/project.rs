use crate::util::reposition;
use crate::{RowSource, Schema};
use rdfq_model::{Row, VariableHandle};

/// Narrows (and reorders) `inner`'s columns to exactly `variables`, in that
/// order (spec §4.7, "Project"): the `SELECT` projection list, or a
/// `CONSTRUCT` template's variable set.
pub struct Project {
    inner: Box<dyn RowSource>,
    schema: Schema,
}

impl Project {
    pub fn new(inner: Box<dyn RowSource>, variables: Vec<VariableHandle>) -> Self {
        Self {
            inner,
            schema: Schema::new(variables),
        }
    }
}

impl RowSource for Project {
    fn ensure_variables(&mut self) -> &Schema {
        self.inner.ensure_variables();
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        let inner_schema = self.inner.ensure_variables().clone();
        let row = self.inner.read_row()?;
        Some(reposition(&row, &inner_schema, &self.schema))
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
    use rdfq_model::{Literal, Variable, VariablesTable};

    #[test]
    fn project_drops_columns_not_in_the_list() {
        let mut table = VariablesTable::new();
        let x = table.get_or_insert(Variable::new("x"));
        let y = table.get_or_insert(Variable::new("y"));

        let mut row = Row::with_width(2);
        row.set(0, Some(Literal::from_uri("urn:a")));
        row.set(1, Some(Literal::from_i64(1)));
        let inner = Box::new(RowSequence::new(vec![x, y], vec![row]));

        let mut project = Project::new(inner, vec![x]);
        project.ensure_variables();
        let rows = project.read_all_rows();
        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_uri("urn:a")));
    }
}
