//! The DAWG RDF results vocabulary reader/writer (spec §4.7/§6): an RDF
//! graph whose shape is itself `rs:ResultSet` / `rs:resultVariable` /
//! `rs:solution` / `rs:binding` / `rs:variable` / `rs:value` / `rs:index`
//! triples, distinct from the official SPARQL Query Results XML/JSON
//! formats `rdfq-results::xml_format` parses off the wire — this module
//! only ever walks an already-parsed `Triple` graph (the engine has no RDF
//! serialization reader of its own; a caller hands in triples it parsed by
//! whatever means it likes, the same way `MemoryTriplesSource` is loaded).

use rdfq_plan::{RowSource, Schema};
use rdfq_model::{Literal, Row, Triple, VariableHandle, VariablesTable};

/// The DAWG result-set vocabulary, spelled out exactly as spec §6 names it.
pub mod vocab {
    const NS: &str = "http://www.w3.org/2001/sw/DataAccess/tests/result-set#";
    pub fn result_set() -> String {
        format!("{NS}ResultSet")
    }
    pub fn result_variable() -> String {
        format!("{NS}resultVariable")
    }
    pub fn solution() -> String {
        format!("{NS}solution")
    }
    pub fn binding() -> String {
        format!("{NS}binding")
    }
    pub fn variable() -> String {
        format!("{NS}variable")
    }
    pub fn value() -> String {
        format!("{NS}value")
    }
    pub fn index() -> String {
        format!("{NS}index")
    }
}

fn find_object<'a>(triples: &'a [Triple], subject: &Literal, predicate: &str) -> Vec<&'a Literal> {
    triples
        .iter()
        .filter(|t| t.subject.same_term(subject) && t.predicate.lexical_form() == predicate)
        .map(|t| &t.object)
        .collect()
}

fn find_subjects_with_type(triples: &[Triple], type_uri: &str) -> Vec<Literal> {
    const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    triples
        .iter()
        .filter(|t| t.predicate.lexical_form() == RDF_TYPE && t.object.lexical_form() == type_uri)
        .map(|t| t.subject.clone())
        .collect()
}

/// Reads a DAWG RDF results graph (spec §4.7's "RDF-results reader") into
/// rows: finds the `rs:ResultSet` node, reads its `rs:resultVariable`
/// triples for the column order, then for each `rs:solution` node follows
/// `rs:binding` to per-variable `rs:variable`/`rs:value` pairs, sorting
/// solutions by `rs:index` first when every solution has one.
pub struct RdfResultsReader {
    schema: Schema,
    rows: Vec<Row>,
    position: usize,
}

impl RdfResultsReader {
    pub fn new(variables: &mut VariablesTable, triples: &[Triple]) -> Self {
        let result_sets = find_subjects_with_type(triples, &vocab::result_set());
        let Some(result_set) = result_sets.first() else {
            return Self {
                schema: Schema::default(),
                rows: Vec::new(),
                position: 0,
            };
        };

        let column_names: Vec<String> = find_object(triples, result_set, &vocab::result_variable())
            .into_iter()
            .map(Literal::lexical_form)
            .collect();
        let columns: Vec<VariableHandle> = column_names
            .iter()
            .map(|name| variables.get_or_insert(rdfq_model::Variable::new(name.clone())))
            .collect();
        let schema = Schema::new(columns.clone());

        let mut solutions: Vec<(Option<i64>, Row)> = Vec::new();
        for solution in find_object(triples, result_set, &vocab::solution()) {
            let mut row = Row::with_width(schema.width());
            let mut order_index = None;
            for binding in find_object(triples, solution, &vocab::binding()) {
                let var_name = find_object(triples, binding, &vocab::variable())
                    .first()
                    .map(|l| l.lexical_form());
                let value = find_object(triples, binding, &vocab::value()).first().cloned().cloned();
                if let (Some(name), Some(value)) = (var_name, value) {
                    if let Some(pos) = column_names.iter().position(|n| *n == name) {
                        row.set(pos, Some(value));
                    }
                }
            }
            if let Some(index) = find_object(triples, solution, &vocab::index()).first() {
                order_index = index.lexical_form().parse::<i64>().ok();
            }
            solutions.push((order_index, row));
        }
        if solutions.iter().all(|(i, _)| i.is_some()) {
            solutions.sort_by_key(|(i, _)| i.unwrap());
        }

        Self {
            schema,
            rows: solutions.into_iter().map(|(_, row)| row).collect(),
            position: 0,
        }
    }
}

impl RowSource for RdfResultsReader {
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

/// Writes rows back out as a DAWG result-set graph (spec §6's writer half):
/// one blank-node `rs:ResultSet`, one `rs:resultVariable` triple per column,
/// and one `rs:solution` blank node per row carrying `rs:binding` nodes and
/// an `rs:index` triple preserving row order.
pub fn write_rdf_results(variables: &VariablesTable, schema: &Schema, rows: &[Row]) -> Vec<Triple> {
    const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    let mut out = Vec::new();
    let mut blank_counter = 0usize;
    let mut next_blank = || {
        blank_counter += 1;
        Literal::from_blank(format!("rs{blank_counter}"))
    };

    let result_set = next_blank();
    out.push(Triple::new(
        result_set.clone(),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(vocab::result_set()),
    ));
    for handle in schema.variables() {
        out.push(Triple::new(
            result_set.clone(),
            Literal::from_uri(vocab::result_variable()),
            Literal::from_xsd_string(variables.variable(*handle).name()),
        ));
    }
    for (row_index, row) in rows.iter().enumerate() {
        let solution = next_blank();
        out.push(Triple::new(
            result_set.clone(),
            Literal::from_uri(vocab::solution()),
            solution.clone(),
        ));
        out.push(Triple::new(
            solution.clone(),
            Literal::from_uri(vocab::index()),
            Literal::from_i64(row_index as i64),
        ));
        for (i, handle) in schema.variables().iter().enumerate() {
            let Some(value) = row.get(i) else { continue };
            let binding = next_blank();
            out.push(Triple::new(
                solution.clone(),
                Literal::from_uri(vocab::binding()),
                binding.clone(),
            ));
            out.push(Triple::new(
                binding.clone(),
                Literal::from_uri(vocab::variable()),
                Literal::from_xsd_string(variables.variable(*handle).name()),
            ));
            out.push(Triple::new(
                binding,
                Literal::from_uri(vocab::value()),
                value.clone(),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_single_row_solution() {
        let mut variables = VariablesTable::new();
        let x = variables.get_or_insert(rdfq_model::Variable::new("x"));
        let schema = Schema::new(vec![x]);
        let mut row = Row::with_width(1);
        row.set(0, Some(Literal::from_uri("urn:a")));

        let triples = write_rdf_results(&variables, &schema, &[row]);

        let mut read_vars = VariablesTable::new();
        let mut reader = RdfResultsReader::new(&mut read_vars, &triples);
        let rows = reader.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_uri("urn:a")));
    }
}
