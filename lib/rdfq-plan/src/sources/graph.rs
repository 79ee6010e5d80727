use crate::triples_source::TriplesSource;
use crate::util::reposition;
use crate::{RowSource, Schema};
use rdfq_model::{Literal, Row, VariableHandle};
use std::rc::Rc;

/// `GRAPH <term> { ... }` / `GRAPH ?g { ... }` for any child shape the
/// `Basic`-only optimizer rewrite (`rdfq_algebra::optimize`'s rewrite 4)
/// doesn't reach (spec §4.7): scopes the enclosed pattern to one named
/// graph, or to every named graph in turn when `term` is a variable,
/// unioning the results and binding the graph variable from whichever
/// candidate produced each row.
///
/// `build` constructs the inner row-source tree for one concrete graph
/// term, with that term substituted into every contained triple's origin
/// slot — the same substitution the optimizer performs structurally for
/// the `Basic` case, done dynamically here one graph at a time instead.
pub struct Graph {
    term: Literal,
    graph_handle: Option<VariableHandle>,
    source: Rc<dyn TriplesSource>,
    build: Rc<dyn Fn(&Literal) -> Box<dyn RowSource>>,
    /// The dataset's declared `FROM NAMED` graphs (spec §3/§4.7), already
    /// narrowed to this source's actual graphs by whoever built this node.
    /// Empty means the query declared none, in which case every graph the
    /// source reports is a candidate.
    declared_named_graphs: Vec<Literal>,
    candidates: Vec<Literal>,
    candidate_index: usize,
    current: Option<Box<dyn RowSource>>,
    schema: Schema,
}

impl Graph {
    pub fn new(
        term: Literal,
        graph_handle: Option<VariableHandle>,
        source: Rc<dyn TriplesSource>,
        build: Rc<dyn Fn(&Literal) -> Box<dyn RowSource>>,
        declared_named_graphs: Vec<Literal>,
    ) -> Self {
        Self {
            term,
            graph_handle,
            source,
            build,
            declared_named_graphs,
            candidates: Vec::new(),
            candidate_index: 0,
            current: None,
            schema: Schema::default(),
        }
    }

    /// For `GRAPH ?g { ... }`, the dataset's declared named graphs
    /// (spec §4.7's "the dataset's named graphs") intersected with what the
    /// source actually has, falling back to the source's full set when the
    /// query declared none.
    fn candidates(&self) -> Vec<Literal> {
        match self.graph_handle {
            Some(_) => {
                let available = self.source.named_graphs();
                if self.declared_named_graphs.is_empty() {
                    available
                } else {
                    available
                        .into_iter()
                        .filter(|g| self.declared_named_graphs.iter().any(|d| d.same_term(g)))
                        .collect()
                }
            }
            None => vec![self.term.clone()],
        }
    }

    fn advance_candidate(&mut self) -> bool {
        if self.candidate_index >= self.candidates.len() {
            self.current = None;
            return false;
        }
        let candidate = self.candidates[self.candidate_index].clone();
        self.candidate_index += 1;
        let mut inner = (self.build)(&candidate);
        inner.ensure_variables();
        self.current = Some(inner);
        true
    }
}

impl RowSource for Graph {
    fn ensure_variables(&mut self) -> &Schema {
        self.candidates = self.candidates();
        let mut variables = Vec::new();
        if let Some(handle) = self.graph_handle {
            variables.push(handle);
        }
        if let Some(first) = self.candidates.first().cloned() {
            let mut probe = (self.build)(&first);
            let probe_schema = probe.ensure_variables().clone();
            for v in probe_schema.variables() {
                if !variables.contains(v) {
                    variables.push(*v);
                }
            }
        }
        self.schema = Schema::new(variables);
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        loop {
            if self.current.is_none() && !self.advance_candidate() {
                return None;
            }
            let current = self.current.as_mut().unwrap();
            let current_schema = current.ensure_variables().clone();
            match current.read_row() {
                Some(row) => {
                    let mut out = reposition(&row, &current_schema, &self.schema);
                    if let Some(handle) = self.graph_handle {
                        if let Some(pos) = self.schema.position(handle) {
                            out.set(pos, Some(self.candidates[self.candidate_index - 1].clone()));
                        }
                    }
                    return Some(out);
                }
                None => self.current = None,
            }
        }
    }

    fn reset(&mut self) {
        self.candidate_index = 0;
        self.current = None;
    }

    fn get_inner(&self, index: usize) -> Option<&dyn RowSource> {
        if index == 0 {
            self.current.as_deref()
        } else {
            None
        }
    }
}
