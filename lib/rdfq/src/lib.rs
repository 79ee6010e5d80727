//! The rdfq facade (spec §2): re-exports the lower crates, owns the one
//! in-memory `TriplesSource` this workspace ships, and exposes the single
//! [`execute`] entry point a caller hands a prepared `Query` and an opened
//! triples source to.
//!
//! ```
//! use rdfq_algebra::{GraphPattern, Query, QueryVerb};
//! use rdfq_model::{Literal, Triple, Variable, VariablesTable};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut store = rdfq::MemoryTriplesSource::new();
//! store.insert(Triple::new(
//!     Literal::from_uri("urn:bob"),
//!     Literal::from_uri("urn:name"),
//!     Literal::from_xsd_string("Bob"),
//! ));
//!
//! let mut variables = VariablesTable::new();
//! let name = variables.get_or_insert(Variable::new("name"));
//! let pattern = GraphPattern::basic(vec![Triple::new(
//!     Literal::from_uri("urn:bob"),
//!     Literal::from_uri("urn:name"),
//!     Literal::from_variable(name),
//! )]);
//! let mut query = Query::new(QueryVerb::Select, variables, pattern);
//! query.projection = vec![name];
//! let query = query.prepare().unwrap();
//!
//! let source: Rc<dyn rdfq_plan::TriplesSource> = Rc::new(store);
//! match rdfq::execute(query, source).unwrap() {
//!     rdfq::QueryResults::Solutions(mut cursor) => {
//!         assert!(cursor.next_row());
//!         assert_eq!(cursor.binding_value(0).unwrap().lexical_form(), "Bob");
//!         assert!(!cursor.next_row());
//!     }
//!     _ => unreachable!(),
//! }
//! ```

mod error;
mod memory_store;
mod plan;
mod results;

pub use error::QueryError;
pub use memory_store::MemoryTriplesSource;
pub use results::{BindingsCursor, GraphCursor, QueryResults};

pub use rdfq_algebra::{DatasetEntry, DatasetFlag, GraphPattern, GraphPatternKind, OrderCondition, Query, QueryVerb};
pub use rdfq_expr::{BuiltinFunction, EvalContext, EvalError, EvalOutcome, Expression};
pub use rdfq_model::{
    ComparisonMode, Literal, LiteralKind, Row, Triple, TypeError, TypeTag, Variable, VariableHandle, VariableKind,
    VariablesTable,
};
pub use rdfq_plan::{EvaluationError, RowSource, TriplesSource, TriplesSourceFactory};
pub use rdfq_results::{FormatterRegistry, HttpClient, ProtocolError, RemoteService, ServiceResponse};

use plan::compile_pattern;
use rdfq_algebra::{OrderCondition as Order, Query as AlgebraQuery, QueryVerb as Verb};
use rdfq_model::VariableHandle as Handle;
use rdfq_plan::sources::{Distinct, Project, Slice, Sort};
use std::cell::RefCell;
use std::rc::Rc;

/// Runs a prepared `Query` against `source`, returning the shape its verb
/// calls for (spec §4.9): `SELECT` → `Solutions`, `ASK` → `Boolean`,
/// `CONSTRUCT`/`DESCRIBE` → `Graph`. `query` must already have passed
/// through [`rdfq_algebra::Query::prepare`] — this function does not
/// resolve `QName`s or run the structural optimizer itself.
pub fn execute(query: AlgebraQuery, source: Rc<dyn TriplesSource>) -> Result<QueryResults, QueryError> {
    let AlgebraQuery {
        verb,
        variables,
        dataset,
        projection,
        pattern,
        order_by,
        distinct,
        limit,
        offset,
        construct_template,
        ..
    } = query;
    let named_graphs: Vec<Literal> = dataset
        .iter()
        .filter(|entry| entry.flag == DatasetFlag::Named)
        .map(|entry| Literal::from_uri(entry.uri.clone()))
        .collect();
    let vars = Rc::new(RefCell::new(variables));
    let base = compile_pattern(&pattern, &vars, &source, &named_graphs);

    match verb {
        Verb::Ask => {
            let mut base = base;
            base.ensure_variables();
            Ok(QueryResults::Boolean(base.read_row().is_some()))
        }
        Verb::Select => {
            let rs = apply_solution_modifiers(base, &order_by, &projection, distinct, limit, offset, &vars);
            Ok(QueryResults::Solutions(BindingsCursor::new(rs, vars)))
        }
        Verb::Construct => {
            let mut rs = apply_solution_modifiers(base, &order_by, &[], distinct, limit, offset, &vars);
            let schema = rs.ensure_variables().clone();
            let mut triples = Vec::new();
            while let Some(row) = rs.read_row() {
                for t in instantiate_template(&construct_template, &row, &schema) {
                    push_unique_triple(&mut triples, t);
                }
            }
            Ok(QueryResults::Graph(GraphCursor::new(triples)))
        }
        Verb::Describe => {
            if !construct_template.is_empty() {
                let mut rs = apply_solution_modifiers(base, &order_by, &[], distinct, limit, offset, &vars);
                let schema = rs.ensure_variables().clone();
                let mut triples = Vec::new();
                while let Some(row) = rs.read_row() {
                    for t in instantiate_template(&construct_template, &row, &schema) {
                        push_unique_triple(&mut triples, t);
                    }
                }
                return Ok(QueryResults::Graph(GraphCursor::new(triples)));
            }
            let mut rs = apply_solution_modifiers(base, &order_by, &projection, distinct, limit, offset, &vars);
            let schema = rs.ensure_variables().clone();
            let mut resources: Vec<Literal> = Vec::new();
            while let Some(row) = rs.read_row() {
                for handle in &projection {
                    if let Some(pos) = schema.position(*handle) {
                        if let Some(value) = row.get(pos) {
                            push_unique_literal(&mut resources, value.clone());
                        }
                    }
                }
            }
            let mut triples = Vec::new();
            for resource in &resources {
                for t in describe_resource(&source, &vars, resource) {
                    push_unique_triple(&mut triples, t);
                }
            }
            Ok(QueryResults::Graph(GraphCursor::new(triples)))
        }
    }
}

/// Runs `query_text` against a remote SPARQL endpoint instead of a local
/// triples source (spec §4.7 "Remote service", §6). `Query::service_endpoint`
/// names the endpoint but, unlike the rest of this crate, this workspace
/// carries no SPARQL serializer to turn a prepared `Query`'s algebra back
/// into query text — a caller reaching for this function already has the
/// text it parsed `query` from and passes it through directly.
pub fn execute_remote(
    client: &HttpClient,
    registry: &FormatterRegistry,
    variables: &mut VariablesTable,
    service_uri: &str,
    query_text: &str,
    default_graphs: &[String],
    named_graphs: &[String],
) -> Result<ServiceResponse, QueryError> {
    RemoteService::fetch(client, registry, variables, service_uri, query_text, default_graphs, named_graphs)
        .map_err(QueryError::from)
}

#[allow(clippy::too_many_arguments)]
fn apply_solution_modifiers(
    mut rs: Box<dyn RowSource>,
    order_by: &[Order],
    projection: &[Handle],
    distinct: bool,
    limit: i64,
    offset: i64,
    vars: &Rc<RefCell<VariablesTable>>,
) -> Box<dyn RowSource> {
    if !order_by.is_empty() {
        rs = Box::new(Sort::new(rs, order_by.to_vec(), Rc::clone(vars)));
    }
    if !projection.is_empty() {
        rs = Box::new(Project::new(rs, projection.to_vec()));
    }
    if distinct {
        rs = Box::new(Distinct::new(rs));
    }
    let offset_n = if offset >= 0 { offset as usize } else { 0 };
    let limit_n = if limit >= 0 { Some(limit as usize) } else { None };
    if offset_n > 0 || limit_n.is_some() {
        rs = Box::new(Slice::new(rs, offset_n, limit_n));
    }
    rs.ensure_variables();
    rs
}

fn resolve_term(term: &Literal, row: &Row, schema: &rdfq_plan::Schema) -> Option<Literal> {
    match term.kind() {
        LiteralKind::Variable(h) => schema.position(*h).and_then(|pos| row.get(pos).cloned()),
        _ => Some(term.clone()),
    }
}

/// Instantiates a `CONSTRUCT` template against one solution row, dropping
/// (per-triple, not per-solution) any template triple with a term that
/// resolves to an unbound variable.
fn instantiate_template(template: &[Triple], row: &Row, schema: &rdfq_plan::Schema) -> Vec<Triple> {
    template
        .iter()
        .filter_map(|t| {
            let subject = resolve_term(&t.subject, row, schema)?;
            let predicate = resolve_term(&t.predicate, row, schema)?;
            let object = resolve_term(&t.object, row, schema)?;
            Some(Triple::new(subject, predicate, object))
        })
        .collect()
}

fn same_triple(a: &Triple, b: &Triple) -> bool {
    a.subject.same_term(&b.subject) && a.predicate.same_term(&b.predicate) && a.object.same_term(&b.object)
}

fn push_unique_triple(triples: &mut Vec<Triple>, t: Triple) {
    if !triples.iter().any(|existing| same_triple(existing, &t)) {
        triples.push(t);
    }
}

fn push_unique_literal(values: &mut Vec<Literal>, value: Literal) {
    if !values.iter().any(|existing| existing.same_term(&value)) {
        values.push(value);
    }
}

/// A one-level Concise Bounded Description of `resource`: every ground
/// triple the source reports with `resource` as subject (spec doesn't name
/// `DESCRIBE`'s target set explicitly — see `DESIGN.md` for why this reuses
/// `projection` as that set).
fn describe_resource(source: &Rc<dyn TriplesSource>, vars: &Rc<RefCell<VariablesTable>>, resource: &Literal) -> Vec<Triple> {
    let p_handle = vars.borrow_mut().get_or_insert(Variable::new_anonymous("describe_p"));
    let o_handle = vars.borrow_mut().get_or_insert(Variable::new_anonymous("describe_o"));
    let pattern = Triple::new(
        resource.clone(),
        Literal::from_variable(p_handle),
        Literal::from_variable(o_handle),
    );
    let mut cursor = source.new_match(&pattern);
    let mut out = Vec::new();
    loop {
        let mut meta = rdfq_plan::MatchMeta::default();
        if cursor.bind_next(&mut meta).is_none() {
            break;
        }
        if let (Some(p), Some(o)) = (meta.predicate, meta.object) {
            out.push(Triple::new(resource.clone(), p, o));
        }
    }
    out
}
