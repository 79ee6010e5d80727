//! End-to-end coverage of spec.md §8's numbered scenarios that exercise the
//! full facade: 1 (single-row SELECT), 4 (OPTIONAL + FILTER(bound())), 5
//! (CONSTRUCT ... LIMIT 0), 6 (RDF-results round-trip). Scenarios 2 and 3
//! are literal-comparison properties covered inline in `rdfq-model`/
//! `rdfq-expr`; the row-source invariants are covered in `rdfq-plan/tests`.

use rdfq::{
    execute, DatasetEntry, DatasetFlag, GraphPattern, Literal, MemoryTriplesSource, Query,
    QueryResults, QueryVerb, Triple, TriplesSource, Variable, VariablesTable,
};
use rdfq_expr::Expression;
use rdfq_plan::Schema;
use rdfq_results::{write_rdf_results, RdfResultsReader};
use std::rc::Rc;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const FOAF_PERSON: &str = "http://xmlns.com/foaf/0.1/Person";

#[test]
fn scenario_1_select_single_row() {
    let mut store = MemoryTriplesSource::new();
    store.insert(Triple::new(
        Literal::from_uri("urn:bob"),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    ));

    let mut variables = VariablesTable::new();
    let person = variables.get_or_insert(Variable::new("person"));
    let pattern = GraphPattern::basic(vec![Triple::new(
        Literal::from_variable(person),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    )]);
    let mut query = Query::new(QueryVerb::Select, variables, pattern);
    query.projection = vec![person];
    let query = query.prepare().unwrap();

    let source: Rc<dyn TriplesSource> = Rc::new(store);
    match execute(query, source).unwrap() {
        QueryResults::Solutions(mut cursor) => {
            assert_eq!(cursor.binding_count(), 1);
            assert!(cursor.next_row());
            assert_eq!(
                cursor.binding_value(0).unwrap().lexical_form(),
                "urn:bob"
            );
            assert!(!cursor.next_row());
            assert!(cursor.finished());
        }
        _ => panic!("expected Solutions"),
    }
}

#[test]
fn scenario_4_optional_filter_bound_drops_the_unmatched_row() {
    let mut store = MemoryTriplesSource::new();
    store.insert(Triple::new(
        Literal::from_uri("urn:bob"),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    ));

    let mut variables = VariablesTable::new();
    let s = variables.get_or_insert(Variable::new("s"));
    let o = variables.get_or_insert(Variable::new("o"));

    let main = GraphPattern::basic(vec![Triple::new(
        Literal::from_variable(s),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    )]);
    let optional = GraphPattern::optional(vec![GraphPattern::basic(vec![Triple::new(
        Literal::from_variable(s),
        Literal::from_uri("urn:p"),
        Literal::from_variable(o),
    )])]);
    let group = GraphPattern::group(vec![main, optional])
        .with_filter(Expression::Bound(Variable::new("o")));

    let mut query = Query::new(QueryVerb::Select, variables, group);
    query.projection = vec![s, o];
    let query = query.prepare().unwrap();

    let source: Rc<dyn TriplesSource> = Rc::new(store);
    match execute(query, source).unwrap() {
        QueryResults::Solutions(mut cursor) => {
            assert!(!cursor.next_row());
        }
        _ => panic!("expected Solutions"),
    }
}

#[test]
fn scenario_5_construct_with_limit_zero_yields_an_empty_graph() {
    let mut store = MemoryTriplesSource::new();
    store.insert(Triple::new(
        Literal::from_uri("urn:a"),
        Literal::from_uri("urn:p"),
        Literal::from_uri("urn:b"),
    ));

    let mut variables = VariablesTable::new();
    let s = variables.get_or_insert(Variable::new("s"));
    let p = variables.get_or_insert(Variable::new("p"));
    let o = variables.get_or_insert(Variable::new("o"));
    let pattern = GraphPattern::basic(vec![Triple::new(
        Literal::from_variable(s),
        Literal::from_variable(p),
        Literal::from_variable(o),
    )]);
    let mut query = Query::new(QueryVerb::Construct, variables, pattern);
    query.construct_template = vec![Triple::new(
        Literal::from_variable(s),
        Literal::from_variable(p),
        Literal::from_variable(o),
    )];
    query.limit = 0;
    let query = query.prepare().unwrap();

    let source: Rc<dyn TriplesSource> = Rc::new(store);
    match execute(query, source).unwrap() {
        QueryResults::Graph(mut cursor) => {
            assert!(cursor.is_empty());
            assert!(!cursor.next_triple());
        }
        _ => panic!("expected Graph"),
    }
}

#[test]
fn scenario_6_rdf_results_round_trip() {
    let mut store = MemoryTriplesSource::new();
    store.insert(Triple::new(
        Literal::from_uri("urn:a"),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    ));
    store.insert(Triple::new(
        Literal::from_uri("urn:b"),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    ));

    let mut variables = VariablesTable::new();
    let person = variables.get_or_insert(Variable::new("person"));
    let pattern = GraphPattern::basic(vec![Triple::new(
        Literal::from_variable(person),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    )]);
    let mut query = Query::new(QueryVerb::Select, variables, pattern);
    query.projection = vec![person];
    let query = query.prepare().unwrap();

    let source: Rc<dyn TriplesSource> = Rc::new(store);
    let mut original_values = Vec::new();
    let mut binding_name = None;
    let rows = match execute(query, source).unwrap() {
        QueryResults::Solutions(mut cursor) => {
            binding_name = cursor.binding_name(0);
            let mut rows = Vec::new();
            while cursor.next_row() {
                let value = cursor.binding_value(0).unwrap();
                original_values.push(value.clone());
                let mut row = rdfq::Row::with_width(1);
                row.set(0, Some(value));
                rows.push(row);
            }
            rows
        }
        _ => panic!("expected Solutions"),
    };

    let mut written_vars = VariablesTable::new();
    let written_person = written_vars.get_or_insert(Variable::new(binding_name.unwrap()));
    let schema = Schema::new(vec![written_person]);
    let triples = write_rdf_results(&written_vars, &schema, &rows);

    let mut read_vars = VariablesTable::new();
    let mut reader = RdfResultsReader::new(&mut read_vars, &triples);
    let round_tripped = reader.read_all_rows();

    assert_eq!(round_tripped.len(), original_values.len());
    for value in &original_values {
        assert!(round_tripped
            .iter()
            .any(|row| row.get(0).unwrap().same_term(value)));
    }
}

#[test]
fn graph_variable_only_iterates_the_datasets_declared_named_graphs() {
    let mut store = MemoryTriplesSource::new();
    store.insert(
        Triple::new(
            Literal::from_uri("urn:bob"),
            Literal::from_uri(RDF_TYPE),
            Literal::from_uri(FOAF_PERSON),
        )
        .with_origin(Literal::from_uri("urn:g1")),
    );
    store.insert(
        Triple::new(
            Literal::from_uri("urn:alice"),
            Literal::from_uri(RDF_TYPE),
            Literal::from_uri(FOAF_PERSON),
        )
        .with_origin(Literal::from_uri("urn:g2")),
    );

    let mut variables = VariablesTable::new();
    let g = variables.get_or_insert(Variable::new("g"));
    let person = variables.get_or_insert(Variable::new("person"));
    let inner = GraphPattern::basic(vec![Triple::new(
        Literal::from_variable(person),
        Literal::from_uri(RDF_TYPE),
        Literal::from_uri(FOAF_PERSON),
    )]);
    let pattern = GraphPattern::graph(Literal::from_variable(g), inner);
    let mut query = Query::new(QueryVerb::Select, variables, pattern);
    query.projection = vec![g, person];
    query.dataset.push(DatasetEntry {
        uri: "urn:g1".to_string(),
        name_uri: None,
        flag: DatasetFlag::Named,
    });
    let query = query.prepare().unwrap();

    let source: Rc<dyn TriplesSource> = Rc::new(store);
    match execute(query, source).unwrap() {
        QueryResults::Solutions(mut cursor) => {
            let mut graphs = Vec::new();
            while cursor.next_row() {
                graphs.push(cursor.binding_value(0).unwrap().lexical_form().to_string());
            }
            assert_eq!(graphs, vec!["urn:g1".to_string()]);
        }
        _ => panic!("expected Solutions"),
    }
}
