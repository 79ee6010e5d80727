//! Compiles a prepared query's graph-pattern tree into the row-source tree
//! `rdfq-plan` executes (spec §4.7): `Basic` becomes a chain of
//! `TriplesMatch`, n-ary `Group`/`Optional`/`Union` fold left-deep into
//! `Join`/`LeftJoin`/`Union` (the doc comments on those row sources name
//! this builder as their intended caller), `Graph` and `Extend` wrap the
//! matching row source directly, and any filters attached to a node wrap
//! the compiled result in a `Filter`.

use rdfq_algebra::{GraphPattern, GraphPatternKind};
use rdfq_model::{Literal, LiteralKind, Triple, VariablesTable};
use rdfq_plan::sources::{Extend, Filter, Graph, Join, LeftJoin, RowSequence, TriplesMatch, Union};
use rdfq_plan::{RowSource, TriplesSource};
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) fn compile_pattern(
    pattern: &GraphPattern,
    vars: &Rc<RefCell<VariablesTable>>,
    source: &Rc<dyn TriplesSource>,
    named_graphs: &[Literal],
) -> Box<dyn RowSource> {
    let compiled = compile_kind(pattern.kind(), vars, source, named_graphs);
    if pattern.has_filters() {
        Box::new(Filter::new(compiled, pattern.filters().to_vec(), Rc::clone(vars)))
    } else {
        compiled
    }
}

fn compile_kind(
    kind: &GraphPatternKind,
    vars: &Rc<RefCell<VariablesTable>>,
    source: &Rc<dyn TriplesSource>,
    named_graphs: &[Literal],
) -> Box<dyn RowSource> {
    match kind {
        GraphPatternKind::Basic(triples) => compile_basic(triples, source),
        GraphPatternKind::Group(children) => compile_group(children, vars, source, named_graphs),
        GraphPatternKind::Optional(children) => {
            let mut acc: Box<dyn RowSource> = Box::new(RowSequence::unit());
            for child in children {
                let right = compile_pattern(child, vars, source, named_graphs);
                acc = Box::new(LeftJoin::new(acc, right));
            }
            acc
        }
        GraphPatternKind::Union(children) => compile_union(children, vars, source, named_graphs),
        GraphPatternKind::Graph(term, child) => compile_graph(term, child, vars, source, named_graphs),
        GraphPatternKind::Extend(inner, variable, expr) => {
            let inner_source = compile_pattern(inner, vars, source, named_graphs);
            Box::new(Extend::new(inner_source, *variable, expr.clone(), Rc::clone(vars)))
        }
    }
}

fn compile_basic(triples: &[Triple], source: &Rc<dyn TriplesSource>) -> Box<dyn RowSource> {
    let mut acc: Box<dyn RowSource> = Box::new(RowSequence::unit());
    for triple in triples {
        acc = Box::new(TriplesMatch::new(acc, Rc::clone(source), triple.clone()));
    }
    acc
}

/// Group's n-ary fold: a child shaped `Optional` joins its arms onto the
/// accumulator with `LeftJoin` (the arm's own filters passed through to
/// `LeftJoin::with_filters` so they run inside the inner loop, per spec
/// §4.7); every other child shape joins with the general `Join`.
fn compile_group(
    children: &[GraphPattern],
    vars: &Rc<RefCell<VariablesTable>>,
    source: &Rc<dyn TriplesSource>,
    named_graphs: &[Literal],
) -> Box<dyn RowSource> {
    let mut acc: Box<dyn RowSource> = Box::new(RowSequence::unit());
    for child in children {
        if let GraphPatternKind::Optional(arms) = child.kind() {
            for arm in arms {
                let right = compile_pattern(arm, vars, source, named_graphs);
                acc = if child.has_filters() {
                    Box::new(LeftJoin::new(acc, right).with_filters(child.filters().to_vec(), Rc::clone(vars)))
                } else {
                    Box::new(LeftJoin::new(acc, right))
                };
            }
        } else {
            let right = compile_pattern(child, vars, source, named_graphs);
            acc = Box::new(Join::new(acc, right));
        }
    }
    acc
}

fn compile_union(
    children: &[GraphPattern],
    vars: &Rc<RefCell<VariablesTable>>,
    source: &Rc<dyn TriplesSource>,
    named_graphs: &[Literal],
) -> Box<dyn RowSource> {
    let mut iter = children.iter();
    let Some(first) = iter.next() else {
        return Box::new(RowSequence::unit());
    };
    let mut acc = compile_pattern(first, vars, source, named_graphs);
    for child in iter {
        let right = compile_pattern(child, vars, source, named_graphs);
        acc = Box::new(Union::new(acc, right));
    }
    acc
}

/// Substitutes `origin` into every `Basic` triple's origin slot reachable
/// from `pattern`, the same rewrite `rdfq_algebra::optimize`'s rewrite 4
/// performs structurally for the common case — done here dynamically, once
/// per candidate graph, for shapes that rewrite doesn't reach (a `Graph`
/// wrapping anything other than a lone `Basic`).
fn substitute_origin(pattern: &GraphPattern, origin: &Literal) -> GraphPattern {
    let kind = match pattern.kind() {
        GraphPatternKind::Basic(triples) => GraphPatternKind::Basic(
            triples
                .iter()
                .cloned()
                .map(|t| t.with_origin(origin.clone()))
                .collect(),
        ),
        GraphPatternKind::Group(children) => {
            GraphPatternKind::Group(children.iter().map(|c| substitute_origin(c, origin)).collect())
        }
        GraphPatternKind::Optional(children) => {
            GraphPatternKind::Optional(children.iter().map(|c| substitute_origin(c, origin)).collect())
        }
        GraphPatternKind::Union(children) => {
            GraphPatternKind::Union(children.iter().map(|c| substitute_origin(c, origin)).collect())
        }
        // A nested GRAPH re-scopes itself; leave it alone.
        GraphPatternKind::Graph(term, child) => GraphPatternKind::Graph(term.clone(), child.clone()),
        GraphPatternKind::Extend(inner, variable, expr) => GraphPatternKind::Extend(
            Box::new(substitute_origin(inner, origin)),
            *variable,
            expr.clone(),
        ),
    };
    let mut out = GraphPattern::new(kind);
    for filter in pattern.filters() {
        out = out.with_filter(filter.clone());
    }
    out
}

fn compile_graph(
    term: &Literal,
    child: &GraphPattern,
    vars: &Rc<RefCell<VariablesTable>>,
    source: &Rc<dyn TriplesSource>,
    named_graphs: &[Literal],
) -> Box<dyn RowSource> {
    let graph_handle = match term.kind() {
        LiteralKind::Variable(h) => Some(*h),
        _ => None,
    };
    let child = child.clone();
    let closure_vars = Rc::clone(vars);
    let closure_source = Rc::clone(source);
    let closure_named_graphs = named_graphs.to_vec();
    let build: Rc<dyn Fn(&Literal) -> Box<dyn RowSource>> = Rc::new(move |candidate: &Literal| {
        let substituted = substitute_origin(&child, candidate);
        compile_pattern(&substituted, &closure_vars, &closure_source, &closure_named_graphs)
    });
    Box::new(Graph::new(term.clone(), graph_handle, Rc::clone(source), build, named_graphs.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryTriplesSource;
    use rdfq_model::Variable;

    fn uri(s: &str) -> Literal {
        Literal::from_uri(s)
    }

    #[test]
    fn basic_pattern_compiles_to_a_triples_match_chain() {
        let mut table = VariablesTable::new();
        let s = table.get_or_insert(Variable::new("s"));
        let vars = Rc::new(RefCell::new(table));

        let mut store = MemoryTriplesSource::new();
        store.insert(Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:b")));
        let source: Rc<dyn TriplesSource> = Rc::new(store);

        let pattern = GraphPattern::basic(vec![Triple::new(
            Literal::from_variable(s),
            uri("urn:p"),
            uri("urn:b"),
        )]);
        let mut compiled = compile_pattern(&pattern, &vars, &source, &[]);
        let rows = compiled.read_all_rows();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn group_with_optional_child_left_joins() {
        let mut table = VariablesTable::new();
        let s = table.get_or_insert(Variable::new("s"));
        let o = table.get_or_insert(Variable::new("o"));
        let vars = Rc::new(RefCell::new(table));

        let mut store = MemoryTriplesSource::new();
        store.insert(Triple::new(uri("urn:a"), uri("urn:type"), uri("urn:thing")));
        let source: Rc<dyn TriplesSource> = Rc::new(store);

        let main = GraphPattern::basic(vec![Triple::new(
            Literal::from_variable(s),
            uri("urn:type"),
            uri("urn:thing"),
        )]);
        let optional = GraphPattern::optional(vec![GraphPattern::basic(vec![Triple::new(
            Literal::from_variable(s),
            uri("urn:label"),
            Literal::from_variable(o),
        )])]);
        let group = GraphPattern::group(vec![main, optional]);

        let mut compiled = compile_pattern(&group, &vars, &source, &[]);
        let rows = compiled.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(1).is_none());
    }
}
