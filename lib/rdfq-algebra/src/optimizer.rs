//! The structural optimizer (spec §4.6): four idempotent, locally-correct
//! rewrites applied to a fixpoint. Grounded in `sparopt::optimizer::Optimizer`'s
//! repeated-pass structure, but — per spec's explicit "the optimizer does
//! NOT reorder triples or children" — none of `sparopt`'s join-reordering or
//! type-inference machinery is ported: only the four tree-shape rewrites
//! spec.md names, plus QName expansion (rewrite 5), which `Query::prepare`
//! runs separately since it needs the query's prefix map rather than just a
//! `GraphPattern` (see `Query::resolve_qnames`).

use crate::{GraphPattern, GraphPatternKind};
use rdfq_expr::Expression;
use rdfq_model::Literal;

/// Runs the four structural rewrites (flatten, lift filters, collapse
/// singleton groups, push `GRAPH` onto triple origins) to a fixpoint: apply
/// all four, repeat until the tree stops changing. Each rewrite is
/// individually idempotent; running them together can still unlock further
/// rewrites (e.g. collapsing a singleton `Group` can expose a `Group(Group)`
/// pair for the next flatten pass), hence the repeat-until-stable loop.
pub fn optimize(pattern: GraphPattern) -> GraphPattern {
    let mut current = pattern;
    loop {
        let rewritten = rewrite_once(current.clone());
        if same_shape(&rewritten, &current) {
            return rewritten;
        }
        current = rewritten;
    }
}

/// A cheap structural fingerprint used only to detect a fixpoint; not a
/// general-purpose `Eq` (filters and literal values are summarized by
/// count/debug text, which is enough to notice "nothing changed").
fn same_shape(a: &GraphPattern, b: &GraphPattern) -> bool {
    format!("{a:?}") == format!("{b:?}")
}

fn rewrite_once(pattern: GraphPattern) -> GraphPattern {
    let filters = pattern.filters().to_vec();
    let kind = pattern.into_kind();
    let (kind, lifted) = rewrite_kind(kind);
    let mut rewritten = GraphPattern::new(kind);
    for f in filters.into_iter().chain(lifted) {
        rewritten = rewritten.with_filter(f);
    }
    rewritten
}

/// Returns the rewritten kind plus any filters that rewrite 2 lifted out of
/// a `Basic` child onto this node — callers fold those into their own
/// filter list rather than the child's, since the child's `GraphPatternKind`
/// carries no filters of its own.
fn rewrite_kind(kind: GraphPatternKind) -> (GraphPatternKind, Vec<Expression>) {
    match kind {
        GraphPatternKind::Basic(triples) => (GraphPatternKind::Basic(triples), Vec::new()),
        GraphPatternKind::Group(children) => rewrite_group(children),
        GraphPatternKind::Optional(children) => (
            GraphPatternKind::Optional(children.into_iter().map(rewrite_once).collect()),
            Vec::new(),
        ),
        GraphPatternKind::Union(children) => (
            GraphPatternKind::Union(children.into_iter().map(rewrite_once).collect()),
            Vec::new(),
        ),
        GraphPatternKind::Graph(term, child) => (rewrite_graph(term, *child), Vec::new()),
        GraphPatternKind::Extend(inner, var, expr) => (
            GraphPatternKind::Extend(Box::new(rewrite_once(*inner)), var, expr),
            Vec::new(),
        ),
    }
}

/// Rewrites 1-3 on a `Group`'s children: first recurse, then flatten any
/// child that is itself a filter-less `Group` into this one (rewrite 1),
/// then lift filters off `Basic` children whose variables the filter
/// doesn't exceed (rewrite 2) — returned to the caller so they land on
/// *this* node's filter list rather than vanishing. Rewrite 3 (collapse a
/// singleton childless-filter `Group` into its child) is applied here too,
/// since it changes this node's *kind*, not just its children list.
fn rewrite_group(children: Vec<GraphPattern>) -> (GraphPatternKind, Vec<Expression>) {
    let mut flattened = Vec::with_capacity(children.len());
    for child in children {
        let child = rewrite_once(child);
        match child.kind() {
            GraphPatternKind::Group(grandchildren) if !child.has_filters() => {
                flattened.extend(grandchildren.iter().cloned());
            }
            _ => flattened.push(child),
        }
    }
    let (flattened, lifted) = lift_basic_filters(flattened);
    if flattened.len() == 1 {
        let only = flattened.into_iter().next().unwrap();
        if !only.has_filters() {
            return (only.into_kind(), lifted);
        }
        // The single child had filters of its own; keep the Group wrapper
        // so those filters still scope to exactly this child.
        return (GraphPatternKind::Group(vec![only]), lifted);
    }
    (GraphPatternKind::Group(flattened), lifted)
}

/// Rewrite 2: a filter attached to a `Basic` child is lifted onto the
/// enclosing `Group` when every variable it mentions is one of that
/// `Basic`'s variables — the filter's scope doesn't change (a `Basic`
/// inside a `Group` sees exactly the `Group`'s bindings restricted to that
/// triple list), so this is a no-op semantically, and it lets row-source
/// construction treat the `Group`'s filters uniformly instead of special-
/// casing per-child filters. A filter that mentions a variable *outside*
/// the `Basic`'s own triples (impossible for a standalone `Basic`, but
/// reachable once `BIND`/nested patterns enter a pack-only rewrite) is left
/// in place rather than discarded.
fn lift_basic_filters(children: Vec<GraphPattern>) -> (Vec<GraphPattern>, Vec<Expression>) {
    let mut lifted = Vec::new();
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        if !matches!(child.kind(), GraphPatternKind::Basic(_)) {
            // Only a Basic's filters are eligible for lifting here; every
            // other shape keeps its filters attached to itself.
            out.push(child);
            continue;
        }
        let filters = child.filters().to_vec();
        let triples = match child.into_kind() {
            GraphPatternKind::Basic(triples) => triples,
            _ => unreachable!(),
        };
        let basic_vars = GraphPattern::basic_variables(&triples);
        let mut kept = Vec::new();
        for f in filters {
            if expression_variables_subset_of(&f, &basic_vars) {
                lifted.push(f);
            } else {
                kept.push(f);
            }
        }
        let mut rebuilt = GraphPattern::basic(triples);
        for f in kept {
            rebuilt = rebuilt.with_filter(f);
        }
        out.push(rebuilt);
    }
    (out, lifted)
}

/// Whether every variable `expr` references is in `allowed` — the
/// side-condition rewrite 2 (spec §4.6) requires before a `Basic`'s filter
/// may move up to its enclosing `Group` without changing scope. A bare
/// `Expression::Variable`/`Bound` node names a variable by name rather than
/// by the `VariableHandle`s `allowed` is keyed on (resolution against the
/// variables table happens at evaluation time, not here); since the
/// optimizer has no table in hand to resolve it against, such a node is
/// conservatively treated as referencing something outside `allowed`,
/// which keeps the filter in place instead of risking an unsound lift.
fn expression_variables_subset_of(expr: &Expression, allowed: &[rdfq_model::VariableHandle]) -> bool {
    use Expression::*;
    match expr {
        Constant(lit) => match lit.kind() {
            rdfq_model::LiteralKind::Variable(h) => allowed.contains(h),
            _ => true,
        },
        Variable(_) | Bound(_) => false,
        And(xs) | Or(xs) => xs.iter().all(|x| expression_variables_subset_of(x, allowed)),
        Not(x) | UnaryPlus(x) | UnaryMinus(x) | IsUri(x) | IsBlank(x) | IsLiteral(x) | Str(x)
        | Lang(x) | Datatype(x) | Asc(x) | Desc(x) => expression_variables_subset_of(x, allowed),
        Equal(a, b) | NotEqual(a, b) | SameTerm(a, b) | Less(a, b) | LessOrEqual(a, b)
        | Greater(a, b) | GreaterOrEqual(a, b) | Add(a, b) | Subtract(a, b) | Multiply(a, b)
        | Divide(a, b) | StrEq(a, b) | StrNeq(a, b) => {
            expression_variables_subset_of(a, allowed) && expression_variables_subset_of(b, allowed)
        }
        Regex { subject, pattern, flags } => {
            expression_variables_subset_of(subject, allowed)
                && expression_variables_subset_of(pattern, allowed)
                && flags
                    .as_deref()
                    .map_or(true, |f| expression_variables_subset_of(f, allowed))
        }
        Cast { inner, .. } => expression_variables_subset_of(inner, allowed),
        FunctionCall(_, args) => args.iter().all(|a| expression_variables_subset_of(a, allowed)),
    }
}

/// Rewrite 4: `Graph(g, Basic(triples))` pushes `g` down onto each triple's
/// origin slot rather than keeping a separate scoping node, since a `Basic`
/// triple list already has an `origin` slot per triple (spec §3's
/// `Triple.origin`) that means exactly the same thing. Any other pattern
/// shape under a `Graph` node keeps the node (the origin can't be pushed
/// into a `Group`/`Optional`/`Union` without duplicating `g` onto every
/// triple in every descendant `Basic`, which the row-source `Graph` source
/// does instead by scoping lookups dynamically, per spec §4.7).
fn rewrite_graph(term: Literal, child: GraphPattern) -> GraphPatternKind {
    let child = rewrite_once(child);
    if child.has_filters() {
        return GraphPatternKind::Graph(term, Box::new(child));
    }
    match child.into_kind() {
        GraphPatternKind::Basic(triples) => {
            let triples = triples
                .into_iter()
                .map(|t| t.with_origin(term.clone()))
                .collect();
            GraphPatternKind::Basic(triples)
        }
        other => GraphPatternKind::Graph(term, Box::new(GraphPattern::new(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfq_model::Triple;

    fn var_triple() -> Triple {
        Triple::new(
            Literal::from_uri("urn:s"),
            Literal::from_uri("urn:p"),
            Literal::from_uri("urn:o"),
        )
    }

    #[test]
    fn nested_groups_flatten() {
        let inner = GraphPattern::group(vec![GraphPattern::basic(vec![var_triple()])]);
        let outer = GraphPattern::group(vec![inner]);
        let optimized = optimize(outer);
        assert!(matches!(optimized.kind(), GraphPatternKind::Basic(_)));
    }

    #[test]
    fn graph_over_basic_pushes_origin_onto_triples() {
        let pattern = GraphPattern::graph(
            Literal::from_uri("urn:g"),
            GraphPattern::basic(vec![var_triple()]),
        );
        let optimized = optimize(pattern);
        match optimized.kind() {
            GraphPatternKind::Basic(triples) => {
                assert!(triples[0].origin.as_ref().unwrap().same_term(&Literal::from_uri("urn:g")));
            }
            other => panic!("expected Basic, got {other:?}"),
        }
    }

    #[test]
    fn singleton_group_without_filters_collapses() {
        let pattern = GraphPattern::group(vec![GraphPattern::basic(vec![var_triple()])]);
        let optimized = optimize(pattern);
        assert!(matches!(optimized.kind(), GraphPatternKind::Basic(_)));
    }

    #[test]
    fn filter_referencing_only_the_basics_own_variables_is_lifted_not_discarded() {
        use rdfq_model::{VariablesTable, Variable as ModelVariable};
        let mut table = VariablesTable::new();
        let s = table.get_or_insert(ModelVariable::new("s"));
        let triple = Triple::new(Literal::from_variable(s), Literal::from_uri("urn:p"), Literal::from_uri("urn:o"));
        let filter = Expression::SameTerm(
            Box::new(Expression::Constant(Literal::from_variable(s))),
            Box::new(Expression::Constant(Literal::from_uri("urn:s"))),
        );
        let basic = GraphPattern::basic(vec![triple]).with_filter(filter);
        // Two children so the Group doesn't collapse to a singleton, to
        // exercise the lift path independently of rewrite 3.
        let group = GraphPattern::group(vec![basic, GraphPattern::basic(vec![var_triple()])]);
        let optimized = optimize(group);
        assert_eq!(optimized.filters().len(), 1, "the filter must survive optimization, not vanish");
        match optimized.kind() {
            GraphPatternKind::Group(children) => {
                assert!(!children[0].has_filters(), "the filter should have moved off the Basic");
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn filter_referencing_an_unresolvable_name_is_kept_not_discarded() {
        use rdfq_model::Variable as ModelVariable;
        let filter = Expression::Bound(ModelVariable::new("o"));
        let basic = GraphPattern::basic(vec![var_triple()]).with_filter(filter);
        let group = GraphPattern::group(vec![basic, GraphPattern::basic(vec![var_triple()])]);
        let optimized = optimize(group);
        // Conservatively kept on the Basic rather than lifted (its variable
        // can't be checked against the Basic's variable set by name alone)
        // or dropped (which would silently change query results).
        match optimized.kind() {
            GraphPatternKind::Group(children) => {
                assert!(children[0].has_filters(), "the filter must not be discarded");
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }
}
