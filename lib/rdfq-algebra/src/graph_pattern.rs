use rdfq_expr::Expression;
use rdfq_model::{Literal, Triple, VariableHandle};

/// The shape a graph pattern tree takes (spec §3): `Basic`, `Group`,
/// `Optional`, `Union` and `Graph`, plus `Extend` — grounded in
/// `spargebra::algebra::GraphPattern::Extend`, a supplement for `BIND`
/// that the distilled variant list omits but the row-source framework
/// (which lists an `Extend` row source) requires a tree node to build
/// from.
///
/// `Group`/`Optional`/`Union` are n-ary: the row-source builder folds an
/// n-ary `Group` into successive binary `Join`s and an n-ary `Optional`
/// into successive binary `Left-join`s, left to right, preserving source
/// order (spec §4.6, "The optimizer does NOT reorder triples or
/// children").
#[derive(Debug, Clone)]
pub enum GraphPatternKind {
    Basic(Vec<Triple>),
    Group(Vec<GraphPattern>),
    Optional(Vec<GraphPattern>),
    Union(Vec<GraphPattern>),
    /// `term` is a `Literal::Uri` for a fixed named graph or a
    /// `Literal::Variable` to iterate the dataset's named graphs.
    Graph(Literal, Box<GraphPattern>),
    Extend(Box<GraphPattern>, VariableHandle, Expression),
}

/// A graph-pattern node: its shape plus the filter expressions attached
/// to it, ANDed together (spec §3, "plus an attached sequence of filter
/// expressions (logical AND)").
#[derive(Debug, Clone)]
pub struct GraphPattern {
    kind: GraphPatternKind,
    filters: Vec<Expression>,
}

impl GraphPattern {
    pub fn new(kind: GraphPatternKind) -> Self {
        Self {
            kind,
            filters: Vec::new(),
        }
    }

    pub fn basic(triples: Vec<Triple>) -> Self {
        Self::new(GraphPatternKind::Basic(triples))
    }

    pub fn group(children: Vec<GraphPattern>) -> Self {
        Self::new(GraphPatternKind::Group(children))
    }

    pub fn optional(children: Vec<GraphPattern>) -> Self {
        Self::new(GraphPatternKind::Optional(children))
    }

    pub fn union(children: Vec<GraphPattern>) -> Self {
        Self::new(GraphPatternKind::Union(children))
    }

    pub fn graph(term: Literal, child: GraphPattern) -> Self {
        Self::new(GraphPatternKind::Graph(term, Box::new(child)))
    }

    pub fn extend(inner: GraphPattern, variable: VariableHandle, expression: Expression) -> Self {
        Self::new(GraphPatternKind::Extend(
            Box::new(inner),
            variable,
            expression,
        ))
    }

    pub fn with_filter(mut self, filter: Expression) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn kind(&self) -> &GraphPatternKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut GraphPatternKind {
        &mut self.kind
    }

    pub fn into_kind(self) -> GraphPatternKind {
        self.kind
    }

    pub fn filters(&self) -> &[Expression] {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut Vec<Expression> {
        &mut self.filters
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// The set of variable handles a `Basic` pattern's triples mention,
    /// used by the filter-lifting rewrite (spec §4.6 step 2) to decide
    /// whether a filter may move from the `Basic` up to its enclosing
    /// `Group` without changing scope.
    pub fn basic_variables(triples: &[Triple]) -> Vec<VariableHandle> {
        let mut out = Vec::new();
        let mut push = |l: &Literal| {
            if let rdfq_model::LiteralKind::Variable(h) = l.kind() {
                if !out.contains(h) {
                    out.push(*h);
                }
            }
        };
        for t in triples {
            push(&t.subject);
            push(&t.predicate);
            push(&t.object);
            if let Some(origin) = &t.origin {
                push(origin);
            }
        }
        out
    }
}
