use crate::GraphPattern;
use rdfq_expr::Expression;
use rdfq_model::{Literal, Triple, VariableHandle, VariablesTable};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum QueryVerb {
    Select,
    Construct,
    Describe,
    Ask,
}

/// Whether a dataset entry is the query's default (background) graph or a
/// named graph made available to `GRAPH` patterns (spec §3/§9). At most one
/// `Background` entry is honored; a preparer that finds more than one
/// should warn rather than error.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum DatasetFlag {
    Background,
    Named,
}

/// One `FROM`/`FROM NAMED` entry (spec §3's dataset descriptor).
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub uri: String,
    pub name_uri: Option<String>,
    pub flag: DatasetFlag,
}

/// A single `ORDER BY` condition: the key expression and its direction,
/// already split from the `Asc`/`Desc` wrapper (see
/// `Expression::strip_order_direction`).
#[derive(Debug, Clone)]
pub struct OrderCondition {
    pub expression: Expression,
    pub descending: bool,
}

impl OrderCondition {
    pub fn from_expression(expr: Expression) -> Self {
        let (inner, descending) = expr.strip_order_direction();
        Self {
            expression: inner.clone(),
            descending,
        }
    }
}

/// A fully prepared query: spec §3's `Query` struct (verb, variables
/// table, dataset, prefix map, projection, pattern tree, order
/// conditions, `distinct`, `limit`/`offset`, construct template, optional
/// service endpoint).
#[derive(Debug, Clone)]
pub struct Query {
    pub verb: QueryVerb,
    pub variables: VariablesTable,
    pub dataset: Vec<DatasetEntry>,
    pub prefixes: HashMap<String, String>,
    pub projection: Vec<VariableHandle>,
    pub pattern: GraphPattern,
    pub order_by: Vec<OrderCondition>,
    pub distinct: bool,
    /// Negative means unset, matching spec §3's "negative = unset"
    /// encoding (rather than an `Option<i64>`, so a query's offset/limit
    /// round-trips through the same representation the wire grammar uses).
    pub limit: i64,
    pub offset: i64,
    pub construct_template: Vec<Triple>,
    pub service_endpoint: Option<String>,
    /// Set by [`Query::prepare`] when the dataset descriptor carries more
    /// than one `Background` entry (spec §3/§9: "at most one Background
    /// entry is honored... duplicates produce a warning"). Mirrors
    /// `rdfq_results::RemoteService::dropped_background_graphs_warning` —
    /// this crate has no logging facility in scope either, so the caller
    /// that does (the plan builder, a CLI, ...) decides what to do with it.
    pub dropped_background_graphs_warning: Option<String>,
}

impl Query {
    pub const UNSET: i64 = -1;

    pub fn new(verb: QueryVerb, variables: VariablesTable, pattern: GraphPattern) -> Self {
        Self {
            verb,
            variables,
            dataset: Vec::new(),
            prefixes: HashMap::new(),
            projection: Vec::new(),
            pattern,
            order_by: Vec::new(),
            distinct: false,
            limit: Self::UNSET,
            offset: Self::UNSET,
            construct_template: Vec::new(),
            service_endpoint: None,
            dropped_background_graphs_warning: None,
        }
    }

    pub fn has_limit(&self) -> bool {
        self.limit >= 0
    }

    pub fn has_offset(&self) -> bool {
        self.offset >= 0
    }

    /// The single honored background graph, if any (spec §3's "at most
    /// one Background entry is honored") — the first `Background` entry in
    /// dataset order. When more than one is present, [`Query::prepare`]
    /// records that in [`Query::dropped_background_graphs_warning`]; this
    /// accessor itself stays silent since it doesn't own a place to warn.
    pub fn background_graph(&self) -> Option<&DatasetEntry> {
        self.dataset
            .iter()
            .find(|entry| entry.flag == DatasetFlag::Background)
    }

    /// How many `Background` dataset entries are present — used by
    /// [`Query::prepare`] to decide whether to set
    /// [`Query::dropped_background_graphs_warning`].
    fn background_graph_count(&self) -> usize {
        self.dataset
            .iter()
            .filter(|entry| entry.flag == DatasetFlag::Background)
            .count()
    }

    pub fn named_graphs(&self) -> impl Iterator<Item = &DatasetEntry> {
        self.dataset
            .iter()
            .filter(|entry| entry.flag == DatasetFlag::Named)
    }

    /// Resolve a `QName`'s prefix against the query's prefix map, per the
    /// final optimizer rewrite (spec §4.6 step 5). Returns the expanded
    /// URI, or `None` if the prefix isn't declared.
    pub fn expand_qname(&self, prefix: &str, local: &str) -> Option<String> {
        self.prefixes
            .get(prefix)
            .map(|base| format!("{base}{local}"))
    }

    /// Resolve every `QName` literal reachable from the pattern tree and
    /// construct template against the prefix map, failing preparation on
    /// the first unresolved prefix (spec §4.6 step 5, §7
    /// `PrepareError::UnresolvedPrefix`).
    pub fn resolve_qnames(&mut self) -> Result<(), crate::PrepareError> {
        let prefixes = self.prefixes.clone();
        resolve_qnames_in_pattern(&mut self.pattern, &prefixes)?;
        for triple in &mut self.construct_template {
            resolve_qname_literal(&mut triple.subject, &prefixes)?;
            resolve_qname_literal(&mut triple.predicate, &prefixes)?;
            resolve_qname_literal(&mut triple.object, &prefixes)?;
            if let Some(origin) = &mut triple.origin {
                resolve_qname_literal(origin, &prefixes)?;
            }
        }
        Ok(())
    }

    /// Runs query preparation (spec §4.6): resolve `QName`s against the
    /// prefix map (rewrite 5), then run the four structural rewrites
    /// (rewrites 1-4, [`crate::optimize`]) to a fixpoint. Also records
    /// [`Query::dropped_background_graphs_warning`] when the dataset
    /// descriptor carries more than one `Background` entry (spec §3/§9).
    /// Consumes and returns `self` so a caller can chain it onto a
    /// freshly-built `Query` before handing it to `rdfq-plan`'s row-source
    /// builder.
    pub fn prepare(mut self) -> Result<Self, crate::PrepareError> {
        self.resolve_qnames()?;
        self.pattern = crate::optimize(self.pattern);
        let background_count = self.background_graph_count();
        if background_count > 1 {
            self.dropped_background_graphs_warning = Some(format!(
                "{background_count} FROM (background) graphs declared; only the first, {}, is honored",
                self.background_graph()
                    .map(|entry| entry.uri.as_str())
                    .unwrap_or("<none>")
            ));
        }
        Ok(self)
    }
}

fn resolve_qname_literal(
    literal: &mut Literal,
    prefixes: &HashMap<String, String>,
) -> Result<(), crate::PrepareError> {
    if let rdfq_model::LiteralKind::QName { prefix, local } = literal.kind() {
        let base = prefixes
            .get(prefix)
            .ok_or_else(|| crate::PrepareError::UnresolvedPrefix(prefix.clone()))?;
        *literal = Literal::from_uri(format!("{base}{local}"));
    }
    Ok(())
}

fn resolve_qnames_in_triples(
    triples: &mut [Triple],
    prefixes: &HashMap<String, String>,
) -> Result<(), crate::PrepareError> {
    for triple in triples {
        resolve_qname_literal(&mut triple.subject, prefixes)?;
        resolve_qname_literal(&mut triple.predicate, prefixes)?;
        resolve_qname_literal(&mut triple.object, prefixes)?;
        if let Some(origin) = &mut triple.origin {
            resolve_qname_literal(origin, prefixes)?;
        }
    }
    Ok(())
}

fn resolve_qnames_in_expr(
    expr: &mut Expression,
    prefixes: &HashMap<String, String>,
) -> Result<(), crate::PrepareError> {
    use Expression::*;
    match expr {
        Constant(literal) => resolve_qname_literal(literal, prefixes)?,
        Variable(_) | Bound(_) => {}
        And(children) | Or(children) => {
            for child in children {
                resolve_qnames_in_expr(child, prefixes)?;
            }
        }
        Not(inner) | UnaryPlus(inner) | UnaryMinus(inner) | IsUri(inner) | IsBlank(inner)
        | IsLiteral(inner) | Str(inner) | Lang(inner) | Datatype(inner) | Asc(inner)
        | Desc(inner) => resolve_qnames_in_expr(inner, prefixes)?,
        Equal(a, b) | NotEqual(a, b) | SameTerm(a, b) | Less(a, b) | LessOrEqual(a, b)
        | Greater(a, b) | GreaterOrEqual(a, b) | Add(a, b) | Subtract(a, b) | Multiply(a, b)
        | Divide(a, b) | StrEq(a, b) | StrNeq(a, b) => {
            resolve_qnames_in_expr(a, prefixes)?;
            resolve_qnames_in_expr(b, prefixes)?;
        }
        Regex {
            subject,
            pattern,
            flags,
        } => {
            resolve_qnames_in_expr(subject, prefixes)?;
            resolve_qnames_in_expr(pattern, prefixes)?;
            if let Some(flags) = flags {
                resolve_qnames_in_expr(flags, prefixes)?;
            }
        }
        Cast { inner, .. } => resolve_qnames_in_expr(inner, prefixes)?,
        FunctionCall(_, args) => {
            for arg in args {
                resolve_qnames_in_expr(arg, prefixes)?;
            }
        }
    }
    Ok(())
}

fn resolve_qnames_in_pattern(
    pattern: &mut GraphPattern,
    prefixes: &HashMap<String, String>,
) -> Result<(), crate::PrepareError> {
    use crate::GraphPatternKind::*;
    for filter in pattern.filters_mut() {
        resolve_qnames_in_expr(filter, prefixes)?;
    }
    match pattern.kind_mut() {
        Basic(triples) => resolve_qnames_in_triples(triples, prefixes)?,
        Group(children) | Optional(children) | Union(children) => {
            for child in children {
                resolve_qnames_in_pattern(child, prefixes)?;
            }
        }
        Graph(term, child) => {
            resolve_qname_literal(term, prefixes)?;
            resolve_qnames_in_pattern(child, prefixes)?;
        }
        Extend(inner, _, expr) => {
            resolve_qnames_in_expr(expr, prefixes)?;
            resolve_qnames_in_pattern(inner, prefixes)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphPattern;
    use rdfq_model::Triple;

    fn empty_pattern() -> GraphPattern {
        GraphPattern::basic(vec![Triple::new(
            Literal::from_uri("urn:s"),
            Literal::from_uri("urn:p"),
            Literal::from_uri("urn:o"),
        )])
    }

    #[test]
    fn single_background_graph_prepares_without_a_warning() {
        let mut query = Query::new(QueryVerb::Select, VariablesTable::new(), empty_pattern());
        query.dataset.push(DatasetEntry {
            uri: "urn:g1".to_string(),
            name_uri: None,
            flag: DatasetFlag::Background,
        });
        let query = query.prepare().unwrap();
        assert!(query.dropped_background_graphs_warning.is_none());
        assert_eq!(query.background_graph().unwrap().uri, "urn:g1");
    }

    #[test]
    fn duplicate_background_graphs_produce_a_warning_and_keep_the_first() {
        let mut query = Query::new(QueryVerb::Select, VariablesTable::new(), empty_pattern());
        query.dataset.push(DatasetEntry {
            uri: "urn:g1".to_string(),
            name_uri: None,
            flag: DatasetFlag::Background,
        });
        query.dataset.push(DatasetEntry {
            uri: "urn:g2".to_string(),
            name_uri: None,
            flag: DatasetFlag::Background,
        });
        let query = query.prepare().unwrap();
        assert_eq!(query.background_graph().unwrap().uri, "urn:g1");
        let warning = query.dropped_background_graphs_warning.unwrap();
        assert!(warning.contains("urn:g1"));
    }
}
