//! The one concrete [`TriplesSource`] this workspace ships (spec §4.8's
//! factory doc comment): a `Vec<Triple>` with secondary indexes over every
//! combination of ground subject/predicate/object slots, grounded in how
//! `oxrdf::Dataset` indexes quads for in-memory lookup.

use rdfq_model::{Literal, LiteralKind, Triple};
use rdfq_plan::{BoundParts, MatchCursor, MatchMeta, TriplesSource};
use std::collections::HashMap;
use std::rc::Rc;

/// A canonical string key for a ground `Literal`, unambiguous across kinds
/// (each arm's tag byte rules out cross-kind collisions) since `Literal`
/// carries no `Hash` impl of its own (Design Notes §9).
fn term_key(literal: &Literal) -> String {
    match literal.kind() {
        LiteralKind::Blank(v) => format!("B|{v}"),
        LiteralKind::Uri(v) => format!("U|{v}"),
        LiteralKind::PlainString { value, language } => {
            format!("P|{}|{value}", language.as_deref().unwrap_or(""))
        }
        LiteralKind::XsdString(v) => format!("S|{v}"),
        LiteralKind::Boolean(v) => format!("Bo|{v}"),
        LiteralKind::Integer(v) => format!("I|{v}"),
        LiteralKind::Float(v) => format!("F|{v}"),
        LiteralKind::Double(v) => format!("D|{v}"),
        LiteralKind::Decimal(v) => format!("De|{v}"),
        LiteralKind::Date(v) => format!("Da|{v}"),
        LiteralKind::DateTime(v) => format!("Dt|{v}"),
        LiteralKind::Pattern { pattern, flags } => format!("Pa|{flags}|{pattern}"),
        LiteralKind::QName { prefix, local } => {
            format!("Q|{}|{local}", prefix.as_deref().unwrap_or(""))
        }
        LiteralKind::UserDefinedType { value, datatype } => format!("UDT|{datatype}|{value}"),
        LiteralKind::Variable(_) => String::new(),
    }
}

fn ground_key(literal: &Literal) -> Option<String> {
    match literal.kind() {
        LiteralKind::Variable(_) => None,
        _ => Some(term_key(literal)),
    }
}

/// Whether a fact's origin slot satisfies a pattern's origin slot (spec
/// §4.7's dataset semantics, not spelled out as a single rule but implied
/// by `Graph`/`TriplesMatch`'s division of labor): a pattern with no
/// `GRAPH` wrapper (`origin: None`) only ever sees background-graph facts;
/// a `GRAPH ?g` pattern (origin a variable) sees any named-graph fact; a
/// `GRAPH <uri>` pattern sees only that graph's facts.
fn origin_matches(pattern_origin: &Option<Literal>, fact_origin: &Option<Literal>) -> bool {
    match pattern_origin {
        None => fact_origin.is_none(),
        Some(term) => match term.kind() {
            LiteralKind::Variable(_) => fact_origin.is_some(),
            _ => fact_origin.as_ref().is_some_and(|g| g.same_term(term)),
        },
    }
}

fn bound_parts_of(pattern: &Triple) -> BoundParts {
    let mut parts = BoundParts::NONE;
    if matches!(pattern.subject.kind(), LiteralKind::Variable(_)) {
        parts = parts | BoundParts::SUBJECT;
    }
    if matches!(pattern.predicate.kind(), LiteralKind::Variable(_)) {
        parts = parts | BoundParts::PREDICATE;
    }
    if matches!(pattern.object.kind(), LiteralKind::Variable(_)) {
        parts = parts | BoundParts::OBJECT;
    }
    if matches!(
        pattern.origin.as_ref().map(Literal::kind),
        Some(LiteralKind::Variable(_))
    ) {
        parts = parts | BoundParts::ORIGIN;
    }
    parts
}

/// An in-memory `TriplesSource`: background-graph triples have
/// `origin: None`, named-graph triples carry `origin: Some(graph)`.
/// Consumers build one with [`MemoryTriplesSource::insert`]/
/// [`MemoryTriplesSource::insert_named`], then wrap it in an `Rc` to hand
/// to [`crate::execute`].
#[derive(Default)]
pub struct MemoryTriplesSource {
    facts: Vec<Triple>,
    by_spo: HashMap<(String, String, String), Vec<usize>>,
    by_sp: HashMap<(String, String), Vec<usize>>,
    by_so: HashMap<(String, String), Vec<usize>>,
    by_po: HashMap<(String, String), Vec<usize>>,
    by_s: HashMap<String, Vec<usize>>,
    by_p: HashMap<String, Vec<usize>>,
    by_o: HashMap<String, Vec<usize>>,
}

impl MemoryTriplesSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a background-graph (default graph) triple.
    pub fn insert(&mut self, triple: Triple) {
        self.insert_indexed(triple);
    }

    /// Adds a triple scoped to the named graph `graph`.
    pub fn insert_named(&mut self, graph: Literal, triple: Triple) {
        self.insert_indexed(triple.with_origin(graph));
    }

    fn insert_indexed(&mut self, triple: Triple) {
        let index = self.facts.len();
        let s = term_key(&triple.subject);
        let p = term_key(&triple.predicate);
        let o = term_key(&triple.object);
        self.by_spo
            .entry((s.clone(), p.clone(), o.clone()))
            .or_default()
            .push(index);
        self.by_sp.entry((s.clone(), p.clone())).or_default().push(index);
        self.by_so.entry((s.clone(), o.clone())).or_default().push(index);
        self.by_po.entry((p.clone(), o.clone())).or_default().push(index);
        self.by_s.entry(s).or_default().push(index);
        self.by_p.entry(p).or_default().push(index);
        self.by_o.entry(o).or_default().push(index);
        self.facts.push(triple);
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    fn candidate_indices(&self, pattern: &Triple) -> Vec<usize> {
        let s = ground_key(&pattern.subject);
        let p = ground_key(&pattern.predicate);
        let o = ground_key(&pattern.object);
        match (s, p, o) {
            (Some(s), Some(p), Some(o)) => {
                self.by_spo.get(&(s, p, o)).cloned().unwrap_or_default()
            }
            (Some(s), Some(p), None) => self.by_sp.get(&(s, p)).cloned().unwrap_or_default(),
            (Some(s), None, Some(o)) => self.by_so.get(&(s, o)).cloned().unwrap_or_default(),
            (None, Some(p), Some(o)) => self.by_po.get(&(p, o)).cloned().unwrap_or_default(),
            (Some(s), None, None) => self.by_s.get(&s).cloned().unwrap_or_default(),
            (None, Some(p), None) => self.by_p.get(&p).cloned().unwrap_or_default(),
            (None, None, Some(o)) => self.by_o.get(&o).cloned().unwrap_or_default(),
            (None, None, None) => (0..self.facts.len()).collect(),
        }
    }
}

impl TriplesSource for MemoryTriplesSource {
    fn triple_present(&self, triple: &Triple) -> bool {
        let key = (
            term_key(&triple.subject),
            term_key(&triple.predicate),
            term_key(&triple.object),
        );
        self.by_spo
            .get(&key)
            .is_some_and(|idxs| idxs.iter().any(|&i| origin_matches(&triple.origin, &self.facts[i].origin)))
    }

    fn new_match(&self, pattern: &Triple) -> Box<dyn MatchCursor> {
        let bound_mask = bound_parts_of(pattern);
        let candidates: Vec<Triple> = self
            .candidate_indices(pattern)
            .into_iter()
            .map(|i| self.facts[i].clone())
            .filter(|fact| origin_matches(&pattern.origin, &fact.origin))
            .collect();
        Box::new(MemoryMatchCursor {
            candidates,
            bound_mask,
            position: 0,
        })
    }

    fn named_graphs(&self) -> Vec<Literal> {
        let mut out: Vec<Literal> = Vec::new();
        for fact in &self.facts {
            if let Some(origin) = &fact.origin {
                if !out.iter().any(|g| g.same_term(origin)) {
                    out.push(origin.clone());
                }
            }
        }
        out
    }
}

/// `TriplesSource` delegates through the `Rc`, so a factory (or the plan
/// builder) can hand out cheap clones of a shared store.
impl TriplesSource for Rc<MemoryTriplesSource> {
    fn triple_present(&self, triple: &Triple) -> bool {
        (**self).triple_present(triple)
    }

    fn new_match(&self, pattern: &Triple) -> Box<dyn MatchCursor> {
        (**self).new_match(pattern)
    }

    fn named_graphs(&self) -> Vec<Literal> {
        (**self).named_graphs()
    }
}

struct MemoryMatchCursor {
    candidates: Vec<Triple>,
    bound_mask: BoundParts,
    position: usize,
}

impl MatchCursor for MemoryMatchCursor {
    fn bind_next(&mut self, meta: &mut MatchMeta) -> BoundParts {
        let Some(triple) = self.candidates.get(self.position) else {
            return BoundParts::NONE;
        };
        self.position += 1;
        meta.set(self.bound_mask, triple);
        self.bound_mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Literal {
        Literal::from_uri(s)
    }

    #[test]
    fn ground_triple_present_check_respects_the_default_graph() {
        let mut store = MemoryTriplesSource::new();
        store.insert(Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:b")));
        assert!(store.triple_present(&Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:b"))));
        assert!(!store.triple_present(&Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:c"))));
    }

    #[test]
    fn new_match_with_ground_subject_only_returns_indexed_candidates() {
        let mut store = MemoryTriplesSource::new();
        store.insert(Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:b")));
        store.insert(Triple::new(uri("urn:a"), uri("urn:q"), uri("urn:c")));
        store.insert(Triple::new(uri("urn:z"), uri("urn:p"), uri("urn:b")));

        let mut vars = rdfq_model::VariablesTable::new();
        let p = vars.get_or_insert(rdfq_model::Variable::new("p"));
        let o = vars.get_or_insert(rdfq_model::Variable::new("o"));
        let pattern = Triple::new(uri("urn:a"), Literal::from_variable(p), Literal::from_variable(o));
        let mut cursor = store.new_match(&pattern);
        let mut count = 0;
        loop {
            let mut meta = MatchMeta::default();
            if cursor.bind_next(&mut meta).is_none() {
                break;
            }
            count += 1;
        }
        assert_eq!(count, 2);
    }

    #[test]
    fn named_graph_triples_are_invisible_to_background_patterns() {
        let mut store = MemoryTriplesSource::new();
        store.insert_named(uri("urn:g1"), Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:b")));
        assert!(!store.triple_present(&Triple::new(uri("urn:a"), uri("urn:p"), uri("urn:b"))));
        assert_eq!(store.named_graphs().len(), 1);
    }
}
