use crate::triples_source::{BoundParts, MatchCursor, MatchMeta, TriplesSource};
use crate::util::union_schema;
use crate::{RowSource, Schema};
use rdfq_model::{Literal, LiteralKind, Row, Triple, VariableHandle};
use std::rc::Rc;

fn pattern_variables(pattern: &Triple) -> Vec<VariableHandle> {
    let mut out = Vec::new();
    let mut push = |l: &Literal| {
        if let LiteralKind::Variable(h) = l.kind() {
            if !out.contains(h) {
                out.push(*h);
            }
        }
    };
    push(&pattern.subject);
    push(&pattern.predicate);
    push(&pattern.object);
    if let Some(origin) = &pattern.origin {
        push(origin);
    }
    out
}

/// Substitutes `pattern`'s variable slots that are already bound in `row`
/// (per `outer_schema`) with their bound `Literal`, leaving the rest as
/// `Literal::Variable` for the triples source to report back.
fn narrow(pattern: &Triple, outer_schema: &Schema, row: &Row) -> Triple {
    let bind = |l: &Literal| -> Literal {
        if let LiteralKind::Variable(h) = l.kind() {
            if let Some(pos) = outer_schema.position(*h) {
                if let Some(value) = row.get(pos) {
                    return value.clone();
                }
            }
        }
        l.clone()
    };
    Triple {
        subject: bind(&pattern.subject),
        predicate: bind(&pattern.predicate),
        object: bind(&pattern.object),
        origin: pattern.origin.as_ref().map(bind),
    }
}

/// Wraps a single triple pattern over a [`TriplesSource`] (spec §4.7,
/// "Triples-match"). For each row its `input` yields, it narrows the
/// pattern with that row's already-bound variables, opens a fresh
/// [`MatchCursor`], and yields one output row per ground triple the cursor
/// reports — the input row extended with the pattern's variable slots bound
/// from that triple. A `Basic` pattern's triple list compiles to a chain of
/// these, each wrapping the previous as `input`, so the join order is
/// exactly the triple order (spec §4.6, "the optimizer does NOT reorder
/// triples").
pub struct TriplesMatch {
    input: Box<dyn RowSource>,
    source: Rc<dyn TriplesSource>,
    pattern: Triple,
    pattern_variables: Vec<VariableHandle>,
    schema: Schema,
    outer_row: Option<Row>,
    cursor: Option<Box<dyn MatchCursor>>,
}

impl TriplesMatch {
    pub fn new(input: Box<dyn RowSource>, source: Rc<dyn TriplesSource>, pattern: Triple) -> Self {
        let pattern_variables = pattern_variables(&pattern);
        Self {
            input,
            source,
            pattern,
            pattern_variables,
            schema: Schema::default(),
            outer_row: None,
            cursor: None,
        }
    }

    fn advance_outer(&mut self) -> bool {
        let input_schema = self.input.ensure_variables().clone();
        match self.input.read_row() {
            Some(row) => {
                let narrowed = narrow(&self.pattern, &input_schema, &row);
                self.outer_row = Some(row);
                self.cursor = Some(self.source.new_match(&narrowed));
                true
            }
            None => {
                self.outer_row = None;
                self.cursor = None;
                false
            }
        }
    }
}

impl RowSource for TriplesMatch {
    fn ensure_variables(&mut self) -> &Schema {
        let input_schema = self.input.ensure_variables().clone();
        let extra = Schema::new(self.pattern_variables.clone());
        self.schema = union_schema(&input_schema, &extra);
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        loop {
            if self.cursor.is_none() && !self.advance_outer() {
                return None;
            }
            let mut meta = MatchMeta::default();
            let bound = self.cursor.as_mut().unwrap().bind_next(&mut meta);
            if bound.is_none() {
                self.cursor = None;
                continue;
            }
            let outer_row = self.outer_row.as_ref().unwrap();
            let input_schema = self.input.ensure_variables().clone();
            let mut out = Row::with_width(self.schema.width());
            for (i, handle) in self.schema.variables().iter().enumerate() {
                if let Some(pos) = input_schema.position(*handle) {
                    out.set(i, outer_row.get(pos).cloned());
                }
            }
            let slot_value = |slot: &Literal, bound_value: &Option<Literal>| -> Option<(VariableHandle, Literal)> {
                if let LiteralKind::Variable(h) = slot.kind() {
                    bound_value.clone().map(|v| (*h, v))
                } else {
                    None
                }
            };
            for (slot, value) in [
                (&self.pattern.subject, &meta.subject),
                (&self.pattern.predicate, &meta.predicate),
                (&self.pattern.object, &meta.object),
            ] {
                if let Some((handle, value)) = slot_value(slot, value) {
                    if let Some(pos) = self.schema.position(handle) {
                        out.set(pos, Some(value));
                    }
                }
            }
            if let Some(origin_slot) = &self.pattern.origin {
                if let Some((handle, value)) = slot_value(origin_slot, &meta.origin) {
                    if let Some(pos) = self.schema.position(handle) {
                        out.set(pos, Some(value));
                    }
                }
            }
            return Some(out);
        }
    }

    fn reset(&mut self) {
        self.input.reset();
        self.cursor = None;
        self.outer_row = None;
    }

    fn get_inner(&self, index: usize) -> Option<&dyn RowSource> {
        if index == 0 {
            Some(self.input.as_ref())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::RowSequence;
    use rdfq_model::Variable;

    struct FixedTriples(Vec<Triple>);

    struct FixedCursor {
        candidates: Vec<Triple>,
        position: usize,
    }

    impl MatchCursor for FixedCursor {
        fn bind_next(&mut self, meta: &mut MatchMeta) -> BoundParts {
            let Some(triple) = self.candidates.get(self.position) else {
                return BoundParts::NONE;
            };
            self.position += 1;
            let parts = BoundParts::SUBJECT | BoundParts::PREDICATE | BoundParts::OBJECT;
            meta.set(parts, triple);
            parts
        }
    }

    impl TriplesSource for FixedTriples {
        fn triple_present(&self, triple: &Triple) -> bool {
            self.0
                .iter()
                .any(|t| t.subject.same_term(&triple.subject) && t.object.same_term(&triple.object))
        }

        fn new_match(&self, pattern: &Triple) -> Box<dyn MatchCursor> {
            let candidates = self
                .0
                .iter()
                .filter(|t| {
                    let slot_matches = |slot: &Literal, value: &Literal| {
                        matches!(slot.kind(), LiteralKind::Variable(_)) || slot.same_term(value)
                    };
                    slot_matches(&pattern.subject, &t.subject)
                        && slot_matches(&pattern.predicate, &t.predicate)
                        && slot_matches(&pattern.object, &t.object)
                })
                .cloned()
                .collect();
            Box::new(FixedCursor {
                candidates,
                position: 0,
            })
        }

        fn named_graphs(&self) -> Vec<Literal> {
            Vec::new()
        }
    }

    #[test]
    fn binds_subject_and_object_from_matching_triples() {
        let mut table = rdfq_model::VariablesTable::new();
        let s = table.get_or_insert(Variable::new("s"));
        let o = table.get_or_insert(Variable::new("o"));

        let source: Rc<dyn TriplesSource> = Rc::new(FixedTriples(vec![
            Triple::new(
                Literal::from_uri("urn:a"),
                Literal::from_uri("urn:knows"),
                Literal::from_uri("urn:b"),
            ),
            Triple::new(
                Literal::from_uri("urn:a"),
                Literal::from_uri("urn:likes"),
                Literal::from_uri("urn:c"),
            ),
        ]));
        let pattern = Triple::new(
            Literal::from_variable(s),
            Literal::from_uri("urn:knows"),
            Literal::from_variable(o),
        );
        let mut triples_match = TriplesMatch::new(Box::new(RowSequence::unit()), source, pattern);
        triples_match.ensure_variables();
        let rows = triples_match.read_all_rows();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].get(0).unwrap().same_term(&Literal::from_uri("urn:a")));
        assert!(rows[0].get(1).unwrap().same_term(&Literal::from_uri("urn:b")));
    }
}
