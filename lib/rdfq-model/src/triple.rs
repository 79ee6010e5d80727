use crate::Literal;

/// A triple, used both as a ground fact (every slot a `Blank`/`Uri`/typed
/// literal) and as a triple *pattern* (any slot may hold a `Literal::Variable`
/// instead), per spec §3. `origin` is the named-graph term, present only
/// inside `GRAPH` patterns or quad-shaped ground facts.
#[derive(Debug, Clone)]
pub struct Triple {
    pub subject: Literal,
    pub predicate: Literal,
    pub object: Literal,
    pub origin: Option<Literal>,
}

impl Triple {
    pub fn new(subject: Literal, predicate: Literal, object: Literal) -> Self {
        Self {
            subject,
            predicate,
            object,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: Literal) -> Self {
        self.origin = Some(origin);
        self
    }

    /// True if none of this triple's slots is a `Literal::Variable` — i.e.
    /// it can be matched against a triples source directly rather than
    /// needing binding.
    pub fn is_ground(&self) -> bool {
        use crate::LiteralKind::Variable;
        !matches!(self.subject.kind(), Variable(_))
            && !matches!(self.predicate.kind(), Variable(_))
            && !matches!(self.object.kind(), Variable(_))
            && !matches!(self.origin.as_ref().map(Literal::kind), Some(Variable(_)))
    }
}
