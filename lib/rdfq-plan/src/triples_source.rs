use rdfq_algebra::Query;
use rdfq_model::{Literal, Triple};

/// Which of a triple pattern's four slots a [`MatchCursor::bind_next`] step
/// bound, as a bitmask (spec §4.8). Unbound slots in the pattern stay
/// unbound — a ground slot in the pattern is never reported here since it
/// was never a variable to begin with.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct BoundParts(u8);

impl BoundParts {
    pub const NONE: Self = Self(0);
    pub const SUBJECT: Self = Self(0b0001);
    pub const PREDICATE: Self = Self(0b0010);
    pub const OBJECT: Self = Self(0b0100);
    pub const ORIGIN: Self = Self(0b1000);

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn contains(self, part: Self) -> bool {
        self.0 & part.0 == part.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for BoundParts {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// The variable-slot pointers a [`MatchCursor`] binds into as it advances
/// (spec §4.8's "meta structure"). Each field is `Some` exactly when the
/// corresponding pattern slot is a `Literal::Variable`; `TriplesMatch`
/// (`rdfq-plan`'s row source) reads these back out into the row it yields
/// once a cursor step reports that slot as bound.
#[derive(Debug, Default, Clone)]
pub struct MatchMeta {
    pub subject: Option<Literal>,
    pub predicate: Option<Literal>,
    pub object: Option<Literal>,
    pub origin: Option<Literal>,
}

impl MatchMeta {
    pub fn set(&mut self, parts: BoundParts, triple: &Triple) {
        if parts.contains(BoundParts::SUBJECT) {
            self.subject = Some(triple.subject.clone());
        }
        if parts.contains(BoundParts::PREDICATE) {
            self.predicate = Some(triple.predicate.clone());
        }
        if parts.contains(BoundParts::OBJECT) {
            self.object = Some(triple.object.clone());
        }
        if parts.contains(BoundParts::ORIGIN) {
            self.origin = triple.origin.clone();
        }
    }
}

/// One open match over a triples source for a single triple pattern (spec
/// §4.8). `bind_next` advances the cursor one ground triple at a time,
/// writing the bound slots into `meta` and returning which slots it bound —
/// an empty [`BoundParts`] (`is_none()`) signals end-of-stream, mirroring
/// the source's "bitmask, or 0 for end" contract. Cursors are owned by the
/// `TriplesMatch` row source that opened them and are cleaned up by `Drop`
/// rather than an explicit `finish` call (see [`crate::RowSource`]'s doc
/// comment for why).
pub trait MatchCursor {
    fn bind_next(&mut self, meta: &mut MatchMeta) -> BoundParts;
}

/// A source of ground triples opened once per query and shared by every row
/// source within it (spec §4.8/§5). `new_match` opens a [`MatchCursor`] over
/// the ground triples matching `pattern` given the bindings already fixed
/// by the outer row (the caller fills in bound variable slots of `pattern`
/// with `Literal`s other than `Variable` before calling this — an unbound
/// slot stays a `Literal::Variable`).
pub trait TriplesSource {
    /// `true` iff `triple` (fully ground) is present in this source — the
    /// primitive `ASK`-style membership test spec §4.8 names
    /// (`triple_present`).
    fn triple_present(&self, triple: &Triple) -> bool;

    /// The cursor owns whatever it needs to iterate independently of `self`
    /// (a cloned candidate list, or an `Rc` clone of the source's backing
    /// index) rather than borrowing `self` — so a `TriplesMatch` row source
    /// can hold the source and its open cursor side by side without a
    /// self-referential struct.
    fn new_match(&self, pattern: &Triple) -> Box<dyn MatchCursor>;

    /// The set of named graphs currently available, for the `Graph` row
    /// source to iterate over when its graph term is a variable (spec
    /// §4.7's "Graph" row source).
    fn named_graphs(&self) -> Vec<Literal>;
}

/// Opens one [`TriplesSource`] per query (spec §4.8's factory). `rdfq`'s
/// facade crate supplies the one concrete implementation this workspace
/// ships (`MemoryTriplesSource`); a disk-backed or remote-endpoint source
/// is a separate crate a consumer can write against this trait (spec §1,
/// "consumers provide the RDF data through an injectable triples source").
pub trait TriplesSourceFactory {
    type Source: TriplesSource;

    fn open(&self, query: &Query) -> Self::Source;
}
