//! The concrete row sources a `Query`'s pattern tree compiles to (spec
//! §4.7): one type per bullet in spec's row-source list, each a small,
//! independently testable `impl RowSource`.

mod distinct;
mod extend;
mod filter;
mod graph;
mod join;
mod left_join;
mod project;
mod row_sequence;
mod slice;
mod sort;
mod triples_match;
mod union;

pub use distinct::Distinct;
pub use extend::Extend;
pub use filter::Filter;
pub use graph::Graph;
pub use join::Join;
pub use left_join::LeftJoin;
pub use project::Project;
pub use row_sequence::RowSequence;
pub use slice::Slice;
pub use sort::Sort;
pub use triples_match::TriplesMatch;
pub use union::Union;
