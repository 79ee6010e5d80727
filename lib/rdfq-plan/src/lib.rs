//! The triples-source interface and row-source execution framework (spec
//! §4.7/§4.8): the pull-iterator contract every concrete row source
//! implements, the injectable interface a backing RDF store matches against
//! through, and the thirteen concrete row sources a prepared `Query`'s
//! pattern tree compiles to.

mod debug;
mod error;
mod row_source;
pub mod sources;
mod triples_source;
mod util;

pub use debug::print_row_sequence;
pub use error::EvaluationError;
pub use row_source::{RowSource, Schema};
pub use triples_source::{BoundParts, MatchCursor, MatchMeta, TriplesSource, TriplesSourceFactory};
