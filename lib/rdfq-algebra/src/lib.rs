//! The graph-pattern algebra a query compiles to (spec §3/§4.6): the
//! tagged-variant tree a parser/AST builder produces, the `Query` struct
//! that holds it alongside the rest of a prepared query, and the
//! structural optimizer that rewrites the tree before `rdfq-plan` turns it
//! into a row-source tree.

mod error;
mod graph_pattern;
mod optimizer;
mod query;

pub use error::PrepareError;
pub use graph_pattern::{GraphPattern, GraphPatternKind};
pub use optimizer::optimize;
pub use query::{DatasetEntry, DatasetFlag, OrderCondition, Query, QueryVerb};
