//! The SPARQL expression tree and its evaluator (spec §4.5).
//!
//! `Expression` is an arena-free owned tree (Design Notes §9: Rust's
//! ownership already gives free-once-at-drop for an owned tree, so no
//! separate arena is introduced). Evaluation is a direct post-order walk
//! against an [`EvalContext`] borrowing the query's row and variables
//! table, rather than the closure-compiling evaluator the corpus
//! (`spareval::expression`) uses to support multiple backing term
//! representations — `rdfq` has exactly one term representation
//! (`rdfq_model::Literal`), so that generality buys nothing here.

mod builtin;
mod eval;
mod expression;

pub use builtin::BuiltinFunction;
pub use eval::{CustomFunction, EvalContext, EvalError, EvalOutcome};
pub use expression::Expression;
