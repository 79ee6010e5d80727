//! Helper datatypes implementing a practical subset of the
//! [XML Schema built-in datatypes](https://www.w3.org/TR/xmlschema11-2/)
//! SPARQL value comparison and arithmetic need.
//!
//! This crate is the "helper module" boundary `rdfq-model`/`rdfq-expr`
//! delegate arbitrary-precision decimal arithmetic and date/time handling
//! to; it has no knowledge of RDF terms or SPARQL algebra.

mod boolean;
mod date_time;
mod decimal;
mod double;
mod float;
mod integer;

pub use boolean::Boolean;
pub use date_time::{Date, DateTime, ParseDateTimeError, TimezoneOffset};
pub use decimal::{Decimal, ParseDecimalError};
pub use double::Double;
pub use float::Float;
pub use integer::{Integer, TooLargeForIntegerError};
