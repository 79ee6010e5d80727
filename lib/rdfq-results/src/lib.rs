//! Result cursors' raw materials (spec §4.9): the DAWG RDF-results
//! reader/writer, the SPARQL XML results parser, a content-type keyed
//! formatter registry, and the `SERVICE`-clause remote row source. The
//! actual cursor types (`BindingsCursor`, `GraphCursor`) live in the
//! `rdfq` facade crate, which owns the row-source tree they wrap.

mod dawg;
mod error;
mod formatter;
mod service;
mod xml_format;

pub use dawg::{vocab, write_rdf_results, RdfResultsReader};
pub use error::ProtocolError;
pub use formatter::{FormatterRegistry, ParsedResults};
pub use service::{HttpClient, RemoteService, ServiceResponse};
pub use xml_format::{read_sparql_xml_results, XmlResults};
