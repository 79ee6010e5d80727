//! A content-type-keyed registry of results formatters (spec §6, "the
//! reader ... and writer interfaces accept any formatter plug-in whose
//! descriptor is registered at world initialization"): the remote-service
//! row source looks a response's `Content-Type` up here rather than
//! hard-coding a single parser, the same way `sparesults::QueryResultsFormat`
//! dispatches on content type, except here the dispatch table is an open,
//! caller-populated registry instead of a fixed enum.

use crate::error::ProtocolError;
use crate::xml_format::{read_sparql_xml_results, XmlResults};
use rdfq_model::{Row, VariablesTable};
use rdfq_plan::Schema;

/// What a successfully parsed response yields: either a boolean (ASK) or a
/// schema plus solution rows (SELECT).
pub enum ParsedResults {
    Boolean(bool),
    Solutions { schema: Schema, rows: Vec<Row> },
}

type ParseFn = fn(&[u8], &mut VariablesTable) -> Result<ParsedResults, ProtocolError>;

struct Descriptor {
    content_type: &'static str,
    parse: ParseFn,
}

fn parse_xml(bytes: &[u8], variables: &mut VariablesTable) -> Result<ParsedResults, ProtocolError> {
    match read_sparql_xml_results(bytes, variables)? {
        XmlResults::Boolean(value) => Ok(ParsedResults::Boolean(value)),
        XmlResults::Solutions { schema, rows } => Ok(ParsedResults::Solutions { schema, rows }),
    }
}

/// An open registry of (content-type, parser) pairs, populated at world
/// initialization (spec §6) with the built-in SPARQL XML results format and
/// extensible by a caller registering additional descriptors for formats
/// this crate doesn't parse natively (e.g. the JSON results format).
pub struct FormatterRegistry {
    descriptors: Vec<Descriptor>,
}

impl FormatterRegistry {
    /// Registers the built-in `application/sparql-results+xml` formatter —
    /// the default `Accept` header spec §6's remote protocol sends.
    pub fn with_defaults() -> Self {
        let mut registry = Self { descriptors: Vec::new() };
        registry.register("application/sparql-results+xml", parse_xml);
        registry
    }

    pub fn register(&mut self, content_type: &'static str, parse: ParseFn) {
        self.descriptors.push(Descriptor { content_type, parse });
    }

    /// Looks a formatter up by the response's `Content-Type` header value,
    /// matching on the MIME type only (ignoring `charset=...` and other
    /// parameters).
    pub fn parse(
        &self,
        content_type: &str,
        bytes: &[u8],
        variables: &mut VariablesTable,
    ) -> Result<ParsedResults, ProtocolError> {
        let mime = content_type.split(';').next().unwrap_or(content_type).trim();
        let descriptor = self
            .descriptors
            .iter()
            .find(|d| d.content_type.eq_ignore_ascii_case(mime))
            .ok_or_else(|| ProtocolError::UnsupportedContentType(content_type.to_string()))?;
        (descriptor.parse)(bytes, variables)
    }
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_content_type_is_rejected() {
        let registry = FormatterRegistry::with_defaults();
        let mut variables = VariablesTable::new();
        let err = registry.parse("application/x-unknown", b"", &mut variables);
        assert!(matches!(err, Err(ProtocolError::UnsupportedContentType(_))));
    }

    #[test]
    fn xml_content_type_with_charset_param_is_matched() {
        let registry = FormatterRegistry::with_defaults();
        let mut variables = VariablesTable::new();
        let xml = br#"<?xml version="1.0"?><sparql xmlns="http://www.w3.org/2005/sparql-results#"><head/><boolean>false</boolean></sparql>"#;
        let parsed = registry
            .parse("application/sparql-results+xml; charset=utf-8", xml, &mut variables)
            .unwrap();
        assert!(matches!(parsed, ParsedResults::Boolean(false)));
    }
}
