//! The `SERVICE`-clause remote row source (spec §4.7 "Remote service",
//! §6 "Remote SPARQL protocol"): builds the `service_uri?query=...` GET URL,
//! fetches it with the `oxhttp`-based client grounded in
//! `oxigraph::sparql::http::simple::Client`, and hands the response body to
//! [`crate::formatter::FormatterRegistry`] keyed by the response's
//! `Content-Type`. The fetch is a one-shot blocking call (spec §5,
//! "Suspension points" names only the triples source and remote-service I/O
//! as blocking points, thread-per-query is sufficient), so rows are
//! materialized eagerly rather than streamed incrementally.

use crate::error::ProtocolError;
use crate::formatter::{FormatterRegistry, ParsedResults};
use oxhttp::model::header::{ACCEPT, CONTENT_TYPE};
use oxhttp::model::Request;
use rdfq_model::{Row, VariablesTable};
use rdfq_plan::{RowSource, Schema};
use std::io::Read;
use std::time::Duration;

const DEFAULT_ACCEPT: &str = "application/sparql-results+xml";

/// A thin wrapper around `oxhttp::Client`, mirroring
/// `oxigraph::sparql::http::simple::Client`'s constructor and `get` shape.
pub struct HttpClient {
    client: oxhttp::Client,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>, redirection_limit: usize) -> Self {
        let mut client = oxhttp::Client::new().with_redirection_limit(redirection_limit);
        if let Some(timeout) = timeout {
            client = client.with_global_timeout(timeout);
        }
        Self { client }
    }

    fn get(&self, url: &str, accept: &str) -> Result<(String, Vec<u8>), ProtocolError> {
        let request = Request::builder()
            .uri(url)
            .header(ACCEPT, accept)
            .body(())
            .map_err(|e| ProtocolError::Http(e.to_string()))?;
        let response = self
            .client
            .request(request)
            .map_err(|e| ProtocolError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::Http(format!(
                "{status} returned by {url}"
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_ACCEPT)
            .to_owned();
        let mut body = Vec::new();
        response.into_body().read_to_end(&mut body)?;
        Ok((content_type, body))
    }
}

fn build_url(service_uri: &str, query: &str, default_graphs: &[String], named_graphs: &[String]) -> String {
    let mut url = url::Url::parse(service_uri).unwrap_or_else(|_| {
        url::Url::parse("urn:invalid-service-uri").expect("fallback URL is always valid")
    });
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("query", query);
        // Spec §4.7: "multiple background graphs produce a single warning and
        // only the first is sent" — so only `default_graphs.first()` goes out.
        if let Some(default_graph) = default_graphs.first() {
            pairs.append_pair("default-graph-uri", default_graph);
        }
        for named_graph in named_graphs {
            pairs.append_pair("named-graph-uri", named_graph);
        }
    }
    url.to_string()
}

/// Either the materialized SELECT rows or the ASK boolean a remote endpoint
/// answered with.
pub enum ServiceResponse {
    Solutions(RemoteService),
    Boolean(bool),
}

/// A materialized row source over a single remote SPARQL query's results.
/// Built eagerly in [`RemoteService::fetch`] since the underlying HTTP
/// fetch already happened; `read_row` just walks the parsed rows.
pub struct RemoteService {
    schema: Schema,
    rows: Vec<Row>,
    position: usize,
    /// Set when more than one background graph was supplied and only the
    /// first was sent, per spec §4.7. No logging facility is in scope for
    /// this crate, so the caller (the plan builder, which does have a
    /// place to surface diagnostics) decides what to do with this.
    pub dropped_background_graphs_warning: Option<String>,
}

impl RemoteService {
    pub fn fetch(
        client: &HttpClient,
        registry: &FormatterRegistry,
        variables: &mut VariablesTable,
        service_uri: &str,
        query: &str,
        default_graphs: &[String],
        named_graphs: &[String],
    ) -> Result<ServiceResponse, ProtocolError> {
        let url = build_url(service_uri, query, default_graphs, named_graphs);
        let (content_type, body) = client.get(&url, DEFAULT_ACCEPT)?;
        let warning = if default_graphs.len() > 1 {
            Some(format!(
                "{} background graphs supplied to SERVICE <{}>; only the first was sent",
                default_graphs.len(),
                service_uri
            ))
        } else {
            None
        };
        match registry.parse(&content_type, &body, variables)? {
            ParsedResults::Boolean(value) => Ok(ServiceResponse::Boolean(value)),
            ParsedResults::Solutions { schema, rows } => Ok(ServiceResponse::Solutions(Self {
                schema,
                rows,
                position: 0,
                dropped_background_graphs_warning: warning,
            })),
        }
    }
}

impl RowSource for RemoteService {
    fn ensure_variables(&mut self) -> &Schema {
        &self.schema
    }

    fn read_row(&mut self) -> Option<Row> {
        let row = self.rows.get(self.position).cloned();
        if row.is_some() {
            self.position += 1;
        }
        row
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn get_inner(&self, _index: usize) -> Option<&dyn RowSource> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_sends_only_the_first_background_graph() {
        let url = build_url(
            "http://example.org/sparql",
            "SELECT * WHERE { ?s ?p ?o }",
            &["urn:g1".to_string(), "urn:g2".to_string()],
            &[],
        );
        assert!(url.contains("default-graph-uri=urn%3Ag1"));
        assert!(!url.contains("urn%3Ag2"));
        assert!(url.contains("query=SELECT"));
    }
}
