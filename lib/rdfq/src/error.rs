/// The top-level error a caller of [`crate::execute`]/[`crate::execute_remote`]
/// sees, wrapping the per-crate error taxonomy spec §7 lays out
/// (`rdfq-algebra`'s `PrepareError`, `rdfq-results`' `ProtocolError`).
/// Row-level evaluation failures (`rdfq-plan`'s `EvaluationError`) never
/// surface here: `Filter`/`Extend` already turn them into "row dropped" or
/// "variable left unbound" per spec §4.5/§4.7, not a propagated `Err`.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Prepare(#[from] rdfq_algebra::PrepareError),
    #[error(transparent)]
    Protocol(#[from] rdfq_results::ProtocolError),
}
