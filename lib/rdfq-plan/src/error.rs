use rdfq_expr::EvalError;
use rdfq_model::TypeError;

/// The row-source-level error taxonomy (SPEC_FULL.md §7): `TypeError`s
/// never reach here as an `Err` — `Filter` and `Extend` catch them locally
/// per spec §4.7/§4.5 ("errors become false (row dropped)" / "preserve the
/// row with the variable left unbound") — so what remains is data and
/// resource trouble a row source can't recover from by itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error("malformed data: {0}")]
    Data(String),
    #[error("resource exhausted: {0}")]
    Resource(String),
}

impl From<EvalError> for EvaluationError {
    fn from(e: EvalError) -> Self {
        match e {
            EvalError::Type(t) => Self::Type(t),
            other => Self::Data(other.to_string()),
        }
    }
}
