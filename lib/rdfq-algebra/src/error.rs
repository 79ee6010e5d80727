/// Failures that can occur while turning a parsed query into a checked
/// [`crate::Query`] — resolving `QName`s against the prefix map and
/// variables against the variables table (spec §7).
#[derive(Debug, Clone, thiserror::Error)]
pub enum PrepareError {
    #[error("unresolved prefix {0}")]
    UnresolvedPrefix(String),
    #[error("unresolved variable {0}")]
    UnresolvedVariable(String),
}
