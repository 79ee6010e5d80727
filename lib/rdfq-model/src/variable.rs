use std::fmt;

/// Whether a variable was written by the query author or synthesized by the
/// algebra builder (e.g. to name an otherwise-anonymous property path step).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum VariableKind {
    Normal,
    Anonymous,
}

/// A SPARQL variable as it appears in a triple pattern or expression: a
/// name plus a kind. Its current binding and its registry slot live in the
/// owning query's [`VariablesTable`](crate::VariablesTable), addressed by
/// [`VariableHandle`](crate::VariableHandle) — not here, so that this type
/// stays `Copy`-cheap to clone into every pattern and expression node that
/// mentions the variable.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Variable {
    name: String,
    kind: VariableKind,
}

impl Variable {
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Normal,
        }
    }

    #[inline]
    pub fn new_anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VariableKind::Anonymous,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    #[inline]
    pub fn is_anonymous(&self) -> bool {
        self.kind == VariableKind::Anonymous
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}
