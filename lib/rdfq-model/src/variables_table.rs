use crate::{Literal, Variable};

/// An index into a [`VariablesTable`]. Modeled as an index rather than a raw
/// pointer (Design Notes §9) so the table can be moved/grown without
/// invalidating every reference into it — every [`Literal::Variable`]
/// carries one of these rather than a pointer to a table entry.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct VariableHandle(usize);

impl VariableHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

struct Slot {
    variable: Variable,
    current_value: Option<Literal>,
}

/// The per-query variable registry. Every triple pattern, expression and row
/// schema references a variable through a [`VariableHandle`] into exactly
/// one `VariablesTable`, owned by the [`Query`](https://docs.rs/rdfq-algebra)
/// that built it. Unlike literals, variables are not reference counted:
/// they live for the whole query lifetime (spec §3 "Lifecycle").
///
/// Row sources write a variable's current value here before evaluating an
/// expression against it and restore it afterwards (spec §5, "Shared
/// resources") — this is safe only because one query never executes on more
/// than one thread at a time.
#[derive(Default)]
pub struct VariablesTable {
    slots: Vec<Slot>,
}

impl VariablesTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an existing variable by name, or registers a new one.
    pub fn get_or_insert(&mut self, variable: Variable) -> VariableHandle {
        if let Some(pos) = self.slots.iter().position(|s| s.variable == variable) {
            return VariableHandle(pos);
        }
        self.slots.push(Slot {
            variable,
            current_value: None,
        });
        VariableHandle(self.slots.len() - 1)
    }

    pub fn find(&self, name: &str) -> Option<VariableHandle> {
        self.slots
            .iter()
            .position(|s| s.variable.name() == name)
            .map(VariableHandle)
    }

    #[inline]
    pub fn variable(&self, handle: VariableHandle) -> &Variable {
        &self.slots[handle.0].variable
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn current_value(&self, handle: VariableHandle) -> Option<&Literal> {
        self.slots[handle.0].current_value.as_ref()
    }

    /// Binds `handle` to `value` for the duration of a row source's pull,
    /// returning the previous value so the caller can restore it.
    #[inline]
    pub fn set_current_value(
        &mut self,
        handle: VariableHandle,
        value: Option<Literal>,
    ) -> Option<Literal> {
        std::mem::replace(&mut self.slots[handle.0].current_value, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableHandle, &Variable)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, s)| (VariableHandle(i), &s.variable))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_insert_is_idempotent() {
        let mut table = VariablesTable::new();
        let a = table.get_or_insert(Variable::new("s"));
        let b = table.get_or_insert(Variable::new("s"));
        assert_eq!(a, b);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn set_current_value_returns_previous() {
        let mut table = VariablesTable::new();
        let h = table.get_or_insert(Variable::new("x"));
        assert!(table.set_current_value(h, Some(Literal::from_uri("urn:a"))).is_none());
        let prev = table.set_current_value(h, None);
        assert!(prev.is_some());
        assert!(table.current_value(h).is_none());
    }
}
