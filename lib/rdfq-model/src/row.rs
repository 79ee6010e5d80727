use crate::Literal;
use std::fmt;

/// A binding over a fixed variable list: one slot per row-source schema
/// position, each either a bound [`Literal`] or `None` (unbound). Rows are
/// cheap to clone — cloning deep-copies the `Vec` of `Option<Literal>` but
/// each `Literal` clone is just an `Rc` bump, matching spec §3's "rows are
/// ref-counted; copying a row deep-copies literal pointers (shared) but not
/// literals."
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: Vec<Option<Literal>>,
}

impl Row {
    pub fn with_width(width: usize) -> Self {
        Self {
            values: vec![None; width],
        }
    }

    pub fn from_values(values: Vec<Option<Literal>>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Literal> {
        self.values.get(index).and_then(|v| v.as_ref())
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: Option<Literal>) {
        self.values[index] = value;
    }

    pub fn values(&self) -> &[Option<Literal>] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Option<Literal>> {
        self.values
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match v {
                Some(l) => write!(f, "{l}")?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbound_slots_default_to_none() {
        let row = Row::with_width(3);
        assert_eq!(row.len(), 3);
        assert!(row.get(0).is_none());
    }

    #[test]
    fn clone_shares_literal_storage() {
        let mut row = Row::with_width(1);
        row.set(0, Some(Literal::from_uri("urn:a")));
        let cloned = row.clone();
        assert!(cloned.get(0).unwrap().same_term(row.get(0).unwrap()));
    }
}
