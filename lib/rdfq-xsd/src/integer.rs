use std::fmt;
use std::str::FromStr;

/// [XML Schema `integer`](https://www.w3.org/TR/xmlschema11-2/#integer), restricted to the
/// machine-`i64` range. Values outside this range are the caller's cue to demote to
/// [`crate::Decimal`] (see `rdfq-model`'s literal constructors).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct Integer(i64);

impl Integer {
    #[inline]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[inline]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    #[inline]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Self)
    }

    #[inline]
    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    #[inline]
    pub fn checked_abs(self) -> Option<Self> {
        self.0.checked_abs().map(Self)
    }
}

impl From<i64> for Integer {
    #[inline]
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<i32> for Integer {
    #[inline]
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl From<Integer> for i64 {
    #[inline]
    fn from(value: Integer) -> Self {
        value.0
    }
}

impl From<Integer> for f64 {
    #[inline]
    fn from(value: Integer) -> Self {
        value.0 as f64
    }
}

impl FromStr for Integer {
    type Err = TooLargeForIntegerError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.strip_prefix('+').unwrap_or(input);
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| TooLargeForIntegerError)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("integer literal does not fit in the machine-integer range, demote to xsd:decimal")]
pub struct TooLargeForIntegerError;
