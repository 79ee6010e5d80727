use std::fmt;
use std::str::FromStr;

/// [XML Schema `boolean`](https://www.w3.org/TR/xmlschema11-2/#boolean).
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct Boolean(bool);

impl Boolean {
    #[inline]
    pub const fn as_bool(self) -> bool {
        self.0
    }
}

impl From<bool> for Boolean {
    #[inline]
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<Boolean> for bool {
    #[inline]
    fn from(value: Boolean) -> Self {
        value.0
    }
}

impl FromStr for Boolean {
    type Err = ParseBooleanError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "true" | "1" => Ok(Self(true)),
            "false" | "0" => Ok(Self(false)),
            _ => Err(ParseBooleanError),
        }
    }
}

impl fmt::Display for Boolean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "true" } else { "false" })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("invalid xsd:boolean lexical form")]
pub struct ParseBooleanError;
