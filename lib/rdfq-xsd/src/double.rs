use std::fmt;
use std::str::FromStr;

/// [XML Schema `double`](https://www.w3.org/TR/xmlschema11-2/#double).
#[derive(Debug, Clone, Copy, Default)]
pub struct Double(f64);

impl Double {
    #[inline]
    pub const fn as_f64(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }
}

impl From<f64> for Double {
    #[inline]
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<Double> for f64 {
    #[inline]
    fn from(value: Double) -> Self {
        value.0
    }
}

impl PartialEq for Double {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl FromStr for Double {
    type Err = ParseDoubleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "INF" | "+INF" => Ok(Self(f64::INFINITY)),
            "-INF" => Ok(Self(f64::NEG_INFINITY)),
            "NaN" => Ok(Self(f64::NAN)),
            _ => input.parse().map(Self).map_err(|_| ParseDoubleError),
        }
    }
}

impl fmt::Display for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            f.write_str("NaN")
        } else if self.0 == f64::INFINITY {
            f.write_str("INF")
        } else if self.0 == f64::NEG_INFINITY {
            f.write_str("-INF")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("invalid xsd:double lexical form")]
pub struct ParseDoubleError;
