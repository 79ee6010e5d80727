use std::fmt;
use std::str::FromStr;

/// [XML Schema `float`](https://www.w3.org/TR/xmlschema11-2/#float).
#[derive(Debug, Clone, Copy, Default)]
pub struct Float(f32);

impl Float {
    #[inline]
    pub const fn as_f32(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }
}

impl From<f32> for Float {
    #[inline]
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl From<Float> for f32 {
    #[inline]
    fn from(value: Float) -> Self {
        value.0
    }
}

impl From<Float> for f64 {
    #[inline]
    fn from(value: Float) -> Self {
        f64::from(value.0)
    }
}

impl PartialEq for Float {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl FromStr for Float {
    type Err = ParseFloatError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "INF" | "+INF" => Ok(Self(f32::INFINITY)),
            "-INF" => Ok(Self(f32::NEG_INFINITY)),
            "NaN" => Ok(Self(f32::NAN)),
            _ => input.parse().map(Self).map_err(|_| ParseFloatError),
        }
    }
}

impl fmt::Display for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            f.write_str("NaN")
        } else if self.0 == f32::INFINITY {
            f.write_str("INF")
        } else if self.0 == f32::NEG_INFINITY {
            f.write_str("-INF")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("invalid xsd:float lexical form")]
pub struct ParseFloatError;
