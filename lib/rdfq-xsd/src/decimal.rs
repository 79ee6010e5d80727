use crate::{Double, Float};
use std::fmt;
use std::fmt::Write;
use std::str::FromStr;

const DECIMAL_PART_DIGITS: u32 = 18;
const DECIMAL_PART_POW: i128 = 1_000_000_000_000_000_000;

/// [XML Schema `decimal`](https://www.w3.org/TR/xmlschema11-2/#decimal).
///
/// Stored as a fixed-point `i128`, the value multiplied by 10^18, giving
/// roughly 18 digits of precision on either side of the decimal point.
/// This mirrors the representation used by mature SPARQL engines to avoid
/// pulling in a bignum dependency for a type that is almost always used
/// within `i64` range in practice.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash, Default)]
pub struct Decimal {
    value: i128,
}

impl Decimal {
    pub const MAX: Self = Self { value: i128::MAX };
    pub const MIN: Self = Self { value: i128::MIN };
    pub const ZERO: Self = Self { value: 0 };

    #[inline]
    pub const fn from_i128_unchecked(i: i128) -> Self {
        Self {
            value: i * DECIMAL_PART_POW,
        }
    }

    #[inline]
    pub fn checked_add(&self, rhs: impl Into<Self>) -> Option<Self> {
        Some(Self {
            value: self.value.checked_add(rhs.into().value)?,
        })
    }

    #[inline]
    pub fn checked_sub(&self, rhs: impl Into<Self>) -> Option<Self> {
        Some(Self {
            value: self.value.checked_sub(rhs.into().value)?,
        })
    }

    #[inline]
    pub fn checked_mul(&self, rhs: impl Into<Self>) -> Option<Self> {
        let rhs = rhs.into();
        let value = self
            .value
            .checked_mul(rhs.value)?
            .checked_div(DECIMAL_PART_POW)?;
        Some(Self { value })
    }

    #[inline]
    pub fn checked_div(&self, rhs: impl Into<Self>) -> Option<Self> {
        let rhs = rhs.into();
        if rhs.value == 0 {
            return None;
        }
        let value = self
            .value
            .checked_mul(DECIMAL_PART_POW)?
            .checked_div(rhs.value)?;
        Some(Self { value })
    }

    #[inline]
    pub const fn checked_neg(&self) -> Option<Self> {
        match self.value.checked_neg() {
            Some(value) => Some(Self { value }),
            None => None,
        }
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        (self.value as f64) / (DECIMAL_PART_POW as f64)
    }

    #[inline]
    pub fn checked_abs(&self) -> Option<Self> {
        Some(Self {
            value: self.value.checked_abs()?,
        })
    }

    #[inline]
    pub fn floor(&self) -> Self {
        if self.value >= 0 || self.value % DECIMAL_PART_POW == 0 {
            Self {
                value: (self.value / DECIMAL_PART_POW) * DECIMAL_PART_POW,
            }
        } else {
            Self {
                value: (self.value / DECIMAL_PART_POW - 1) * DECIMAL_PART_POW,
            }
        }
    }

    #[inline]
    pub fn ceil(&self) -> Self {
        if self.value <= 0 || self.value % DECIMAL_PART_POW == 0 {
            Self {
                value: (self.value / DECIMAL_PART_POW) * DECIMAL_PART_POW,
            }
        } else {
            Self {
                value: (self.value / DECIMAL_PART_POW + 1) * DECIMAL_PART_POW,
            }
        }
    }

    #[inline]
    pub fn round(&self) -> Self {
        let half = DECIMAL_PART_POW / 2;
        let shifted = if self.value >= 0 {
            self.value + half
        } else {
            self.value - half + 1
        };
        Self {
            value: (shifted.div_euclid(DECIMAL_PART_POW)) * DECIMAL_PART_POW,
        }
    }
}

impl From<i64> for Decimal {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_i128_unchecked(i128::from(value))
    }
}

impl From<i32> for Decimal {
    #[inline]
    fn from(value: i32) -> Self {
        Self::from_i128_unchecked(i128::from(value))
    }
}

impl TryFrom<Float> for Decimal {
    type Error = TooLargeForDecimalError;

    fn try_from(value: Float) -> Result<Self, Self::Error> {
        Self::from_str(&value.to_string()).map_err(|_| TooLargeForDecimalError)
    }
}

impl TryFrom<Double> for Decimal {
    type Error = TooLargeForDecimalError;

    fn try_from(value: Double) -> Result<Self, Self::Error> {
        Self::from_str(&value.to_string()).map_err(|_| TooLargeForDecimalError)
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    /// Parses the `(+|-)?([0-9]+(\.[0-9]*)?|\.[0-9]+)` lexical mapping.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let bytes = input.as_bytes();
        if bytes.is_empty() {
            return Err(ParseDecimalError);
        }
        let (sign, mut rest) = match bytes.first() {
            Some(b'+') => (1_i128, &bytes[1..]),
            Some(b'-') => (-1_i128, &bytes[1..]),
            _ => (1, bytes),
        };
        let mut value: i128 = 0;
        let with_before_dot = rest.first().is_some_and(u8::is_ascii_digit);
        while let Some(c) = rest.first() {
            if c.is_ascii_digit() {
                value = value
                    .checked_mul(10)
                    .and_then(|v| v.checked_add(i128::from(*c - b'0')))
                    .ok_or(ParseDecimalError)?;
                rest = &rest[1..];
            } else {
                break;
            }
        }
        let mut exp = DECIMAL_PART_POW;
        if let Some(b'.') = rest.first() {
            rest = &rest[1..];
            if rest.is_empty() && !with_before_dot {
                return Err(ParseDecimalError);
            }
            while let Some(c) = rest.first() {
                if c.is_ascii_digit() {
                    if exp == 0 {
                        return Err(ParseDecimalError);
                    }
                    exp /= 10;
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(i128::from(*c - b'0')))
                        .ok_or(ParseDecimalError)?;
                    rest = &rest[1..];
                } else {
                    break;
                }
            }
        } else if !with_before_dot {
            return Err(ParseDecimalError);
        }
        if !rest.is_empty() {
            return Err(ParseDecimalError);
        }
        let value = value.checked_mul(exp).ok_or(ParseDecimalError)?;
        Ok(Self { value: sign * value })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.value;
        if value == i128::MIN {
            // Can't be negated in place; format via widened arithmetic.
            return write!(f, "{}", value as f64 / DECIMAL_PART_POW as f64);
        }
        if value < 0 {
            f.write_char('-')?;
            value = -value;
        }
        let integer_part = value / DECIMAL_PART_POW;
        let fraction_part = value % DECIMAL_PART_POW;
        write!(f, "{integer_part}")?;
        if fraction_part != 0 {
            let mut fraction = format!("{fraction_part:018}");
            while fraction.ends_with('0') {
                fraction.pop();
            }
            write!(f, ".{fraction}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("invalid xsd:decimal lexical form")]
pub struct ParseDecimalError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[error("decimal value is too large to be represented")]
pub struct TooLargeForDecimalError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for s in ["0", "-0.5", "1.25", "-42", "100.100"] {
            let parsed: Decimal = s.parse().unwrap();
            let rendered = parsed.to_string();
            let reparsed: Decimal = rendered.parse().unwrap();
            assert_eq!(parsed, reparsed);
        }
    }

    #[test]
    fn arithmetic() {
        let a: Decimal = "1.5".parse().unwrap();
        let b: Decimal = "2.5".parse().unwrap();
        assert_eq!(a.checked_add(b).unwrap().to_string(), "4");
        assert_eq!(b.checked_sub(a).unwrap().to_string(), "1");
        assert_eq!(a.checked_mul(b).unwrap().to_string(), "3.75");
    }

    #[test]
    fn integer_division_is_exact() {
        let a = Decimal::from(1_i64);
        let b = Decimal::from(3_i64);
        let q = a.checked_div(b).unwrap();
        assert!(q.to_f64() > 0.33 && q.to_f64() < 0.34);
    }
}
