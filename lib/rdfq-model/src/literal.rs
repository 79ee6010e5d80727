use crate::variables_table::VariableHandle;
use rdfq_xsd::{Boolean, Date, DateTime, Decimal, Double, Float, Integer};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// The discriminant used for the invariant literal-type ordering spec §3
/// fixes: `Blank < Uri < PlainString < XsdString < Boolean < Integer <
/// Float < Double < Decimal < Date < DateTime < UDT < Pattern < QName <
/// Variable`.
///
/// Spec §3 lists `Date`/`DateTime` as distinct literal variants but its
/// invariant-ordering enumeration names only `DateTime`; `Date` is placed
/// immediately before `DateTime` here, the natural slot given §4.3 promotes
/// `Date` to `DateTime` for comparison (an Open-Question-style gap filled
/// the way the rest of the ordering already reads: each promotion step
/// moves one slot to the right).
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum TypeTag {
    Blank = 0,
    Uri = 1,
    PlainString = 2,
    XsdString = 3,
    Boolean = 4,
    Integer = 5,
    Float = 6,
    Double = 7,
    Decimal = 8,
    Date = 9,
    DateTime = 10,
    UserDefinedType = 11,
    Pattern = 12,
    QName = 13,
    Variable = 14,
}

/// The first XSD numeric run the promotion lattice (§4.3) scans over.
const PROMOTION_RANGE: std::ops::RangeInclusive<TypeTag> = TypeTag::Boolean..=TypeTag::DateTime;

#[derive(Debug, Clone)]
pub enum LiteralKind {
    Blank(String),
    Uri(String),
    PlainString {
        value: String,
        language: Option<String>,
    },
    XsdString(String),
    Boolean(Boolean),
    Integer(Integer),
    Float(Float),
    Double(Double),
    Decimal(Decimal),
    Date(Date),
    DateTime(DateTime),
    Pattern {
        pattern: String,
        flags: String,
    },
    QName {
        prefix: Option<String>,
        local: String,
    },
    Variable(VariableHandle),
    UserDefinedType {
        value: String,
        datatype: String,
    },
}

impl LiteralKind {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Blank(_) => TypeTag::Blank,
            Self::Uri(_) => TypeTag::Uri,
            Self::PlainString { .. } => TypeTag::PlainString,
            Self::XsdString(_) => TypeTag::XsdString,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Integer(_) => TypeTag::Integer,
            Self::Float(_) => TypeTag::Float,
            Self::Double(_) => TypeTag::Double,
            Self::Decimal(_) => TypeTag::Decimal,
            Self::Date(_) => TypeTag::Date,
            Self::DateTime(_) => TypeTag::DateTime,
            Self::Pattern { .. } => TypeTag::Pattern,
            Self::QName { .. } => TypeTag::QName,
            Self::Variable(_) => TypeTag::Variable,
            Self::UserDefinedType { .. } => TypeTag::UserDefinedType,
        }
    }

    fn lexical_form(&self) -> String {
        match self {
            Self::Blank(v) | Self::Uri(v) | Self::XsdString(v) => v.clone(),
            Self::PlainString { value, .. } => value.clone(),
            Self::Boolean(v) => v.to_string(),
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Double(v) => v.to_string(),
            Self::Decimal(v) => v.to_string(),
            Self::Date(v) => v.to_string(),
            Self::DateTime(v) => v.to_string(),
            Self::Pattern { pattern, .. } => pattern.clone(),
            Self::QName { prefix, local } => match prefix {
                Some(p) => format!("{p}:{local}"),
                None => format!(":{local}"),
            },
            Self::Variable(_) => String::new(),
            Self::UserDefinedType { value, .. } => value.clone(),
        }
    }

    fn datatype_uri(&self) -> Option<&str> {
        match self {
            Self::XsdString(_) => Some(xsd::STRING),
            Self::Boolean(_) => Some(xsd::BOOLEAN),
            Self::Integer(_) => Some(xsd::INTEGER),
            Self::Float(_) => Some(xsd::FLOAT),
            Self::Double(_) => Some(xsd::DOUBLE),
            Self::Decimal(_) => Some(xsd::DECIMAL),
            Self::Date(_) => Some(xsd::DATE),
            Self::DateTime(_) => Some(xsd::DATE_TIME),
            Self::UserDefinedType { datatype, .. } => Some(datatype),
            _ => None,
        }
    }
}

/// Well-known XSD/RDF datatype URIs, grounded in the `oxrdf::vocab` module.
pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

struct LiteralData {
    kind: LiteralKind,
    /// False when a typed-literal constructor's lexical form failed
    /// validation and the literal was retained as `UserDefinedType` instead
    /// of aborting (spec §4.1).
    valid: bool,
}

/// A shared RDF/SPARQL literal. Reference counted via [`Rc`] (single-
/// threaded, matching the engine's concurrency model, Design Notes §9)
/// rather than the source's explicit `usage` counter — cloning a `Literal`
/// is the `copy`, and the last clone going out of scope is the `free`.
#[derive(Clone)]
pub struct Literal(Rc<LiteralData>);

impl Literal {
    fn new(kind: LiteralKind, valid: bool) -> Self {
        Self(Rc::new(LiteralData { kind, valid }))
    }

    pub fn from_blank(label: impl Into<String>) -> Self {
        Self::new(LiteralKind::Blank(label.into()), true)
    }

    pub fn from_uri(uri: impl Into<String>) -> Self {
        Self::new(LiteralKind::Uri(uri.into()), true)
    }

    pub fn from_plain_string(value: impl Into<String>, language: Option<String>) -> Self {
        Self::new(
            LiteralKind::PlainString {
                value: value.into(),
                language: language.map(|l| l.to_lowercase()),
            },
            true,
        )
    }

    pub fn from_xsd_string(value: impl Into<String>) -> Self {
        Self::new(LiteralKind::XsdString(value.into()), true)
    }

    pub fn from_bool(value: bool) -> Self {
        Self::new(LiteralKind::Boolean(value.into()), true)
    }

    pub fn from_i64(value: i64) -> Self {
        Self::new(LiteralKind::Integer(value.into()), true)
    }

    pub fn from_f32(value: f32) -> Self {
        Self::new(LiteralKind::Float(value.into()), true)
    }

    pub fn from_f64(value: f64) -> Self {
        Self::new(LiteralKind::Double(value.into()), true)
    }

    pub fn from_decimal(value: Decimal) -> Self {
        Self::new(LiteralKind::Decimal(value), true)
    }

    pub fn from_pattern(pattern: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::new(
            LiteralKind::Pattern {
                pattern: pattern.into(),
                flags: flags.into(),
            },
            true,
        )
    }

    pub fn from_qname(prefix: Option<String>, local: impl Into<String>) -> Self {
        Self::new(
            LiteralKind::QName {
                prefix,
                local: local.into(),
            },
            true,
        )
    }

    pub fn from_variable(handle: VariableHandle) -> Self {
        Self::new(LiteralKind::Variable(handle), true)
    }

    /// A typed-literal constructor that validates `value` against `datatype`'s
    /// lexical-space grammar. On validation failure the literal is retained
    /// as `UserDefinedType` with `valid = false` rather than producing an
    /// error (spec §4.1): callers that need to reject bad data check
    /// [`Literal::is_valid`] themselves.
    ///
    /// A language tag together with a non-string datatype is rejected by
    /// RDF; when both are supplied here the language tag is dropped per
    /// spec §4.1.
    pub fn new_typed(
        value: impl Into<String>,
        datatype: impl Into<String>,
        language: Option<String>,
    ) -> Self {
        let value = value.into();
        let datatype = datatype.into();
        if language.is_some() && datatype != xsd::STRING {
            return Self::new_typed(value, datatype, None);
        }
        match datatype.as_str() {
            xsd::STRING => Self::new(LiteralKind::XsdString(value), true),
            xsd::BOOLEAN => match Boolean::from_str(&value) {
                Ok(b) => Self::new(LiteralKind::Boolean(b), true),
                Err(_) => Self::invalid(value, datatype),
            },
            xsd::INTEGER => match Integer::from_str(&value) {
                Ok(i) => Self::new(LiteralKind::Integer(i), true),
                Err(_) => match Decimal::from_str(&value) {
                    // Out-of-range integer lexical forms demote to Decimal (spec §4.1).
                    Ok(d) => Self::new(LiteralKind::Decimal(d), true),
                    Err(_) => Self::invalid(value, datatype),
                },
            },
            xsd::FLOAT => match Float::from_str(&value) {
                Ok(f) => Self::new(LiteralKind::Float(f), true),
                Err(_) => Self::invalid(value, datatype),
            },
            xsd::DOUBLE => match Double::from_str(&value) {
                Ok(d) => Self::new(LiteralKind::Double(d), true),
                Err(_) => Self::invalid(value, datatype),
            },
            xsd::DECIMAL => match Decimal::from_str(&value) {
                Ok(d) => Self::new(LiteralKind::Decimal(d), true),
                Err(_) => Self::invalid(value, datatype),
            },
            xsd::DATE => match Date::from_str(&value) {
                Ok(d) => Self::new(LiteralKind::Date(d), true),
                Err(_) => Self::invalid(value, datatype),
            },
            xsd::DATE_TIME => match DateTime::from_str(&value) {
                Ok(d) => Self::new(LiteralKind::DateTime(d), true),
                Err(_) => Self::invalid(value, datatype),
            },
            _ => Self::new(LiteralKind::UserDefinedType { value, datatype }, true),
        }
    }

    fn invalid(value: String, datatype: String) -> Self {
        Self::new(LiteralKind::UserDefinedType { value, datatype }, false)
    }

    /// `string_to_native` (spec §4.1): given a plain string's lexical form
    /// and a datatype URI, retype and parse it if the datatype is a known
    /// XSD type, leaving it as a `UserDefinedType` on parse failure.
    pub fn string_to_native(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::new_typed(value, datatype, None)
    }

    pub fn kind(&self) -> &LiteralKind {
        &self.0.kind
    }

    pub fn type_tag(&self) -> TypeTag {
        self.0.kind.type_tag()
    }

    pub fn is_valid(&self) -> bool {
        self.0.valid
    }

    pub fn lexical_form(&self) -> String {
        self.0.kind.lexical_form()
    }

    pub fn language(&self) -> Option<&str> {
        match &self.0.kind {
            LiteralKind::PlainString { language, .. } => language.as_deref(),
            _ => None,
        }
    }

    pub fn datatype(&self) -> Option<&str> {
        self.0.kind.datatype_uri()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.type_tag(),
            TypeTag::Integer | TypeTag::Float | TypeTag::Double | TypeTag::Decimal
        )
    }

    /// Equality under RDF-term (`sameTerm`) semantics (spec §4.2): term kind,
    /// lexical form, and (for literals) language tag and datatype URI must
    /// match exactly. Numeric promotion never applies here.
    pub fn same_term(&self, other: &Self) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (&self.0.kind, &other.0.kind) {
            (LiteralKind::Blank(a), LiteralKind::Blank(b)) => a == b,
            (LiteralKind::Uri(a), LiteralKind::Uri(b)) => a == b,
            (
                LiteralKind::PlainString {
                    value: av,
                    language: al,
                },
                LiteralKind::PlainString {
                    value: bv,
                    language: bl,
                },
            ) => av == bv && al == bl,
            (LiteralKind::Variable(a), LiteralKind::Variable(b)) => a == b,
            _ if self.type_tag() == other.type_tag() => {
                self.lexical_form() == other.lexical_form() && self.datatype() == other.datatype()
            }
            _ => false,
        }
    }

    /// Value comparison/equality (spec §4.2/§4.3). Applies numeric
    /// promotion first, then compares by promoted type.
    pub fn compare(&self, other: &Self, mode: ComparisonMode) -> Result<Ordering, TypeError> {
        if mode == ComparisonMode::Rdql {
            return Err(TypeError::UnsupportedMode);
        }
        use LiteralKind::*;
        match (&self.0.kind, &other.0.kind) {
            (Blank(a), Blank(b)) => {
                if a == b {
                    Ok(Ordering::Equal)
                } else {
                    Err(TypeError::IncomparableBlankNodes)
                }
            }
            (Uri(a), Uri(b)) => Ok(a.cmp(b)),
            (
                PlainString {
                    value: av,
                    language: al,
                },
                PlainString {
                    value: bv,
                    language: bl,
                },
            ) => compare_strings_with_language(av, al.as_deref(), bv, bl.as_deref()),
            (XsdString(a), XsdString(b)) => Ok(a.cmp(b)),
            (PlainString { value: av, language: None }, XsdString(bv))
            | (XsdString(av), PlainString { value: bv, language: None }) => Ok(av.cmp(bv)),
            (Date(a), Date(b)) => Ok(a.to_date_time().compare_with_utc_fallback(&b.to_date_time())),
            (DateTime(a), DateTime(b)) => Ok(a.compare_with_utc_fallback(b)),
            (Date(a), DateTime(b)) => Ok(a.to_date_time().compare_with_utc_fallback(b)),
            (DateTime(a), Date(b)) => Ok(a.compare_with_utc_fallback(&b.to_date_time())),
            (UserDefinedType { .. }, _) | (_, UserDefinedType { .. }) => {
                Err(TypeError::Incomparable)
            }
            _ if self.is_numeric_like() && other.is_numeric_like() => {
                compare_numeric(self, other)
            }
            _ => Err(TypeError::Incomparable),
        }
    }

    fn is_numeric_like(&self) -> bool {
        matches!(self.type_tag(), TypeTag::Boolean) || self.is_numeric()
    }

    /// Effective Boolean Value (spec §4.4). A bound literal's EBV; an
    /// unbound `Variable` literal (one whose table slot has no current
    /// value) is the caller's responsibility to resolve before calling this
    /// — see `rdfq-expr`'s `bound`/variable-indirection handling.
    pub fn effective_boolean_value(&self) -> Result<bool, TypeError> {
        match &self.0.kind {
            LiteralKind::Boolean(b) => Ok(b.as_bool()),
            LiteralKind::XsdString(s) => Ok(!s.is_empty()),
            LiteralKind::PlainString { value, language: None } => Ok(!value.is_empty()),
            LiteralKind::Integer(i) => Ok(i.as_i64() != 0),
            LiteralKind::Float(f) => Ok(!f.is_nan() && f.as_f32() != 0.0),
            LiteralKind::Double(d) => Ok(!d.is_nan() && d.as_f64() != 0.0),
            LiteralKind::Decimal(d) => Ok(!d.is_zero()),
            _ => Err(TypeError::NotBooleanConvertible),
        }
    }
}

fn compare_strings_with_language(
    av: &str,
    al: Option<&str>,
    bv: &str,
    bl: Option<&str>,
) -> Result<Ordering, TypeError> {
    match (al, bl) {
        (Some(al), Some(bl)) if al.eq_ignore_ascii_case(bl) => Ok(av.cmp(bv)),
        (Some(_), Some(_)) => Err(TypeError::Incomparable),
        (None, None) => Ok(av.cmp(bv)),
        _ => Err(TypeError::Incomparable),
    }
}

/// Numeric promotion lattice (spec §4.3). The type-tag ordering in §3 fixes
/// a *total* literal ordering used for e.g. `ORDER BY` across mixed types;
/// it is not itself the numeric-promotion walk, which follows the explicit
/// XPath-style rules below (integer ⊆ float ⊆ double, with decimal jumping
/// straight to whichever of those two sits on the other side — this is the
/// special case spec §4.3 calls out, since `Decimal`'s tag sits *after*
/// `Float`/`Double` in the §3 ordering but is numerically narrower than
/// both).
fn compare_numeric(a: &Literal, b: &Literal) -> Result<Ordering, TypeError> {
    let common = promoted_common_type(a.type_tag(), b.type_tag())?;
    match common {
        TypeTag::Double => {
            let av = to_f64(a)?;
            let bv = to_f64(b)?;
            compare_doubles(av, bv)
        }
        TypeTag::Float => {
            let av = to_f64(a)?;
            let bv = to_f64(b)?;
            compare_doubles(av, bv)
        }
        TypeTag::Decimal => {
            let ad = to_decimal(a)?;
            let bd = to_decimal(b)?;
            Ok(ad.cmp(&bd))
        }
        TypeTag::Integer | TypeTag::Boolean => {
            let av = to_i64(a)?;
            let bv = to_i64(b)?;
            Ok(av.cmp(&bv))
        }
        _ => Err(TypeError::Incomparable),
    }
}

/// NaN-aware double comparison (spec §4.2): NaN is not equal to itself and
/// sorts after every finite value.
fn compare_doubles(a: f64, b: f64) -> Result<Ordering, TypeError> {
    const EPSILON: f64 = 0.0; // value equality is exact once both sides are the same promoted type
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Err(TypeError::NotANumberComparison),
        (true, false) => Ok(Ordering::Greater),
        (false, true) => Ok(Ordering::Less),
        (false, false) => {
            if (a - b).abs() <= EPSILON {
                Ok(Ordering::Equal)
            } else {
                a.partial_cmp(&b).ok_or(TypeError::NotANumberComparison)
            }
        }
    }
}

fn promoted_common_type(a: TypeTag, b: TypeTag) -> Result<TypeTag, TypeError> {
    if !PROMOTION_RANGE.contains(&a) || !PROMOTION_RANGE.contains(&b) {
        return Err(TypeError::Incomparable);
    }
    let is_floatish = |t: TypeTag| matches!(t, TypeTag::Float | TypeTag::Double);
    if a == TypeTag::Decimal && is_floatish(b) {
        return Ok(b);
    }
    if b == TypeTag::Decimal && is_floatish(a) {
        return Ok(a);
    }
    Ok(a.max(b))
}

fn to_i64(l: &Literal) -> Result<i64, TypeError> {
    match l.kind() {
        LiteralKind::Boolean(b) => Ok(i64::from(b.as_bool())),
        LiteralKind::Integer(i) => Ok(i.as_i64()),
        _ => Err(TypeError::Incomparable),
    }
}

fn to_f64(l: &Literal) -> Result<f64, TypeError> {
    match l.kind() {
        LiteralKind::Boolean(b) => Ok(if b.as_bool() { 1.0 } else { 0.0 }),
        LiteralKind::Integer(i) => Ok(f64::from(*i)),
        LiteralKind::Float(f) => Ok(f64::from(*f)),
        LiteralKind::Double(d) => Ok(d.as_f64()),
        LiteralKind::Decimal(d) => Ok(d.to_f64()),
        _ => Err(TypeError::Incomparable),
    }
}

fn to_decimal(l: &Literal) -> Result<Decimal, TypeError> {
    match l.kind() {
        LiteralKind::Boolean(b) => Ok(Decimal::from(i64::from(b.as_bool()))),
        LiteralKind::Integer(i) => Ok(Decimal::from(i.as_i64())),
        LiteralKind::Decimal(d) => Ok(*d),
        _ => Err(TypeError::Incomparable),
    }
}

/// The mode passed to [`Literal::compare`]. Only `XQuery` is implemented;
/// `Rdql` is kept so call sites can match exhaustively against the engine's
/// full mode enum without a second numeric-promotion code path to maintain
/// (Design Notes §9's open question resolved in favor of the XQuery path).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ComparisonMode {
    XQuery,
    Rdql,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("values are not comparable")]
    Incomparable,
    #[error("blank nodes do not have an ordering, only (in)equality")]
    IncomparableBlankNodes,
    #[error("NaN does not compare equal to any value, including itself")]
    NotANumberComparison,
    #[error("literal does not have a meaningful effective boolean value")]
    NotBooleanConvertible,
    #[error("the requested comparison mode is not supported")]
    UnsupportedMode,
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Literal({})", self.lexical_form())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            LiteralKind::Blank(label) => write!(f, "_:{label}"),
            LiteralKind::Uri(uri) => write!(f, "<{uri}>"),
            LiteralKind::PlainString { value, language } => {
                write!(f, "\"{value}\"")?;
                if let Some(lang) = language {
                    write!(f, "@{lang}")?;
                }
                Ok(())
            }
            LiteralKind::XsdString(value) => write!(f, "\"{value}\""),
            LiteralKind::Boolean(v) => write!(f, "{v}"),
            LiteralKind::Integer(v) => write!(f, "{v}"),
            LiteralKind::Float(v) => write!(f, "{v}"),
            LiteralKind::Double(v) => write!(f, "{v}"),
            LiteralKind::Decimal(v) => write!(f, "{v}"),
            LiteralKind::Date(v) => write!(f, "{v}"),
            LiteralKind::DateTime(v) => write!(f, "{v}"),
            LiteralKind::Pattern { pattern, flags } => write!(f, "/{pattern}/{flags}"),
            LiteralKind::QName { prefix, local } => match prefix {
                Some(p) => write!(f, "{p}:{local}"),
                None => write!(f, ":{local}"),
            },
            LiteralKind::Variable(_) => write!(f, "?"),
            LiteralKind::UserDefinedType { value, datatype } => {
                write!(f, "\"{value}\"^^<{datatype}>")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_and_double_compare_equal_after_promotion() {
        let a = Literal::new_typed("42", xsd::INTEGER, None);
        let b = Literal::new_typed("42.0", xsd::DOUBLE, None);
        assert_eq!(
            a.compare(&b, ComparisonMode::XQuery).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn decimal_promotes_to_double_not_the_reverse() {
        let a = Literal::new_typed("1.5", xsd::DECIMAL, None);
        let b = Literal::new_typed("1.5", xsd::DOUBLE, None);
        assert_eq!(
            a.compare(&b, ComparisonMode::XQuery).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn language_tag_comparison_is_case_insensitive() {
        let a = Literal::from_plain_string("abc", Some("EN".to_string()));
        let b = Literal::from_plain_string("abc", Some("en".to_string()));
        assert_eq!(a.compare(&b, ComparisonMode::XQuery).unwrap(), Ordering::Equal);
    }

    #[test]
    fn mismatched_language_tags_are_incomparable() {
        let a = Literal::from_plain_string("abc", Some("en".to_string()));
        let b = Literal::from_plain_string("abc", Some("fr".to_string()));
        assert!(a.compare(&b, ComparisonMode::XQuery).is_err());
    }

    #[test]
    fn nan_is_not_equal_to_itself_and_sorts_last() {
        let nan = Literal::from_f64(f64::NAN);
        let one = Literal::from_f64(1.0);
        assert!(nan.compare(&nan, ComparisonMode::XQuery).is_err());
        assert_eq!(
            nan.compare(&one, ComparisonMode::XQuery).unwrap(),
            Ordering::Greater
        );
    }

    #[test]
    fn invalid_lexical_form_is_retained_as_user_defined_type() {
        let l = Literal::new_typed("not-a-number", xsd::INTEGER, None);
        assert!(!l.is_valid());
        assert!(matches!(l.kind(), LiteralKind::UserDefinedType { .. }));
    }

    #[test]
    fn ebv_of_unbound_like_values() {
        assert_eq!(Literal::from_bool(false).effective_boolean_value().unwrap(), false);
        assert_eq!(Literal::from_i64(0).effective_boolean_value().unwrap(), false);
        assert_eq!(Literal::from_xsd_string("").effective_boolean_value().unwrap(), false);
        assert!(Literal::from_uri("urn:x").effective_boolean_value().is_err());
    }

    #[test]
    fn same_term_requires_exact_language_and_datatype_match() {
        let a = Literal::from_plain_string("x", Some("en".to_string()));
        let b = Literal::from_plain_string("x", None);
        assert!(!a.same_term(&b));
    }

    #[test]
    fn type_tag_ordering_matches_spec() {
        assert!(TypeTag::Blank < TypeTag::Uri);
        assert!(TypeTag::Decimal < TypeTag::Date);
        assert!(TypeTag::Date < TypeTag::DateTime);
        assert!(TypeTag::DateTime < TypeTag::UserDefinedType);
        assert!(TypeTag::QName < TypeTag::Variable);
    }
}
