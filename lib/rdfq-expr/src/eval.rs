use crate::{BuiltinFunction, Expression};
use rdfq_model::{xsd, ComparisonMode, Literal, LiteralKind, TypeError, VariablesTable};
use sha1::Digest as _;
use std::cell::RefCell;
use std::collections::HashMap;

/// The result of evaluating an [`Expression`], distinguishing a genuine
/// literal (including the literal `false`) from "no value" — an unbound
/// variable, or a cast/lookup that legitimately produces nothing — per
/// spec §4.5's "callers MUST check the error code because result `null`
/// and result `false` are distinct."
#[derive(Debug, Clone)]
pub enum EvalOutcome {
    Value(Literal),
    Null,
}

impl EvalOutcome {
    pub fn into_literal(self) -> Option<Literal> {
        match self {
            Self::Value(l) => Some(l),
            Self::Null => None,
        }
    }

    fn literal(&self) -> Result<&Literal, EvalError> {
        match self {
            Self::Value(l) => Ok(l),
            Self::Null => Err(EvalError::Type(TypeError::Incomparable)),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error("unknown function {0}")]
    UnknownFunction(String),
    #[error("wrong number of arguments to {0}")]
    Arity(String),
    #[error("invalid regular expression: {0}")]
    InvalidRegex(String),
    #[error("cast to {0} is not permitted")]
    UnsupportedCast(String),
}

pub type CustomFunction = std::rc::Rc<dyn Fn(&[Literal]) -> Option<Literal>>;

/// Borrows the query's [`VariablesTable`] for the duration of one row's
/// evaluation. Row sources (in `rdfq-plan`) write the row's bound values
/// into the table before constructing this context and restore the
/// previous values afterwards (spec §5's "Shared resources").
pub struct EvalContext<'a> {
    variables: &'a VariablesTable,
    mode: ComparisonMode,
    custom_functions: HashMap<String, CustomFunction>,
    regex_cache: RefCell<HashMap<String, regex::Regex>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(variables: &'a VariablesTable) -> Self {
        Self {
            variables,
            mode: ComparisonMode::XQuery,
            custom_functions: HashMap::new(),
            regex_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_custom_function(mut self, uri: impl Into<String>, f: CustomFunction) -> Self {
        self.custom_functions.insert(uri.into(), f);
        self
    }

    pub fn evaluate(&self, expr: &Expression) -> Result<EvalOutcome, EvalError> {
        eval(expr, self)
    }
}

fn lookup_variable(ctx: &EvalContext<'_>, var: &rdfq_model::Variable) -> EvalOutcome {
    match ctx.variables.find(var.name()) {
        Some(handle) => match ctx.variables.current_value(handle) {
            Some(l) => EvalOutcome::Value(l.clone()),
            None => EvalOutcome::Null,
        },
        None => EvalOutcome::Null,
    }
}

fn eval(expr: &Expression, ctx: &EvalContext<'_>) -> Result<EvalOutcome, EvalError> {
    use Expression as E;
    Ok(match expr {
        E::Constant(l) => EvalOutcome::Value(l.clone()),
        E::Variable(v) => lookup_variable(ctx, v),
        E::Bound(v) => EvalOutcome::Value(Literal::from_bool(
            ctx.variables
                .find(v.name())
                .and_then(|h| ctx.variables.current_value(h))
                .is_some(),
        )),
        E::And(children) => eval_and(children, ctx)?,
        E::Or(children) => eval_or(children, ctx)?,
        E::Not(inner) => {
            let ebv = ebv_of(inner, ctx)?;
            EvalOutcome::Value(Literal::from_bool(!ebv))
        }
        E::Equal(a, b) => {
            EvalOutcome::Value(Literal::from_bool(value_compare(a, b, ctx)?.is_eq()))
        }
        E::NotEqual(a, b) => {
            EvalOutcome::Value(Literal::from_bool(!value_compare(a, b, ctx)?.is_eq()))
        }
        E::SameTerm(a, b) => {
            let av = eval(a, ctx)?.literal()?.clone();
            let bv = eval(b, ctx)?.literal()?.clone();
            EvalOutcome::Value(Literal::from_bool(av.same_term(&bv)))
        }
        E::Less(a, b) => EvalOutcome::Value(Literal::from_bool(value_compare(a, b, ctx)?.is_lt())),
        E::LessOrEqual(a, b) => {
            EvalOutcome::Value(Literal::from_bool(value_compare(a, b, ctx)?.is_le()))
        }
        E::Greater(a, b) => {
            EvalOutcome::Value(Literal::from_bool(value_compare(a, b, ctx)?.is_gt()))
        }
        E::GreaterOrEqual(a, b) => {
            EvalOutcome::Value(Literal::from_bool(value_compare(a, b, ctx)?.is_ge()))
        }
        E::Add(a, b) => EvalOutcome::Value(numeric_op(a, b, ctx, NumericOp::Add)?),
        E::Subtract(a, b) => EvalOutcome::Value(numeric_op(a, b, ctx, NumericOp::Sub)?),
        E::Multiply(a, b) => EvalOutcome::Value(numeric_op(a, b, ctx, NumericOp::Mul)?),
        E::Divide(a, b) => EvalOutcome::Value(numeric_op(a, b, ctx, NumericOp::Div)?),
        E::UnaryPlus(inner) => {
            let v = eval(inner, ctx)?.literal()?.clone();
            if !v.is_numeric() {
                return Err(EvalError::Type(TypeError::Incomparable));
            }
            EvalOutcome::Value(v)
        }
        E::UnaryMinus(inner) => {
            let v = eval(inner, ctx)?.literal()?.clone();
            EvalOutcome::Value(negate(&v)?)
        }
        E::Regex {
            subject,
            pattern,
            flags,
        } => {
            let subject = lexical_of(subject, ctx)?;
            let pattern = lexical_of(pattern, ctx)?;
            let flags = match flags {
                Some(f) => lexical_of(f, ctx)?,
                None => String::new(),
            };
            EvalOutcome::Value(Literal::from_bool(run_regex(ctx, &pattern, &flags, &subject)?))
        }
        E::StrEq(a, b) => {
            let av = lexical_of(a, ctx)?;
            let bv = lexical_of(b, ctx)?;
            EvalOutcome::Value(Literal::from_bool(av == bv))
        }
        E::StrNeq(a, b) => {
            let av = lexical_of(a, ctx)?;
            let bv = lexical_of(b, ctx)?;
            EvalOutcome::Value(Literal::from_bool(av != bv))
        }
        E::IsUri(inner) => {
            let v = eval(inner, ctx)?;
            EvalOutcome::Value(Literal::from_bool(matches!(
                v.into_literal().map(|l| l.kind().clone()),
                Some(LiteralKind::Uri(_))
            )))
        }
        E::IsBlank(inner) => {
            let v = eval(inner, ctx)?;
            EvalOutcome::Value(Literal::from_bool(matches!(
                v.into_literal().map(|l| l.kind().clone()),
                Some(LiteralKind::Blank(_))
            )))
        }
        E::IsLiteral(inner) => {
            let v = eval(inner, ctx)?;
            EvalOutcome::Value(Literal::from_bool(matches!(
                v.into_literal().map(|l| l.type_tag()),
                Some(
                    rdfq_model::TypeTag::PlainString
                        | rdfq_model::TypeTag::XsdString
                        | rdfq_model::TypeTag::Boolean
                        | rdfq_model::TypeTag::Integer
                        | rdfq_model::TypeTag::Float
                        | rdfq_model::TypeTag::Double
                        | rdfq_model::TypeTag::Decimal
                        | rdfq_model::TypeTag::Date
                        | rdfq_model::TypeTag::DateTime
                        | rdfq_model::TypeTag::UserDefinedType
                )
            )))
        }
        E::Str(inner) => {
            let v = eval(inner, ctx)?.literal()?.clone();
            EvalOutcome::Value(Literal::from_xsd_string(v.lexical_form()))
        }
        E::Lang(inner) => {
            let v = eval(inner, ctx)?.literal()?.clone();
            EvalOutcome::Value(Literal::from_xsd_string(v.language().unwrap_or("")))
        }
        E::Datatype(inner) => {
            let v = eval(inner, ctx)?.literal()?.clone();
            match v.datatype() {
                Some(dt) => EvalOutcome::Value(Literal::from_uri(dt)),
                None if matches!(v.kind(), LiteralKind::PlainString { language: None, .. }) => {
                    EvalOutcome::Value(Literal::from_uri(xsd::STRING))
                }
                None => return Err(EvalError::Type(TypeError::Incomparable)),
            }
        }
        E::Cast {
            target_datatype,
            inner,
        } => cast(target_datatype, inner, ctx)?,
        E::FunctionCall(function, args) => call_builtin(function, args, ctx)?,
        E::Asc(inner) | E::Desc(inner) => eval(inner, ctx)?,
    })
}

fn ebv_of(expr: &Expression, ctx: &EvalContext<'_>) -> Result<bool, EvalError> {
    match eval(expr, ctx) {
        Ok(EvalOutcome::Value(l)) => l.effective_boolean_value().map_err(EvalError::Type),
        Ok(EvalOutcome::Null) => Ok(false),
        Err(_) => Err(EvalError::Type(TypeError::NotBooleanConvertible)),
    }
}

/// `And`/`Or` short-circuit with the "error absorbs into the identity
/// element" rule spec §4.5 calls out: `error OR true == true`,
/// `error AND false == false`.
fn eval_and(children: &[Expression], ctx: &EvalContext<'_>) -> Result<EvalOutcome, EvalError> {
    let mut saw_error = false;
    for child in children {
        match ebv_of(child, ctx) {
            Ok(true) => {}
            Ok(false) => return Ok(EvalOutcome::Value(Literal::from_bool(false))),
            Err(_) => saw_error = true,
        }
    }
    if saw_error {
        Err(EvalError::Type(TypeError::NotBooleanConvertible))
    } else {
        Ok(EvalOutcome::Value(Literal::from_bool(true)))
    }
}

fn eval_or(children: &[Expression], ctx: &EvalContext<'_>) -> Result<EvalOutcome, EvalError> {
    let mut saw_error = false;
    for child in children {
        match ebv_of(child, ctx) {
            Ok(true) => return Ok(EvalOutcome::Value(Literal::from_bool(true))),
            Ok(false) => {}
            Err(_) => saw_error = true,
        }
    }
    if saw_error {
        Err(EvalError::Type(TypeError::NotBooleanConvertible))
    } else {
        Ok(EvalOutcome::Value(Literal::from_bool(false)))
    }
}

fn value_compare(
    a: &Expression,
    b: &Expression,
    ctx: &EvalContext<'_>,
) -> Result<std::cmp::Ordering, EvalError> {
    let av = eval(a, ctx)?.literal()?.clone();
    let bv = eval(b, ctx)?.literal()?.clone();
    av.compare(&bv, ctx.mode).map_err(EvalError::Type)
}

fn lexical_of(expr: &Expression, ctx: &EvalContext<'_>) -> Result<String, EvalError> {
    Ok(eval(expr, ctx)?.literal()?.lexical_form())
}

#[derive(Clone, Copy)]
enum NumericOp {
    Add,
    Sub,
    Mul,
    Div,
}

fn numeric_op(
    a: &Expression,
    b: &Expression,
    ctx: &EvalContext<'_>,
    op: NumericOp,
) -> Result<Literal, EvalError> {
    let av = eval(a, ctx)?.literal()?.clone();
    let bv = eval(b, ctx)?.literal()?.clone();
    if !av.is_numeric() || !bv.is_numeric() {
        return Err(EvalError::Type(TypeError::Incomparable));
    }
    // Exact integer/integer decimal division per XPath F&O (spec §4.5):
    // division of two xsd:integer operands yields an exact xsd:decimal,
    // not a double, and never raises divide-by-zero the way float
    // division would (it is still an error here since exactness can't be
    // preserved through a zero denominator).
    use rdfq_model::LiteralKind::*;
    match (op, av.kind(), bv.kind()) {
        (NumericOp::Div, Integer(a), Integer(b)) => {
            if b.as_i64() == 0 {
                return Err(EvalError::Type(TypeError::Incomparable));
            }
            let a = rdfq_xsd::Decimal::from(a.as_i64());
            let b = rdfq_xsd::Decimal::from(b.as_i64());
            let r = a.checked_div(b).ok_or(EvalError::Type(TypeError::Incomparable))?;
            return Ok(Literal::from_decimal(r));
        }
        _ => {}
    }
    let promoted = widest_numeric_type(&av, &bv);
    use rdfq_model::TypeTag;
    match promoted {
        TypeTag::Double => {
            let a = to_f64(&av);
            let b = to_f64(&bv);
            let r = match op {
                NumericOp::Add => a + b,
                NumericOp::Sub => a - b,
                NumericOp::Mul => a * b,
                NumericOp::Div => a / b,
            };
            Ok(Literal::from_f64(r))
        }
        TypeTag::Float => {
            let a = to_f64(&av) as f32;
            let b = to_f64(&bv) as f32;
            let r = match op {
                NumericOp::Add => a + b,
                NumericOp::Sub => a - b,
                NumericOp::Mul => a * b,
                NumericOp::Div => a / b,
            };
            Ok(Literal::from_f32(r))
        }
        TypeTag::Decimal => {
            let a = to_decimal(&av);
            let b = to_decimal(&bv);
            let r = match op {
                NumericOp::Add => a.checked_add(b),
                NumericOp::Sub => a.checked_sub(b),
                NumericOp::Mul => a.checked_mul(b),
                NumericOp::Div => a.checked_div(b),
            };
            r.map(Literal::from_decimal)
                .ok_or(EvalError::Type(TypeError::Incomparable))
        }
        _ => {
            let a = to_i64(&av);
            let b = to_i64(&bv);
            match op {
                NumericOp::Add => a.checked_add(b).map(Literal::from_i64),
                NumericOp::Sub => a.checked_sub(b).map(Literal::from_i64),
                NumericOp::Mul => a.checked_mul(b).map(Literal::from_i64),
                NumericOp::Div => {
                    if b == 0 {
                        None
                    } else {
                        let r = rdfq_xsd::Decimal::from(a)
                            .checked_div(rdfq_xsd::Decimal::from(b))?;
                        return Ok(Literal::from_decimal(r));
                    }
                }
            }
            .ok_or(EvalError::Type(TypeError::Incomparable))
        }
    }
}

fn negate(v: &Literal) -> Result<Literal, EvalError> {
    use rdfq_model::LiteralKind::*;
    Ok(match v.kind() {
        Integer(i) => i
            .checked_neg()
            .map(|v| Literal::from_i64(v.as_i64()))
            .ok_or(EvalError::Type(TypeError::Incomparable))?,
        Float(f) => Literal::from_f32(-f.as_f32()),
        Double(d) => Literal::from_f64(-d.as_f64()),
        Decimal(d) => d
            .checked_neg()
            .map(Literal::from_decimal)
            .ok_or(EvalError::Type(TypeError::Incomparable))?,
        _ => return Err(EvalError::Type(TypeError::Incomparable)),
    })
}

fn widest_numeric_type(a: &Literal, b: &Literal) -> rdfq_model::TypeTag {
    use rdfq_model::TypeTag::*;
    let is_floatish = |t: rdfq_model::TypeTag| matches!(t, Float | Double);
    let (ta, tb) = (a.type_tag(), b.type_tag());
    if ta == Decimal && is_floatish(tb) {
        return tb;
    }
    if tb == Decimal && is_floatish(ta) {
        return ta;
    }
    ta.max(tb)
}

fn to_f64(l: &Literal) -> f64 {
    use rdfq_model::LiteralKind::*;
    match l.kind() {
        Integer(i) => f64::from(*i),
        Float(f) => f64::from(*f),
        Double(d) => d.as_f64(),
        Decimal(d) => d.to_f64(),
        _ => f64::NAN,
    }
}

fn to_decimal(l: &Literal) -> rdfq_xsd::Decimal {
    use rdfq_model::LiteralKind::*;
    match l.kind() {
        Integer(i) => rdfq_xsd::Decimal::from(i.as_i64()),
        Decimal(d) => *d,
        _ => rdfq_xsd::Decimal::ZERO,
    }
}

fn to_i64(l: &Literal) -> i64 {
    match l.kind() {
        rdfq_model::LiteralKind::Integer(i) => i.as_i64(),
        _ => 0,
    }
}

fn run_regex(
    ctx: &EvalContext<'_>,
    pattern: &str,
    flags: &str,
    subject: &str,
) -> Result<bool, EvalError> {
    let key = format!("{flags}\u{0}{pattern}");
    if let Some(re) = ctx.regex_cache.borrow().get(&key) {
        return Ok(re.is_match(subject));
    }
    let mut builder = regex::RegexBuilder::new(pattern);
    builder.case_insensitive(flags.contains('i'));
    builder.dot_matches_new_line(flags.contains('s'));
    builder.multi_line(flags.contains('m'));
    let re = builder
        .build()
        .map_err(|e| EvalError::InvalidRegex(e.to_string()))?;
    let matched = re.is_match(subject);
    ctx.regex_cache.borrow_mut().insert(key, re);
    Ok(matched)
}

fn cast(
    target_datatype: &str,
    inner: &Expression,
    ctx: &EvalContext<'_>,
) -> Result<EvalOutcome, EvalError> {
    let v = eval(inner, ctx)?.literal()?.clone();
    use rdfq_model::LiteralKind::*;
    let result = match target_datatype {
        xsd::STRING => match v.kind() {
            Uri(_) | XsdString(_) | PlainString { .. } | Integer(_) | Float(_) | Double(_)
            | Decimal(_) | Boolean(_) | Date(_) | DateTime(_) => {
                Some(Literal::from_xsd_string(v.lexical_form()))
            }
            _ => None,
        },
        xsd::INTEGER | xsd::FLOAT | xsd::DOUBLE | xsd::DECIMAL if v.is_numeric() => {
            Some(Literal::new_typed(v.lexical_form(), target_datatype, None))
        }
        xsd::INTEGER | xsd::FLOAT | xsd::DOUBLE | xsd::DECIMAL
            if matches!(v.kind(), XsdString(_) | PlainString { language: None, .. }) =>
        {
            let candidate = Literal::new_typed(v.lexical_form(), target_datatype, None);
            candidate.is_valid().then_some(candidate)
        }
        xsd::DATE | xsd::DATE_TIME
            if matches!(v.kind(), XsdString(_) | PlainString { language: None, .. }) =>
        {
            let candidate = Literal::new_typed(v.lexical_form(), target_datatype, None);
            candidate.is_valid().then_some(candidate)
        }
        _ => None,
    };
    match result {
        Some(l) => Ok(EvalOutcome::Value(l)),
        None => Err(EvalError::UnsupportedCast(target_datatype.to_string())),
    }
}

fn call_builtin(
    function: &BuiltinFunction,
    args: &[Expression],
    ctx: &EvalContext<'_>,
) -> Result<EvalOutcome, EvalError> {
    use BuiltinFunction as F;
    let name = format!("{function:?}");
    let arg = |i: usize| -> Result<Literal, EvalError> {
        Ok(eval(args.get(i).ok_or_else(|| EvalError::Arity(name.clone()))?, ctx)?
            .literal()?
            .clone())
    };
    Ok(EvalOutcome::Value(match function {
        F::Abs => numeric_unary(arg(0)?, UnaryNumeric::Abs)?,
        F::Ceil => numeric_unary(arg(0)?, UnaryNumeric::Ceil)?,
        F::Floor => numeric_unary(arg(0)?, UnaryNumeric::Floor)?,
        F::Round => numeric_unary(arg(0)?, UnaryNumeric::Round)?,
        F::StrLen => Literal::from_i64(arg(0)?.lexical_form().chars().count() as i64),
        F::UCase => Literal::from_xsd_string(arg(0)?.lexical_form().to_uppercase()),
        F::LCase => Literal::from_xsd_string(arg(0)?.lexical_form().to_lowercase()),
        F::EncodeForUri => Literal::from_xsd_string(percent_encode(&arg(0)?.lexical_form())),
        F::Concat => {
            let mut out = String::new();
            for a in args {
                out.push_str(&eval(a, ctx)?.literal()?.lexical_form());
            }
            Literal::from_xsd_string(out)
        }
        F::SubStr => {
            let s = arg(0)?.lexical_form();
            let start = to_i64(&arg(1)?).max(1) as usize - 1;
            let chars: Vec<char> = s.chars().collect();
            let end = if let Ok(len) = arg(2) {
                (start + to_i64(&len).max(0) as usize).min(chars.len())
            } else {
                chars.len()
            };
            let start = start.min(chars.len());
            let end = end.max(start);
            Literal::from_xsd_string(chars[start..end].iter().collect::<String>())
        }
        F::Replace => {
            let subject = arg(0)?.lexical_form();
            let pattern = arg(1)?.lexical_form();
            let replacement = arg(2)?.lexical_form();
            let re = regex::Regex::new(&pattern)
                .map_err(|e| EvalError::InvalidRegex(e.to_string()))?;
            Literal::from_xsd_string(re.replace_all(&subject, replacement.as_str()).into_owned())
        }
        F::Contains => Literal::from_bool(arg(0)?.lexical_form().contains(&arg(1)?.lexical_form())),
        F::StrStarts => {
            Literal::from_bool(arg(0)?.lexical_form().starts_with(&arg(1)?.lexical_form()))
        }
        F::StrEnds => Literal::from_bool(arg(0)?.lexical_form().ends_with(&arg(1)?.lexical_form())),
        F::StrBefore => {
            let s = arg(0)?.lexical_form();
            let needle = arg(1)?.lexical_form();
            Literal::from_xsd_string(s.find(&needle).map(|i| s[..i].to_string()).unwrap_or_default())
        }
        F::StrAfter => {
            let s = arg(0)?.lexical_form();
            let needle = arg(1)?.lexical_form();
            Literal::from_xsd_string(
                s.find(&needle)
                    .map(|i| s[i + needle.len()..].to_string())
                    .unwrap_or_default(),
            )
        }
        F::LangMatches => {
            let lang = arg(0)?.lexical_form().to_lowercase();
            let range = arg(1)?.lexical_form().to_lowercase();
            Literal::from_bool(range == "*" || lang == range || lang.starts_with(&format!("{range}-")))
        }
        F::StrLang => Literal::from_plain_string(arg(0)?.lexical_form(), Some(arg(1)?.lexical_form())),
        F::StrDt => Literal::new_typed(arg(0)?.lexical_form(), arg(1)?.lexical_form(), None),
        F::IsNumeric => Literal::from_bool(arg(0)?.is_numeric()),
        F::Year => temporal_field(arg(0)?, TemporalField::Year)?,
        F::Month => temporal_field(arg(0)?, TemporalField::Month)?,
        F::Day => temporal_field(arg(0)?, TemporalField::Day)?,
        F::Hours => temporal_field(arg(0)?, TemporalField::Hours)?,
        F::Minutes => temporal_field(arg(0)?, TemporalField::Minutes)?,
        F::Seconds => temporal_field(arg(0)?, TemporalField::Seconds)?,
        F::Timezone | F::Tz => {
            let v = arg(0)?;
            let tz = match v.kind() {
                rdfq_model::LiteralKind::DateTime(dt) => dt.timezone_offset(),
                rdfq_model::LiteralKind::Date(d) => d.timezone_offset(),
                _ => return Err(EvalError::Type(TypeError::Incomparable)),
            };
            match (function, tz) {
                (F::Tz, Some(tz)) => Literal::from_xsd_string(tz.to_string()),
                (F::Tz, None) => Literal::from_xsd_string(""),
                (F::Timezone, Some(_)) => Literal::from_xsd_string("PT0S"),
                (F::Timezone, None) => return Err(EvalError::Type(TypeError::Incomparable)),
                _ => unreachable!(),
            }
        }
        F::Md5 => Literal::from_xsd_string(hex::encode(md5::Md5::digest(
            arg(0)?.lexical_form().as_bytes(),
        ))),
        F::Sha1 => Literal::from_xsd_string(hex::encode(sha1::Sha1::digest(
            arg(0)?.lexical_form().as_bytes(),
        ))),
        F::Sha256 => Literal::from_xsd_string(hex::encode(sha2::Sha256::digest(
            arg(0)?.lexical_form().as_bytes(),
        ))),
        F::Custom(uri) => {
            let f = ctx
                .custom_functions
                .get(uri)
                .ok_or_else(|| EvalError::UnknownFunction(uri.clone()))?;
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(eval(a, ctx)?.literal()?.clone());
            }
            f(&values).ok_or_else(|| EvalError::UnknownFunction(uri.clone()))?
        }
    }))
}

enum UnaryNumeric {
    Abs,
    Ceil,
    Floor,
    Round,
}

fn numeric_unary(v: Literal, op: UnaryNumeric) -> Result<Literal, EvalError> {
    if !v.is_numeric() {
        return Err(EvalError::Type(TypeError::Incomparable));
    }
    use rdfq_model::LiteralKind::*;
    Ok(match v.kind() {
        // Integer is already its own floor/ceil/round; abs still needs a checked negation.
        Integer(i) => match op {
            UnaryNumeric::Abs => i
                .checked_abs()
                .map(|a| Literal::from_i64(a.as_i64()))
                .ok_or(EvalError::Type(TypeError::Incomparable))?,
            _ => v.clone(),
        },
        Float(x) => {
            let x = x.as_f32();
            Literal::from_f32(match op {
                UnaryNumeric::Abs => x.abs(),
                UnaryNumeric::Ceil => x.ceil(),
                UnaryNumeric::Floor => x.floor(),
                UnaryNumeric::Round => x.round(),
            })
        }
        Double(x) => {
            let x = x.as_f64();
            Literal::from_f64(match op {
                UnaryNumeric::Abs => x.abs(),
                UnaryNumeric::Ceil => x.ceil(),
                UnaryNumeric::Floor => x.floor(),
                UnaryNumeric::Round => x.round(),
            })
        }
        Decimal(d) => Literal::from_decimal(match op {
            UnaryNumeric::Abs => d.checked_abs().ok_or(EvalError::Type(TypeError::Incomparable))?,
            UnaryNumeric::Ceil => d.ceil(),
            UnaryNumeric::Floor => d.floor(),
            UnaryNumeric::Round => d.round(),
        }),
        _ => unreachable!(),
    })
}

enum TemporalField {
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
}

fn temporal_field(v: Literal, field: TemporalField) -> Result<Literal, EvalError> {
    use rdfq_model::LiteralKind::*;
    let dt = match v.kind() {
        DateTime(dt) => *dt,
        Date(d) => d.to_date_time(),
        _ => return Err(EvalError::Type(TypeError::Incomparable)),
    };
    Ok(match field {
        TemporalField::Year => Literal::from_i64(i64::from(dt.year())),
        TemporalField::Month => Literal::from_i64(i64::from(dt.month())),
        TemporalField::Day => Literal::from_i64(i64::from(dt.day())),
        TemporalField::Hours => Literal::from_i64(i64::from(dt.hour())),
        TemporalField::Minutes => Literal::from_i64(i64::from(dt.minute())),
        TemporalField::Seconds => Literal::from_i64(i64::from(dt.second())),
    })
}

fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfq_model::xsd;

    #[test]
    fn integer_equals_double_after_promotion() {
        let table = VariablesTable::new();
        let ctx = EvalContext::new(&table);
        let expr = Expression::Equal(
            Box::new(Expression::Constant(Literal::new_typed("42", xsd::INTEGER, None))),
            Box::new(Expression::Constant(Literal::new_typed("42.0", xsd::DOUBLE, None))),
        );
        let outcome = ctx.evaluate(&expr).unwrap();
        match outcome {
            EvalOutcome::Value(l) => assert!(l.effective_boolean_value().unwrap()),
            EvalOutcome::Null => panic!("expected a value"),
        }
    }

    #[test]
    fn lang_matches_is_case_insensitive() {
        let table = VariablesTable::new();
        let ctx = EvalContext::new(&table);
        let expr = Expression::FunctionCall(
            BuiltinFunction::LangMatches,
            vec![
                Expression::Constant(Literal::from_xsd_string("EN-US")),
                Expression::Constant(Literal::from_xsd_string("en")),
            ],
        );
        let outcome = ctx.evaluate(&expr).unwrap();
        match outcome {
            EvalOutcome::Value(l) => assert!(l.effective_boolean_value().unwrap()),
            EvalOutcome::Null => panic!("expected a value"),
        }
    }

    #[test]
    fn unbound_variable_is_null_not_error() {
        let mut table = VariablesTable::new();
        table.get_or_insert(rdfq_model::Variable::new("x"));
        let ctx = EvalContext::new(&table);
        let expr = Expression::Variable(rdfq_model::Variable::new("x"));
        assert!(matches!(ctx.evaluate(&expr).unwrap(), EvalOutcome::Null));
    }

    #[test]
    fn bound_is_false_for_unbound_variable() {
        let mut table = VariablesTable::new();
        table.get_or_insert(rdfq_model::Variable::new("x"));
        let ctx = EvalContext::new(&table);
        let expr = Expression::Bound(rdfq_model::Variable::new("x"));
        match ctx.evaluate(&expr).unwrap() {
            EvalOutcome::Value(l) => assert!(!l.effective_boolean_value().unwrap()),
            EvalOutcome::Null => panic!("bound() always yields a literal"),
        }
    }

    #[test]
    fn integer_integer_division_yields_exact_decimal() {
        let table = VariablesTable::new();
        let ctx = EvalContext::new(&table);
        let expr = Expression::Divide(
            Box::new(Expression::Constant(Literal::from_i64(1))),
            Box::new(Expression::Constant(Literal::from_i64(3))),
        );
        match ctx.evaluate(&expr).unwrap() {
            EvalOutcome::Value(l) => assert!(matches!(l.kind(), LiteralKind::Decimal(_))),
            EvalOutcome::Null => panic!("expected a value"),
        }
    }

    #[test]
    fn and_with_error_and_false_operand_is_false() {
        let table = VariablesTable::new();
        let ctx = EvalContext::new(&table);
        // A URI has no effective boolean value, so this operand errors out.
        let error_operand = Expression::Constant(Literal::from_uri("urn:x"));
        let expr = Expression::And(vec![
            error_operand,
            Expression::Constant(Literal::from_bool(false)),
        ]);
        match ctx.evaluate(&expr).unwrap() {
            EvalOutcome::Value(l) => assert!(!l.effective_boolean_value().unwrap()),
            EvalOutcome::Null => panic!("expected a value"),
        }
    }
}
