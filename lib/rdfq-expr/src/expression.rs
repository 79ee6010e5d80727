use crate::BuiltinFunction;
use rdfq_model::{Literal, Variable};

/// The expression tree spec §3 fixes: roughly forty operators over logical,
/// comparison, numeric, string, and RDF-introspection concerns, plus
/// cast-to-datatype, a generic function call, and the `Asc`/`Desc`
/// order-direction wrappers. Each node owns its children.
#[derive(Debug, Clone)]
pub enum Expression {
    /// A constant literal (covers bare URIs via `Literal::Uri` as well as
    /// typed/plain literals — the model's `Literal` already is the union
    /// spec.md's term model uses everywhere).
    Constant(Literal),
    Variable(Variable),

    And(Vec<Expression>),
    Or(Vec<Expression>),
    Not(Box<Expression>),

    /// Value equality/inequality (`=`, `!=`), applying numeric promotion.
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    /// RDF-term equality (`sameTerm`) — no numeric promotion.
    SameTerm(Box<Expression>, Box<Expression>),
    Less(Box<Expression>, Box<Expression>),
    LessOrEqual(Box<Expression>, Box<Expression>),
    Greater(Box<Expression>, Box<Expression>),
    GreaterOrEqual(Box<Expression>, Box<Expression>),

    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    UnaryPlus(Box<Expression>),
    UnaryMinus(Box<Expression>),

    /// `regex(subject, pattern, flags?)`.
    Regex {
        subject: Box<Expression>,
        pattern: Box<Expression>,
        flags: Option<Box<Expression>>,
    },
    /// Lexical string equality/inequality ignoring datatype/value promotion
    /// (`strEq`/`strNeq` in spec §3's string-predicates bullet).
    StrEq(Box<Expression>, Box<Expression>),
    StrNeq(Box<Expression>, Box<Expression>),

    Bound(Variable),
    IsUri(Box<Expression>),
    IsBlank(Box<Expression>),
    IsLiteral(Box<Expression>),
    Str(Box<Expression>),
    Lang(Box<Expression>),
    Datatype(Box<Expression>),

    /// `cast(target_datatype_uri, expr)`.
    Cast {
        target_datatype: String,
        inner: Box<Expression>,
    },

    FunctionCall(BuiltinFunction, Vec<Expression>),

    Asc(Box<Expression>),
    Desc(Box<Expression>),
}

impl Expression {
    /// Strips a trailing `Asc`/`Desc` order-direction wrapper, returning the
    /// wrapped expression and whether it should sort descending. Used by
    /// `rdfq-algebra`'s `ORDER BY` condition list when handing conditions to
    /// the `Sort` row source (spec §4.7).
    pub fn strip_order_direction(&self) -> (&Expression, bool) {
        match self {
            Self::Desc(inner) => (inner, true),
            Self::Asc(inner) => (inner, false),
            other => (other, false),
        }
    }
}
