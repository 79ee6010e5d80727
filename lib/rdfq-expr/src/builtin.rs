/// The built-in function table spec §4.5 implies but doesn't enumerate,
/// grounded in `spargebra::algebra::Function` (SPEC_FULL.md §4.5). The
/// dedicated RDF-introspection/cast operators spec.md names explicitly
/// (`bound`, `isUri`, `str`, ...) are separate `Expression` variants, not
/// entries here — this enum is the open-ended "function call" extension
/// point plus the string/numeric/hash/date-component functions that don't
/// get their own AST node.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum BuiltinFunction {
    Abs,
    Ceil,
    Floor,
    Round,
    Concat,
    SubStr,
    StrLen,
    Replace,
    UCase,
    LCase,
    EncodeForUri,
    Contains,
    StrStarts,
    StrEnds,
    StrBefore,
    StrAfter,
    Year,
    Month,
    Day,
    Hours,
    Minutes,
    Seconds,
    Timezone,
    Tz,
    Md5,
    Sha1,
    Sha256,
    StrLang,
    StrDt,
    IsNumeric,
    LangMatches,
    /// An unrecognized function URI, dispatched to a caller-registered
    /// `CustomFunction` (see `EvalContext::with_custom_function`).
    Custom(String),
}
