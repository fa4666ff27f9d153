// ABOUTME: Value model and SQL literal rendering for exported rows
// ABOUTME: Closed set of value kinds with one textual catch-all variant

use chrono::NaiveDateTime;

/// A single column value read from the source, reduced to the closed set of
/// kinds the artifact format can represent.
///
/// The set is deliberately a tagged union rather than open-ended dynamic
/// dispatch: every literal shape the exporter can produce is enumerable here.
/// Column types outside this set (numeric, date, uuid, json, ...) are cast to
/// text at SELECT time and arrive as [`Value::Text`], the catch-all variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Value {
    /// Render this value as a SQL literal safe to embed in an INSERT statement.
    ///
    /// - `Null` → the unquoted `NULL` keyword
    /// - `Bool` → `TRUE` / `FALSE` (booleans never reach numeric rendering;
    ///   the enum discriminates before any numeric check)
    /// - `Int` / `Float` → bare decimal text, no quoting. Rust's `Display`
    ///   for `f64` emits the shortest string that round-trips the value.
    /// - `Timestamp` → quoted ISO-8601, fractional seconds omitted when zero
    /// - `Text` → quoted, with every embedded `'` doubled
    ///
    /// Rendering is infallible: there is no unrecognized case left to fail on.
    pub fn to_sql_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Timestamp(ts) => format!("'{}'", ts.format("%Y-%m-%dT%H:%M:%S%.f")),
            Value::Text(s) => quote_text(s),
        }
    }
}

/// Wrap a string in single quotes, doubling any embedded quote characters so
/// the result stays one well-formed literal.
pub fn quote_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}
