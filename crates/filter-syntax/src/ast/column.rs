use crate::ast::span::Span;
use serde::Serialize;
use std::fmt;

/// Reference to a column, e.g. `a.column` or `` `A` ``.
///
/// Backticks are stripped while parsing; dots are kept as part of the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Column {
    pub name: String,
    pub span: Span,
}

impl Column {
    pub fn new(name: &str, span: Span) -> Self {
        Self {
            name: name.to_string(),
            span,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
