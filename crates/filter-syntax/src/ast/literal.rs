use serde::Serialize;
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Classifies a signed number lexeme.
    ///
    /// Lexemes without a decimal point or exponent are integers, everything
    /// else (including integers too large for `i64`) is a float. Numbers
    /// that overflow `f64` are rejected.
    pub fn from_number(lexeme: &str) -> Option<Literal> {
        let is_integral = !lexeme.contains(['.', 'e', 'E']);
        if is_integral && let Ok(value) = lexeme.parse::<i64>() {
            return Some(Literal::Integer(value));
        }
        lexeme
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Literal::Float)
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Literal::Integer(v) => v.hash(state),
            // 0.0 == -0.0, so both zeros must hash alike
            Literal::Float(v) if *v == 0.0 => 0u64.hash(state),
            Literal::Float(v) => v.to_bits().hash(state),
            Literal::String(v) => v.hash(state),
        }
    }
}

/// Canonical rendering: integers without a fractional part, floats always
/// with one, strings re-quoted with single quotes.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{:?}", n),
            Literal::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}
