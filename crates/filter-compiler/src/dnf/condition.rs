use filter_syntax::{ComparisonOperator, Literal};
use serde::{Serialize, Serializer};
use std::{cmp::Ordering, collections::HashSet, fmt};

/// Disjunction of conjunctions: `[[a AND b] OR [c]]`.
pub type Dnf = Vec<Conjunction>;
pub type Conjunction = Vec<DnfCondition>;

/// Operators understood by pushdown readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnfOperator {
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    In,
    NotIn,
}

impl DnfOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            DnfOperator::Equal => "=",
            DnfOperator::NotEqual => "!=",
            DnfOperator::GreaterThan => ">",
            DnfOperator::LessThan => "<",
            DnfOperator::GreaterOrEqual => ">=",
            DnfOperator::LessOrEqual => "<=",
            DnfOperator::In => "in",
            DnfOperator::NotIn => "not in",
        }
    }
}

impl From<ComparisonOperator> for DnfOperator {
    fn from(op: ComparisonOperator) -> Self {
        match op {
            ComparisonOperator::Equal => DnfOperator::Equal,
            ComparisonOperator::NotEqual => DnfOperator::NotEqual,
            ComparisonOperator::GreaterThan => DnfOperator::GreaterThan,
            ComparisonOperator::LessThan => DnfOperator::LessThan,
            ComparisonOperator::GreaterOrEqual => DnfOperator::GreaterOrEqual,
            ComparisonOperator::LessOrEqual => DnfOperator::LessOrEqual,
        }
    }
}

impl fmt::Display for DnfOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Right hand side of a pushdown condition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DnfValue {
    Int(i64),
    Float(f64),
    String(String),
    #[serde(serialize_with = "serialize_sorted")]
    Set(HashSet<Literal>),
}

impl DnfValue {
    /// Sentinel compared against by `IS NULL` / `IS NOT NULL`.
    pub const NULL: &'static str = "null";

    pub fn set<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Literal>,
    {
        DnfValue::Set(values.into_iter().collect())
    }
}

impl From<Literal> for DnfValue {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Integer(v) => DnfValue::Int(v),
            Literal::Float(v) => DnfValue::Float(v),
            Literal::String(v) => DnfValue::String(v),
        }
    }
}

impl From<i64> for DnfValue {
    fn from(value: i64) -> Self {
        DnfValue::Int(value)
    }
}

impl From<f64> for DnfValue {
    fn from(value: f64) -> Self {
        DnfValue::Float(value)
    }
}

impl From<&str> for DnfValue {
    fn from(value: &str) -> Self {
        DnfValue::String(value.to_string())
    }
}

/// Sets are written numbers first in ascending order, then strings, so the
/// output is stable between runs.
fn serialize_sorted<S: Serializer>(set: &HashSet<Literal>, serializer: S) -> Result<S::Ok, S::Error> {
    let mut members = set.iter().collect::<Vec<_>>();
    members.sort_by(|a, b| compare_literals(a, b));
    serializer.collect_seq(members)
}

fn compare_literals(a: &Literal, b: &Literal) -> Ordering {
    match (a, b) {
        (Literal::String(a), Literal::String(b)) => a.cmp(b),
        (Literal::String(_), _) => Ordering::Greater,
        (_, Literal::String(_)) => Ordering::Less,
        (Literal::Integer(a), Literal::Integer(b)) => a.cmp(b),
        (a, b) => as_f64(a)
            .total_cmp(&as_f64(b))
            .then_with(|| matches!(a, Literal::Float(_)).cmp(&matches!(b, Literal::Float(_)))),
    }
}

fn as_f64(literal: &Literal) -> f64 {
    match literal {
        Literal::Integer(v) => *v as f64,
        Literal::Float(v) => *v,
        Literal::String(_) => f64::NAN,
    }
}

/// A single `(column, operator, value)` condition.
///
/// Serializes as a three element sequence, the triple format pushdown
/// readers take.
#[derive(Debug, Clone, PartialEq)]
pub struct DnfCondition {
    pub column: String,
    pub operator: DnfOperator,
    pub value: DnfValue,
}

impl DnfCondition {
    pub fn new(column: impl Into<String>, operator: DnfOperator, value: impl Into<DnfValue>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn as_tuple(&self) -> (&str, &str, &DnfValue) {
        (&self.column, self.operator.as_str(), &self.value)
    }
}

impl Serialize for DnfCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_tuple().serialize(serializer)
    }
}
