//! Grammar, syntax tree and parser for row filter expressions.
//!
//! Filters use the condition syntax of a SQL `WHERE` clause:
//!
//! ```text
//! `a.column` = "abc" AND b IS NOT NULL OR index < 50
//! ```
//!
//! [`parse`] turns such a string into an [`Expression`] tree which the
//! backend specific compilers translate further.

pub mod ast;
pub mod builder;
pub mod error;
pub mod parser;

pub use ast::{
    column::Column,
    expr::{Expression, ExpressionKind, Operand},
    literal::Literal,
    operator::ComparisonOperator,
    span::Span,
};
pub use builder::parse;
pub use error::SyntaxError;
