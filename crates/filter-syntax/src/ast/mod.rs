pub mod column;
pub mod expr;
pub mod literal;
pub mod operator;
pub mod span;
