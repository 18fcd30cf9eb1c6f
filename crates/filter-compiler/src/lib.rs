//! Translates row filter strings into the representations storage backends
//! consume.
//!
//! Each target implements [`FilterCompiler`] over the tree produced by
//! [`filter_syntax::parse`]. The free functions below bundle both steps.

pub mod compiler;
pub mod dnf;
pub mod error;
pub mod prefix;
pub mod psql;

pub use compiler::FilterCompiler;
pub use dnf::{Dnf, DnfCompiler, DnfCondition, DnfOperator, DnfValue};
pub use error::FilterError;
pub use prefix::PrefixCompiler;
pub use psql::{PsqlCompiler, ReadQuery};

use tracing::debug;

/// Parse `filter` and compile it with `C`.
pub fn compile<C: FilterCompiler>(filter: &str) -> Result<C::Filter, FilterError> {
    let expr = filter_syntax::parse(filter)?;
    debug!(
        filter,
        compiler = std::any::type_name::<C>(),
        "Compiling filter"
    );
    C::compile(&expr)
}

/// Render a filter in prefix notation, e.g. `(> Column<a> 1)`.
pub fn to_prefix_notation(filter: &str) -> Result<String, FilterError> {
    compile::<PrefixCompiler>(filter)
}

/// Convert a filter to disjunctive normal form for predicate pushdown.
///
/// Fails for filters using `NOT`, comparing two columns or nesting a
/// disjunction inside a conjunction.
pub fn to_pushdown_dnf(filter: &str) -> Result<Dnf, FilterError> {
    compile::<DnfCompiler>(filter)
}

/// Render a filter as a PostgreSQL `WHERE` condition.
pub fn to_psql(filter: &str) -> Result<String, FilterError> {
    compile::<PsqlCompiler>(filter)
}
