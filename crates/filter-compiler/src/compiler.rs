use crate::error::FilterError;
use filter_syntax::Expression;

/// A trait for compiling filter expressions into a specific format.
pub trait FilterCompiler {
    /// The type of filter that this compiler produces.
    type Filter;

    /// Compile the syntax tree into a filter.
    fn compile(expr: &Expression) -> Result<Self::Filter, FilterError>;
}
