use filter_syntax::SyntaxError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A valid construct the target format cannot represent.
    #[error("The `{operator}` operator is not supported for {target} filters: {expression}")]
    UnsupportedOperator {
        operator: String,
        target: &'static str,
        /// Offending subtree in prefix notation
        expression: String,
    },

    /// A valid tree whose shape the target format cannot represent.
    #[error("Unsupported filter structure for {target} filters: {reason}: {expression}")]
    Structure {
        reason: String,
        target: &'static str,
        /// Offending subtree in prefix notation
        expression: String,
    },
}
