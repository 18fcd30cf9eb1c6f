use filter_compiler::FilterError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read the filter file {}: {source}", path.display())]
    FilterFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No filter given")]
    MissingFilter,

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl CliError {
    /// Message for the terminal. Syntax errors get the caret diagram.
    pub fn report(&self) -> String {
        match self {
            CliError::Filter(FilterError::Syntax(err)) => err.format_error(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_errors_report_caret() {
        let err = CliError::from(filter_compiler::to_prefix_notation("a > 1 b").unwrap_err());
        assert!(err.report().contains("a > 1 b\n      ^"), "{}", err.report());
    }

    #[test]
    fn test_other_errors_report_message() {
        let err = CliError::from(filter_compiler::to_pushdown_dnf("NOT a = 1").unwrap_err());
        assert_eq!(err.report(), err.to_string());
        assert!(err.report().contains("NOT"));
    }
}
