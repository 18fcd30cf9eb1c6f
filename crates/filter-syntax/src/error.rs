use crate::parser::Rule;
use pest::error::{Error as PestError, InputLocation, LineColLocation};
use thiserror::Error;

/// A filter string that does not match the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Syntax error at line {line}, column {column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// The token the parser stopped at, `None` at end of input
    pub token: Option<String>,
    pub line: usize,
    pub column: usize,
    /// Byte offset into the filter string
    pub offset: usize,
    pub source_snippet: String,
}

impl SyntaxError {
    pub fn from_pest_error(err: PestError<Rule>, input: &str) -> Self {
        let err = err.renamed_rules(describe_rule);

        let (line, column) = match err.line_col {
            LineColLocation::Pos((l, c)) => (l, c),
            LineColLocation::Span((l, c), _) => (l, c),
        };
        let offset = match err.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((start, _)) => start,
        };

        let token = offending_token(input, offset);
        let found = match &token {
            Some(token) => format!("`{token}`"),
            None => "end of input".to_string(),
        };
        let message = format!("{}, found {}", err.variant.message(), found);

        SyntaxError {
            message,
            token,
            line,
            column,
            offset,
            source_snippet: err.line().trim_end_matches(['␊', '␍']).to_string(),
        }
    }

    /// Error anchored at an already matched piece of input.
    pub fn at(message: String, span: pest::Span<'_>) -> Self {
        let (line, column) = span.start_pos().line_col();
        SyntaxError {
            message,
            token: Some(span.as_str().chars().take(MAX_TOKEN_CHARS).collect::<String>())
                .filter(|t| !t.is_empty()),
            line,
            column,
            offset: span.start(),
            source_snippet: span.start_pos().line_of().trim_end_matches(['\r', '\n']).to_string(),
        }
    }

    pub fn empty_input(input: &str) -> Self {
        SyntaxError {
            message: "Empty input".to_string(),
            token: None,
            line: 1,
            column: 1,
            offset: 0,
            source_snippet: input.lines().next().unwrap_or_default().to_string(),
        }
    }

    /// Format error with context for display
    pub fn format_error(&self) -> String {
        format!(
            "Syntax error at line {}, column {}:\n{}\n{}^\n{}",
            self.line,
            self.column,
            self.source_snippet,
            " ".repeat(self.column.saturating_sub(1)),
            self.message
        )
    }
}

const MAX_TOKEN_CHARS: usize = 32;

/// The token starting at `offset`: a run of word characters, a run of
/// operator characters or else a single character.
fn offending_token(input: &str, offset: usize) -> Option<String> {
    let rest = input.get(offset..)?.trim_start();
    let first = rest.chars().next()?;

    let is_word = |c: char| c.is_alphanumeric() || matches!(c, '_' | '$' | '.');
    let is_operator = |c: char| matches!(c, '!' | '<' | '>' | '=' | '~');

    let token: String = if is_word(first) {
        rest.chars().take_while(|c| is_word(*c)).take(MAX_TOKEN_CHARS).collect()
    } else if is_operator(first) {
        rest.chars().take_while(|c| is_operator(*c)).take(MAX_TOKEN_CHARS).collect()
    } else {
        first.to_string()
    };
    Some(token)
}

fn describe_rule(rule: &Rule) -> String {
    let description = match rule {
        Rule::EOI => "end of input",
        Rule::or_expr | Rule::and_expr => "condition",
        Rule::negation => "negated condition",
        Rule::comparison => "comparison",
        Rule::null_check => "null check",
        Rule::in_list | Rule::not_in_list => "IN list",
        Rule::literal_list => "value list",
        Rule::name => "column name",
        Rule::number => "number",
        Rule::string => "quoted string",
        Rule::binop => "comparison operator",
        Rule::kw_and => "AND",
        Rule::kw_or => "OR",
        Rule::kw_not => "NOT",
        Rule::kw_in => "IN",
        Rule::kw_not_in => "NOT IN",
        Rule::is_null => "IS NULL",
        Rule::is_not_null => "IS NOT NULL",
        Rule::lparen => "`(`",
        Rule::rparen => "`)`",
        Rule::comma => "`,`",
        other => return format!("{other:?}"),
    };
    description.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FilterParser;
    use pest::Parser;

    fn pest_error(input: &str) -> SyntaxError {
        let err = FilterParser::parse(Rule::filter, input).unwrap_err();
        SyntaxError::from_pest_error(err, input)
    }

    #[test]
    fn test_reports_offending_token() {
        let err = pest_error("a == 5");

        assert_eq!(err.line, 1);
        assert_eq!(err.column, 4);
        assert_eq!(err.offset, 3);
        assert_eq!(err.token.as_deref(), Some("="));
        assert!(err.message.contains("found `=`"), "{}", err.message);
    }

    #[test]
    fn test_reports_end_of_input() {
        let err = pest_error("a > 1 AND");

        assert_eq!(err.token, None);
        assert!(err.message.ends_with("found end of input"), "{}", err.message);
    }

    #[test]
    fn test_format_error_points_at_column() {
        let err = pest_error("a > 1 b");
        let formatted = err.format_error();

        assert!(formatted.contains("a > 1 b\n      ^"), "{formatted}");
    }

    #[test]
    fn test_token_is_bounded() {
        let err = pest_error("a = 1 AND ##########");
        assert_eq!(err.token.as_deref(), Some("#"));

        let long_name = "x".repeat(100);
        let err = pest_error(&format!("a > 1 {long_name}"));
        assert_eq!(err.token.map(|t| t.len()), Some(MAX_TOKEN_CHARS));
    }

    #[test]
    fn test_rule_names_are_readable() {
        let err = pest_error("a >");
        assert!(err.message.contains("number"), "{}", err.message);
        assert!(!err.message.contains("sq_chars"), "{}", err.message);
    }
}
