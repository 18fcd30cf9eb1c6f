use crate::{
    ast::{
        column::Column,
        expr::{Expression, ExpressionKind, Operand},
        literal::Literal,
        operator::ComparisonOperator,
        span::Span,
    },
    error::SyntaxError,
    parser::{FilterParser, Rule},
};
use pest::{
    Parser,
    iterators::{Pair, Pairs},
};
use tracing::{debug, trace};

pub type BuildResult<T> = Result<T, SyntaxError>;

/// Deepest parenthesis nesting accepted. Keeps both the grammar and the
/// builder, which recurse once per group, within a bounded stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a filter string into a syntax tree
pub fn parse(input: &str) -> BuildResult<Expression> {
    trace!(filter = input, "Parsing filter");
    check_nesting(input)?;

    let mut pairs = FilterParser::parse(Rule::filter, input).map_err(|e| {
        let err = SyntaxError::from_pest_error(e, input);
        debug!(filter = input, error = %err, "Filter rejected by grammar");
        err
    })?;

    let root = pairs
        .next()
        .and_then(|filter| filter.into_inner().find(|p| p.as_rule() == Rule::or_expr))
        .ok_or_else(|| SyntaxError::empty_input(input))?;

    let expr = build_expression(root)?;
    debug!(filter = input, "Parsed filter");
    Ok(expr)
}

/// Rejects inputs whose parentheses, outside of string literals, nest
/// deeper than [`MAX_NESTING_DEPTH`].
fn check_nesting(input: &str) -> BuildResult<()> {
    let mut depth = 0usize;
    let mut quote = None;
    let mut escaped = false;

    for (offset, c) in input.char_indices() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => {
                    depth += 1;
                    if depth > MAX_NESTING_DEPTH {
                        let message = format!(
                            "Parentheses nested deeper than {MAX_NESTING_DEPTH} levels"
                        );
                        debug!(filter_len = input.len(), offset, "Filter nested too deeply");
                        return Err(match pest::Span::new(input, offset, offset + 1) {
                            Some(span) => SyntaxError::at(message, span),
                            None => SyntaxError::empty_input(input),
                        });
                    }
                }
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    Ok(())
}

fn pair_to_span(pair: &Pair<Rule>) -> Span {
    let (line, col) = pair.line_col();
    let span_pest = pair.as_span();
    Span::new(span_pest.start(), span_pest.end(), line, col)
}

fn build_expression(pair: Pair<Rule>) -> BuildResult<Expression> {
    match pair.as_rule() {
        Rule::or_expr => build_connective(pair, ExpressionKind::Or),
        Rule::and_expr => build_connective(pair, ExpressionKind::And),
        Rule::negation => build_negation(pair),
        Rule::comparison => build_comparison(pair),
        Rule::null_check => build_null_check(pair),
        Rule::in_list => build_in_list(pair, false),
        Rule::not_in_list => build_in_list(pair, true),
        rule => Err(SyntaxError::at(
            format!("Unexpected rule in expression: {:?}", rule),
            pair.as_span(),
        )),
    }
}

/// Folds `a OP b OP c` into `((a OP b) OP c)`.
fn build_connective(
    pair: Pair<Rule>,
    combine: fn(Box<Expression>, Box<Expression>) -> ExpressionKind,
) -> BuildResult<Expression> {
    let pest_span = pair.as_span();
    let mut operands = pair.into_inner().filter(|p| {
        !matches!(
            p.as_rule(),
            Rule::kw_and | Rule::kw_or | Rule::lparen | Rule::rparen
        )
    });

    let first = operands.next().ok_or_else(|| {
        SyntaxError::at("Boolean expression without operands".to_string(), pest_span)
    })?;
    let mut expr = build_expression(first)?;

    for operand in operands {
        let right = build_expression(operand)?;
        let span = expr.span.to(right.span);
        expr = Expression::new(combine(Box::new(expr), Box::new(right)), span);
    }

    Ok(expr)
}

fn build_negation(pair: Pair<Rule>) -> BuildResult<Expression> {
    let span = pair_to_span(&pair);
    let pest_span = pair.as_span();
    let condition = pair
        .into_inner()
        .find(|p| p.as_rule() != Rule::kw_not)
        .ok_or_else(|| SyntaxError::at("NOT without condition".to_string(), pest_span))?;

    Ok(Expression::new(
        ExpressionKind::Not(Box::new(build_expression(condition)?)),
        span,
    ))
}

fn build_comparison(pair: Pair<Rule>) -> BuildResult<Expression> {
    let span = pair_to_span(&pair);
    let pest_span = pair.as_span();
    let mut inner = pair.into_inner();

    let left = build_column(&next_pair(&mut inner, pest_span, "column")?);

    let op_pair = next_pair(&mut inner, pest_span, "comparison operator")?;
    let operator = ComparisonOperator::from_symbol(op_pair.as_str()).ok_or_else(|| {
        SyntaxError::at(
            format!("Unknown comparison operator: {}", op_pair.as_str()),
            op_pair.as_span(),
        )
    })?;

    let right_pair = next_pair(&mut inner, pest_span, "comparison value")?;
    let right = match right_pair.as_rule() {
        Rule::name => Operand::Column(build_column(&right_pair)),
        _ => Operand::Literal(build_literal(right_pair)?),
    };

    Ok(Expression::new(
        ExpressionKind::Comparison {
            left,
            operator,
            right,
        },
        span,
    ))
}

fn build_null_check(pair: Pair<Rule>) -> BuildResult<Expression> {
    let span = pair_to_span(&pair);
    let pest_span = pair.as_span();
    let mut inner = pair.into_inner();

    let column = build_column(&next_pair(&mut inner, pest_span, "column")?);
    let check = next_pair(&mut inner, pest_span, "IS NULL or IS NOT NULL")?;

    Ok(Expression::new(
        ExpressionKind::NullCheck {
            column,
            negated: check.as_rule() == Rule::is_not_null,
        },
        span,
    ))
}

fn build_in_list(pair: Pair<Rule>, negated: bool) -> BuildResult<Expression> {
    let span = pair_to_span(&pair);
    let pest_span = pair.as_span();
    let mut inner = pair.into_inner();

    let column = build_column(&next_pair(&mut inner, pest_span, "column")?);
    let list = inner
        .find(|p| p.as_rule() == Rule::literal_list)
        .ok_or_else(|| SyntaxError::at("Missing value list".to_string(), pest_span))?;

    let values = list
        .into_inner()
        .filter(|p| matches!(p.as_rule(), Rule::number | Rule::string))
        .map(build_literal)
        .collect::<BuildResult<Vec<_>>>()?;

    Ok(Expression::new(
        ExpressionKind::InList {
            column,
            negated,
            values,
        },
        span,
    ))
}

fn build_column(pair: &Pair<Rule>) -> Column {
    // `name` is atomic and never includes the surrounding backticks
    Column::new(pair.as_str(), pair_to_span(pair))
}

fn build_literal(pair: Pair<Rule>) -> BuildResult<Literal> {
    match pair.as_rule() {
        Rule::number => Literal::from_number(pair.as_str()).ok_or_else(|| {
            SyntaxError::at(
                format!("Number out of range: {}", pair.as_str()),
                pair.as_span(),
            )
        }),
        Rule::string => Ok(Literal::String(parse_string_literal(pair))),
        rule => Err(SyntaxError::at(
            format!("Unexpected literal: {:?}", rule),
            pair.as_span(),
        )),
    }
}

/// Content between the quotes, escapes kept verbatim.
fn parse_string_literal(pair: Pair<Rule>) -> String {
    pair.into_inner()
        .next()
        .map(|chars| chars.as_str().to_string())
        .unwrap_or_default()
}

fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    parent: pest::Span<'i>,
    expected: &str,
) -> BuildResult<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| SyntaxError::at(format!("Missing {expected}"), parent))
}
