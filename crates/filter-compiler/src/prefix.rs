use crate::{compiler::FilterCompiler, error::FilterError};
use filter_syntax::{Column, Expression, ExpressionKind, Literal, Operand};

/// Renders filters in fully parenthesized prefix (polish) notation, e.g.
/// `(AND (> Column<a> 1) (<= Column<b> 3))`.
pub struct PrefixCompiler;

impl FilterCompiler for PrefixCompiler {
    type Filter = String;

    fn compile(expr: &Expression) -> Result<Self::Filter, FilterError> {
        Ok(render(expr))
    }
}

/// Prefix notation of `expr`. Total over every parsed tree.
pub fn render(expr: &Expression) -> String {
    // Explicit work stack, chains fold into trees as deep as they are long.
    let mut out = String::new();
    let mut pending = vec![Step::Node(expr)];

    while let Some(step) = pending.pop() {
        match step {
            Step::Text(text) => out.push_str(text),
            Step::Node(node) => match &node.kind {
                ExpressionKind::And(left, right) => {
                    out.push_str("(AND ");
                    pending.extend([
                        Step::Text(")"),
                        Step::Node(right.as_ref()),
                        Step::Text(" "),
                        Step::Node(left.as_ref()),
                    ]);
                }
                ExpressionKind::Or(left, right) => {
                    out.push_str("(OR ");
                    pending.extend([
                        Step::Text(")"),
                        Step::Node(right.as_ref()),
                        Step::Text(" "),
                        Step::Node(left.as_ref()),
                    ]);
                }
                ExpressionKind::Not(operand) => {
                    out.push_str("(NOT ");
                    pending.extend([Step::Text(")"), Step::Node(operand.as_ref())]);
                }
                _ => out.push_str(&render_condition(node)),
            },
        }
    }

    out
}

enum Step<'e> {
    Node(&'e Expression),
    Text(&'static str),
}

fn render_condition(expr: &Expression) -> String {
    match &expr.kind {
        ExpressionKind::Comparison {
            left,
            operator,
            right,
        } => format_operation(operator.as_str(), &[format_column(left), format_operand(right)]),
        ExpressionKind::NullCheck { column, negated } => {
            let operator = if *negated { "NOTNULL" } else { "ISNULL" };
            format_operation(operator, &[format_column(column)])
        }
        ExpressionKind::InList {
            column,
            negated,
            values,
        } => {
            let operator = if *negated { "NOTIN" } else { "IN" };
            format_operation(operator, &[format_column(column), format_list(values)])
        }
        ExpressionKind::And(..) | ExpressionKind::Or(..) | ExpressionKind::Not(_) => {
            render(expr)
        }
    }
}

fn format_operation(operator: &str, operands: &[String]) -> String {
    format!("({} {})", operator, operands.join(" "))
}

fn format_column(column: &Column) -> String {
    format!("Column<{}>", column.name)
}

fn format_operand(operand: &Operand) -> String {
    match operand {
        Operand::Column(column) => format_column(column),
        Operand::Literal(literal) => literal.to_string(),
    }
}

fn format_list(values: &[Literal]) -> String {
    let members = values.iter().map(Literal::to_string).collect::<Vec<_>>();
    format!("[{}]", members.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filter_syntax::parse;

    #[test]
    fn test_render_keeps_list_order() {
        let expr = parse("a NOT IN (30, 10, 20, 10)").unwrap();
        assert_eq!(render(&expr), "(NOTIN Column<a> [30,10,20,10])");
    }

    #[test]
    fn test_render_nested_groups() {
        let expr = parse("NOT a = 1 OR (b IS NULL AND (c = 'x' OR d IN (1)))").unwrap();
        assert_eq!(
            render(&expr),
            "(OR (NOT (= Column<a> 1)) (AND (ISNULL Column<b>) (OR (= Column<c> 'x') (IN Column<d> [1]))))"
        );
    }

    #[test]
    fn test_render_float_forms() {
        let expr = parse("a = 5e2 OR b = -0.5").unwrap();
        assert_eq!(render(&expr), "(OR (= Column<a> 500.0) (= Column<b> -0.5))");
    }
}
