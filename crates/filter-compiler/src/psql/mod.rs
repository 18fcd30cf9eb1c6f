pub mod query;

pub use query::ReadQuery;

use crate::{compiler::FilterCompiler, error::FilterError};
use filter_syntax::{ComparisonOperator, Expression, ExpressionKind, Literal, Operand};

/// Renders filters as a PostgreSQL boolean condition for a `WHERE` clause.
pub struct PsqlCompiler;

impl FilterCompiler for PsqlCompiler {
    type Filter = String;

    fn compile(expr: &Expression) -> Result<Self::Filter, FilterError> {
        let mut r = Renderer::default();
        r.render_expr(expr);
        Ok(r.sql)
    }
}

/// Wraps an identifier in double quotes, doubling embedded quotes.
pub fn quote_identifier(ident: &str) -> String {
    format!(r#""{}""#, ident.replace('"', r#""""#))
}

/// Wraps a string in single quotes, doubling embedded quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[derive(Default)]
struct Renderer {
    sql: String,
}

impl Renderer {
    fn render_expr(&mut self, expr: &Expression) {
        // Explicit work stack, chains fold into trees as deep as they are long.
        let mut pending = vec![Step::Node(expr)];

        while let Some(step) = pending.pop() {
            match step {
                Step::Text(text) => self.sql.push_str(text),
                Step::Node(node) => match &node.kind {
                    ExpressionKind::Or(left, right) => {
                        pending.extend([
                            Step::Node(right.as_ref()),
                            Step::Text(" OR "),
                            Step::Node(left.as_ref()),
                        ]);
                    }
                    ExpressionKind::And(left, right) => {
                        push_and_operand(&mut pending, right);
                        pending.push(Step::Text(" AND "));
                        push_and_operand(&mut pending, left);
                    }
                    ExpressionKind::Not(operand) => {
                        self.sql.push_str("NOT ");
                        pending.push(Step::Node(operand.as_ref()));
                    }
                    _ => self.render_condition(node),
                },
            }
        }
    }

    fn render_condition(&mut self, expr: &Expression) {
        match &expr.kind {
            ExpressionKind::Comparison {
                left,
                operator,
                right,
            } => {
                self.sql.push_str(&quote_identifier(&left.name));
                self.sql.push(' ');
                self.sql.push_str(operator_symbol(*operator));
                self.sql.push(' ');
                match right {
                    Operand::Column(column) => self.sql.push_str(&quote_identifier(&column.name)),
                    Operand::Literal(literal) => self.render_literal(literal),
                }
            }
            ExpressionKind::NullCheck { column, negated } => {
                self.sql.push_str(&quote_identifier(&column.name));
                self.sql.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            ExpressionKind::InList {
                column,
                negated,
                values,
            } => {
                self.sql.push_str(&quote_identifier(&column.name));
                self.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.sql.push_str(", ");
                    }
                    self.render_literal(value);
                }
                self.sql.push(')');
            }
            ExpressionKind::And(..) | ExpressionKind::Or(..) | ExpressionKind::Not(_) => {
                self.render_expr(expr)
            }
        }
    }

    fn render_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::String(value) => self.sql.push_str(&quote_literal(value)),
            numeric => self.sql.push_str(&numeric.to_string()),
        }
    }
}

enum Step<'e> {
    Node(&'e Expression),
    Text(&'static str),
}

/// Pushes an AND operand in reverse rendering order. OR binds weaker than
/// AND, so disjunctions get parentheses.
fn push_and_operand<'e>(pending: &mut Vec<Step<'e>>, operand: &'e Expression) {
    if matches!(operand.kind, ExpressionKind::Or(..)) {
        pending.extend([Step::Text(")"), Step::Node(operand), Step::Text("(")]);
    } else {
        pending.push(Step::Node(operand));
    }
}

fn operator_symbol(operator: ComparisonOperator) -> &'static str {
    match operator {
        ComparisonOperator::NotEqual => "<>",
        other => other.as_str(),
    }
}
