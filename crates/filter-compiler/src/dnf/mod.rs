pub mod condition;

pub use condition::{Conjunction, Dnf, DnfCondition, DnfOperator, DnfValue};

use crate::{compiler::FilterCompiler, error::FilterError, prefix};
use filter_syntax::{Expression, ExpressionKind, Operand};
use tracing::{debug, trace};

const TARGET: &str = "DNF";

/// Compiles filters into disjunctive normal form for predicate pushdown
/// into columnar readers.
///
/// Only trees that already are an OR of ANDs of simple conditions are
/// accepted. No rewriting (distribution, De Morgan) takes place.
pub struct DnfCompiler;

impl FilterCompiler for DnfCompiler {
    type Filter = Dnf;

    fn compile(expr: &Expression) -> Result<Self::Filter, FilterError> {
        // Negation is reported before any structural problem.
        if let Some(negation) = expr.find(&|e: &Expression| matches!(e.kind, ExpressionKind::Not(_))) {
            let expression = prefix::render(negation);
            debug!(%expression, "Negation rejected for DNF");
            return Err(FilterError::UnsupportedOperator {
                operator: "NOT".to_string(),
                target: TARGET,
                expression,
            });
        }

        let mut disjuncts = Vec::new();
        collect_operands(expr, Connective::Or, &mut disjuncts);

        let dnf = disjuncts
            .into_iter()
            .map(compile_conjunction)
            .collect::<Result<Dnf, _>>()?;

        debug!(groups = dnf.len(), "Compiled DNF filter");
        Ok(dnf)
    }
}

#[derive(Clone, Copy)]
enum Connective {
    And,
    Or,
}

/// Operands of a chain of the same connective, left to right.
fn collect_operands<'e>(expr: &'e Expression, connective: Connective, out: &mut Vec<&'e Expression>) {
    let mut pending = vec![expr];
    while let Some(node) = pending.pop() {
        match (&node.kind, connective) {
            (ExpressionKind::Or(left, right), Connective::Or)
            | (ExpressionKind::And(left, right), Connective::And) => {
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }
            _ => out.push(node),
        }
    }
}

fn compile_conjunction(expr: &Expression) -> Result<Conjunction, FilterError> {
    let mut operands = Vec::new();
    collect_operands(expr, Connective::And, &mut operands);
    trace!(conditions = operands.len(), "Compiling conjunction");

    operands
        .into_iter()
        .map(|operand| {
            if operand.is_simple_condition() {
                compile_condition(operand)
            } else {
                Err(structure_error("disjunction inside a conjunction", expr))
            }
        })
        .collect()
}

fn compile_condition(expr: &Expression) -> Result<DnfCondition, FilterError> {
    match &expr.kind {
        ExpressionKind::Comparison {
            left,
            operator,
            right,
        } => match right {
            Operand::Literal(value) => Ok(DnfCondition::new(
                left.name.as_str(),
                DnfOperator::from(*operator),
                value.clone(),
            )),
            Operand::Column(_) => Err(structure_error("comparison between two columns", expr)),
        },
        ExpressionKind::NullCheck { column, negated } => {
            let operator = if *negated {
                DnfOperator::NotEqual
            } else {
                DnfOperator::Equal
            };
            Ok(DnfCondition::new(column.name.as_str(), operator, DnfValue::NULL))
        }
        ExpressionKind::InList {
            column,
            negated,
            values,
        } => {
            let operator = if *negated {
                DnfOperator::NotIn
            } else {
                DnfOperator::In
            };
            Ok(DnfCondition::new(
                column.name.as_str(),
                operator,
                DnfValue::set(values.iter().cloned()),
            ))
        }
        _ => Err(structure_error("expected a simple condition", expr)),
    }
}

fn structure_error(reason: &str, expr: &Expression) -> FilterError {
    let expression = prefix::render(expr);
    debug!(reason, %expression, "Structure rejected for DNF");
    FilterError::Structure {
        reason: reason.to_string(),
        target: TARGET,
        expression,
    }
}
