use crate::ast::{column::Column, literal::Literal, operator::ComparisonOperator, span::Span};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Expression { kind, span }
    }

    /// Whether this node is a single condition without boolean combinator.
    pub fn is_simple_condition(&self) -> bool {
        matches!(
            self.kind,
            ExpressionKind::Comparison { .. }
                | ExpressionKind::NullCheck { .. }
                | ExpressionKind::InList { .. }
        )
    }

    /// Direct children of this node, left to right.
    pub fn children(&self) -> Vec<&Expression> {
        match &self.kind {
            ExpressionKind::And(left, right) | ExpressionKind::Or(left, right) => {
                vec![left.as_ref(), right.as_ref()]
            }
            ExpressionKind::Not(operand) => vec![operand.as_ref()],
            _ => Vec::new(),
        }
    }

    /// First node in pre-order for which `predicate` holds.
    pub fn find<P>(&self, predicate: &P) -> Option<&Expression>
    where
        P: Fn(&Expression) -> bool,
    {
        // Chains fold into trees as deep as they are long, so no recursion.
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if predicate(node) {
                return Some(node);
            }
            pending.extend(node.children().into_iter().rev());
        }
        None
    }

    /// Moves the boxed children out, leaving a childless node behind.
    fn detach_children(&mut self, out: &mut Vec<Box<Expression>>) {
        if self.is_simple_condition() {
            return;
        }
        let leaf = ExpressionKind::NullCheck {
            column: Column::new("", self.span),
            negated: false,
        };
        match std::mem::replace(&mut self.kind, leaf) {
            ExpressionKind::And(left, right) | ExpressionKind::Or(left, right) => {
                out.push(left);
                out.push(right);
            }
            ExpressionKind::Not(operand) => out.push(operand),
            _ => {}
        }
    }
}

/// Drops long chains without one stack frame per node.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut child) = pending.pop() {
            child.detach_children(&mut pending);
        }
    }
}

/// Syntax tree node kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExpressionKind {
    /// `column <op> value`, where value may be another column
    Comparison {
        left: Column,
        operator: ComparisonOperator,
        right: Operand,
    },
    /// `column IS NULL`, or `column IS NOT NULL` when `negated`
    NullCheck { column: Column, negated: bool },
    /// `column IN (...)`, or `column NOT IN (...)` when `negated`
    InList {
        column: Column,
        negated: bool,
        values: Vec<Literal>,
    },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

/// Right hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Operand {
    Column(Column),
    Literal(Literal),
}
