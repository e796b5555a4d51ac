//! Expression AST definitions.

use crate::access::Value;
use crate::expression::operator::{BinaryOperator, UnaryOperator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column reference in an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Column name as written in the query
    pub name: String,
    /// Optional table qualifier (`t.name`)
    pub table: Option<String>,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: Some(table.into()),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: Value,
}

impl Literal {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn null() -> Self {
        Self { value: Value::Null }
    }

    pub fn bool(val: bool) -> Self {
        Self {
            value: Value::Bool(val),
        }
    }

    pub fn int(val: i64) -> Self {
        Self {
            value: Value::Int(val),
        }
    }

    pub fn double(val: f64) -> Self {
        Self {
            value: Value::Double(val),
        }
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self {
            value: Value::String(val.into()),
        }
    }
}

/// Expression tree node.
///
/// A node is either a term (literal or column reference) or an operator with
/// one or two owned children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Literal constant value
    Literal(Literal),

    /// Column reference, resolved against the column cache
    ColumnRef(ColumnRef),

    BinaryOp {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}

impl Expression {
    /// Create a literal expression
    pub fn literal(value: Value) -> Self {
        Expression::Literal(Literal::new(value))
    }

    pub fn int(val: i64) -> Self {
        Expression::Literal(Literal::int(val))
    }

    pub fn double(val: f64) -> Self {
        Expression::Literal(Literal::double(val))
    }

    pub fn string(val: impl Into<String>) -> Self {
        Expression::Literal(Literal::string(val))
    }

    pub fn bool(val: bool) -> Self {
        Expression::Literal(Literal::bool(val))
    }

    pub fn null() -> Self {
        Expression::Literal(Literal::null())
    }

    /// Create an unqualified column reference
    pub fn column(name: impl Into<String>) -> Self {
        Expression::ColumnRef(ColumnRef::new(name))
    }

    /// Create a `table.column` reference
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::ColumnRef(ColumnRef::qualified(table, name))
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a unary operation expression
    pub fn unary_op(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Or, left, right)
    }

    pub fn not_expr(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::Not, operand)
    }

    pub fn neg(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::Neg, operand)
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Eq, left, right)
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ne, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Lt, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Le, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Gt, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Ge, left, right)
    }

    pub fn add_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    pub fn sub_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Sub, left, right)
    }

    pub fn mul_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Mul, left, right)
    }

    pub fn div_expr(left: Expression, right: Expression) -> Self {
        Self::binary_op(BinaryOperator::Div, left, right)
    }

    /// Create a `subject LIKE pattern` expression
    pub fn like(subject: Expression, pattern: Expression) -> Self {
        Self::binary_op(BinaryOperator::Like, subject, pattern)
    }

    pub fn is_null(operand: Expression) -> Self {
        Self::unary_op(UnaryOperator::IsNull, operand)
    }

    /// Check if this expression is a constant (contains no column references)
    pub fn is_constant(&self) -> bool {
        match self {
            Expression::Literal(_) => true,
            Expression::ColumnRef(_) => false,
            Expression::BinaryOp { left, right, .. } => left.is_constant() && right.is_constant(),
            Expression::UnaryOp { operand, .. } => operand.is_constant(),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "{}", lit.value),
            Expression::ColumnRef(col) => write!(f, "{}", col),
            Expression::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expression::UnaryOp {
                op: UnaryOperator::IsNull,
                operand,
            } => write!(f, "({} IS NULL)", operand),
            Expression::UnaryOp {
                op: UnaryOperator::Neg,
                operand,
            } => write!(f, "-{}", operand),
            Expression::UnaryOp { op, operand } => write!(f, "({} {})", op, operand),
        }
    }
}
