//! Expression evaluation implementation.

use crate::access::{ColumnCache, Value};
use crate::expression::pattern::like_match;
use crate::expression::{
    BinaryOperator, Expression, ExpressionError, ExpressionResult, UnaryOperator,
};

/// Operator applied at an internal node, unary or binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Binary(BinaryOperator),
    Unary(UnaryOperator),
}

impl Operator {
    fn as_str(&self) -> &'static str {
        match self {
            Operator::Binary(op) => op.as_str(),
            Operator::Unary(op) => op.as_str(),
        }
    }
}

/// Evaluator for expressions against the current contents of a column cache.
///
/// Evaluation never mutates the tree or the cache, so evaluating the same
/// expression twice against an unchanged cache yields the same result.
pub struct ExpressionEvaluator<'a> {
    cache: &'a ColumnCache,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(cache: &'a ColumnCache) -> Self {
        Self { cache }
    }

    /// Evaluate an expression and return the result
    pub fn evaluate(&self, expr: &Expression) -> ExpressionResult<Value> {
        match expr {
            Expression::Literal(lit) => Ok(lit.value.clone()),

            Expression::ColumnRef(col) => self.cache.lookup(&col.name, col.table.as_deref()),

            Expression::BinaryOp { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                self.evaluate_binary_op(*op, left_val, right_val)
            }

            Expression::UnaryOp { op, operand } => {
                let operand_val = self.evaluate(operand)?;
                self.apply(Operator::Unary(*op), operand_val, None)
            }
        }
    }

    /// Evaluate a binary operation
    fn evaluate_binary_op(
        &self,
        op: BinaryOperator,
        left: Value,
        right: Value,
    ) -> ExpressionResult<Value> {
        // <anything> <op> NULL is NULL, before any type check
        if right.is_null() {
            return Ok(Value::Null);
        }
        if !left.is_null() && left.data_type() != right.data_type() {
            return Err(ExpressionError::DifferentOperandType {
                left: left.data_type(),
                right: right.data_type(),
            });
        }
        self.apply(Operator::Binary(op), left, Some(right))
    }

    /// Dispatch on the left operand's type. For binary operators `right` is
    /// present and of the same type as `left`, unless `left` is NULL.
    fn apply(&self, op: Operator, left: Value, right: Option<Value>) -> ExpressionResult<Value> {
        match (left, right) {
            (Value::Null, _) => Ok(match op {
                Operator::Unary(UnaryOperator::IsNull) => Value::Bool(true),
                _ => Value::Null,
            }),

            (Value::Int(a), Some(Value::Int(b))) => Self::int_binary(op, a, b),
            (Value::Double(a), Some(Value::Double(b))) => Self::double_binary(op, a, b),
            (Value::Bool(a), Some(Value::Bool(b))) => match op {
                Operator::Binary(BinaryOperator::And) => Ok(Value::Bool(a && b)),
                Operator::Binary(BinaryOperator::Or) => Ok(Value::Bool(a || b)),
                Operator::Binary(BinaryOperator::Eq) => Ok(Value::Bool(a == b)),
                _ => Err(illegal(op, &Value::Bool(a))),
            },
            (Value::String(a), Some(Value::String(b))) => match op {
                Operator::Binary(BinaryOperator::Eq) => Ok(Value::Bool(a.eq_ignore_ascii_case(&b))),
                Operator::Binary(BinaryOperator::Ne) => {
                    Ok(Value::Bool(!a.eq_ignore_ascii_case(&b)))
                }
                Operator::Binary(BinaryOperator::Like) => Ok(Value::Bool(like_match(&a, &b))),
                _ => Err(illegal(op, &Value::String(a))),
            },

            (value, None) => match (op, value) {
                (Operator::Unary(UnaryOperator::IsNull), _) => Ok(Value::Bool(false)),
                (Operator::Unary(UnaryOperator::Neg), Value::Int(a)) => {
                    Ok(Value::Int(a.wrapping_neg()))
                }
                (Operator::Unary(UnaryOperator::Neg), Value::Double(a)) => Ok(Value::Double(-a)),
                (Operator::Unary(UnaryOperator::Not), Value::Bool(a)) => Ok(Value::Bool(!a)),
                (op, value) => Err(illegal(op, &value)),
            },

            // Operand types were checked to agree before dispatch
            (left, Some(right)) => Err(ExpressionError::DifferentOperandType {
                left: left.data_type(),
                right: right.data_type(),
            }),
        }
    }

    fn int_binary(op: Operator, a: i64, b: i64) -> ExpressionResult<Value> {
        let result = match op {
            Operator::Binary(BinaryOperator::Add) => Value::Int(a.wrapping_add(b)),
            Operator::Binary(BinaryOperator::Sub) => Value::Int(a.wrapping_sub(b)),
            Operator::Binary(BinaryOperator::Mul) => Value::Int(a.wrapping_mul(b)),
            Operator::Binary(BinaryOperator::Div) => {
                if b == 0 {
                    return Err(ExpressionError::DivisionByZero);
                }
                Value::Int(a.wrapping_div(b))
            }
            Operator::Binary(cmp) if cmp.is_comparison() => Value::Bool(compare(cmp, &a, &b)),
            _ => return Err(illegal(op, &Value::Int(a))),
        };
        Ok(result)
    }

    fn double_binary(op: Operator, a: f64, b: f64) -> ExpressionResult<Value> {
        let result = match op {
            Operator::Binary(BinaryOperator::Add) => Value::Double(a + b),
            Operator::Binary(BinaryOperator::Sub) => Value::Double(a - b),
            Operator::Binary(BinaryOperator::Mul) => Value::Double(a * b),
            Operator::Binary(BinaryOperator::Div) => Value::Double(a / b),
            Operator::Binary(cmp) if cmp.is_comparison() => Value::Bool(compare(cmp, &a, &b)),
            _ => return Err(illegal(op, &Value::Double(a))),
        };
        Ok(result)
    }
}

fn compare<T: PartialOrd>(op: BinaryOperator, a: &T, b: &T) -> bool {
    match op {
        BinaryOperator::Eq => a == b,
        BinaryOperator::Ne => a != b,
        BinaryOperator::Lt => a < b,
        BinaryOperator::Le => a <= b,
        BinaryOperator::Gt => a > b,
        BinaryOperator::Ge => a >= b,
        _ => false,
    }
}

fn illegal(op: Operator, operand: &Value) -> ExpressionError {
    ExpressionError::illegal(op.as_str(), operand)
}

/// Helper function to evaluate an expression against a column cache
pub fn evaluate_expression(expr: &Expression, cache: &ColumnCache) -> ExpressionResult<Value> {
    ExpressionEvaluator::new(cache).evaluate(expr)
}

/// Type alias for predicate functions
pub type Predicate = Box<dyn Fn(&ColumnCache) -> bool + Send + Sync + 'static>;

/// Helper function to create a predicate function from an expression
pub fn expression_to_predicate(expr: Expression) -> Predicate {
    Box::new(move |cache| {
        match evaluate_expression(&expr, cache) {
            Ok(Value::Bool(b)) => b,
            Ok(_) => false, // NULL and non-boolean results reject the row
            Err(_) => false,
        }
    })
}
