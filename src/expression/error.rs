//! Error types for expression evaluation.

use crate::access::{DataType, Value};
use thiserror::Error;

/// Errors that can occur during expression evaluation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Binary operands are non-null and of different types
    #[error(
        "Different operand type in expression: left={}, right={}",
        type_name(.left),
        type_name(.right)
    )]
    DifferentOperandType {
        left: Option<DataType>,
        right: Option<DataType>,
    },

    /// Operator is not defined for the operand type
    #[error("Illegal operator {operator} for operand of type {}", type_name(.operand))]
    IllegalOperator {
        operator: String,
        operand: Option<DataType>,
    },

    #[error("Unimplemented yet: {feature}")]
    Unimplemented { feature: String },

    /// Unqualified column name matches more than one table
    #[error("Column name not unique: {column}")]
    ColumnNotUnique { column: String },

    #[error("Unknown column: {}", qualified_name(.table, .column))]
    UnknownColumn {
        column: String,
        table: Option<String>,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid LIKE pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ExpressionError {
    pub(crate) fn illegal(operator: &str, operand: &Value) -> Self {
        ExpressionError::IllegalOperator {
            operator: operator.to_string(),
            operand: operand.data_type(),
        }
    }
}

fn type_name(data_type: &Option<DataType>) -> String {
    match data_type {
        Some(data_type) => data_type.to_string(),
        None => "NULL".to_string(),
    }
}

fn qualified_name(table: &Option<String>, column: &str) -> String {
    match table {
        Some(table) => format!("{}.{}", table, column),
        None => column.to_string(),
    }
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExpressionError::DifferentOperandType {
            left: Some(DataType::Int),
            right: Some(DataType::Varchar),
        };
        assert_eq!(
            err.to_string(),
            "Different operand type in expression: left=INT, right=VARCHAR"
        );

        let err = ExpressionError::illegal("+", &Value::Bool(true));
        assert_eq!(
            err.to_string(),
            "Illegal operator + for operand of type BOOLEAN"
        );

        let err = ExpressionError::ColumnNotUnique {
            column: "id".to_string(),
        };
        assert_eq!(err.to_string(), "Column name not unique: id");

        let err = ExpressionError::UnknownColumn {
            column: "id".to_string(),
            table: Some("t1".to_string()),
        };
        assert_eq!(err.to_string(), "Unknown column: t1.id");

        let err = ExpressionError::UnknownColumn {
            column: "name".to_string(),
            table: None,
        };
        assert_eq!(err.to_string(), "Unknown column: name");

        assert_eq!(ExpressionError::DivisionByZero.to_string(), "Division by zero");
    }
}
