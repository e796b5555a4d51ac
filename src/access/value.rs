use crate::expression::{ExpressionError, ExpressionResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data types a non-null value can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Double,
    Varchar,
    Boolean,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "INT",
            DataType::Double => "DOUBLE",
            DataType::Varchar => "VARCHAR",
            DataType::Boolean => "BOOLEAN",
        };
        f.write_str(name)
    }
}

/// A single SQL scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Double(f64),
    String(String),
    Bool(bool),
    Null,
}

impl Value {
    /// Get the data type of this value, `None` for NULL
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Int(_) => Some(DataType::Int),
            Value::Double(_) => Some(DataType::Double),
            Value::String(_) => Some(DataType::Varchar),
            Value::Bool(_) => Some(DataType::Boolean),
            Value::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Ordering used by sort operators.
    ///
    /// NULL on either side is incomparable and yields `false` rather than an
    /// error, so NULL rows keep their relative position.
    pub fn less_than(&self, other: &Value) -> ExpressionResult<bool> {
        if self.is_null() || other.is_null() {
            return Ok(false);
        }
        if self.data_type() != other.data_type() {
            return Err(self.mismatch(other));
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a < b),
            (Value::Double(a), Value::Double(b)) => Ok(a < b),
            _ => Err(ExpressionError::illegal("<", self)),
        }
    }

    /// Add `other` into this accumulator. NULL on either side leaves the
    /// accumulator untouched.
    pub fn accumulate_add(&mut self, other: &Value) -> ExpressionResult<()> {
        if self.is_null() || other.is_null() {
            return Ok(());
        }
        if self.data_type() != other.data_type() {
            return Err(self.mismatch(other));
        }
        match (self, other) {
            (Value::Int(acc), Value::Int(v)) => {
                *acc = acc.wrapping_add(*v);
                Ok(())
            }
            (Value::Double(acc), Value::Double(v)) => {
                *acc += v;
                Ok(())
            }
            (acc, _) => Err(ExpressionError::illegal("+", acc)),
        }
    }

    /// Divide an accumulated sum by a row count, as AVG does.
    ///
    /// Integers are promoted to DOUBLE before dividing.
    pub fn divide_by_count(&mut self, count: usize) -> ExpressionResult<()> {
        match self {
            Value::Null => Ok(()),
            Value::Int(sum) => {
                let avg = *sum as f64 / count as f64;
                *self = Value::Double(avg);
                Ok(())
            }
            Value::Double(sum) => {
                *sum /= count as f64;
                Ok(())
            }
            _ => Err(ExpressionError::illegal("/", self)),
        }
    }

    fn mismatch(&self, other: &Value) -> ExpressionError {
        ExpressionError::DifferentOperandType {
            left: self.data_type(),
            right: other.data_type(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Double(d) => write!(f, "{:?}", d),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Bool(true) => f.write_str("TRUE"),
            Value::Bool(false) => f.write_str("FALSE"),
            Value::Null => f.write_str("NULL"),
        }
    }
}
