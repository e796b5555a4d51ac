//! Expression evaluation for query execution.
//!
//! This module provides:
//! - Expression AST representation
//! - Operator semantics per value type, with NULL propagation
//! - `LIKE` pattern translation
//! - Expression evaluation against the column cache

pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;
pub mod pattern;

pub use error::{ExpressionError, ExpressionResult};
pub use eval::{evaluate_expression, expression_to_predicate, ExpressionEvaluator, Predicate};
pub use expr::{ColumnRef, Expression, Literal};
pub use operator::{BinaryOperator, UnaryOperator};
pub use pattern::{like_match, translate_like, LikePattern};
