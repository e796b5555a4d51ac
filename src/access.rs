//! Access layer for row values during expression evaluation.
//!
//! - **Value**: the typed scalar every expression produces
//! - **DataType**: the type tag of a non-null value
//! - **ColumnCache**: the current row's values, keyed by column and table
//!
//! Row materialization fills the cache before each evaluation and clears it
//! (entirely or per table) before loading the next row.

pub mod cache;
pub mod value;

pub use cache::ColumnCache;
pub use value::{DataType, Value};
