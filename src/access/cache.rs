//! Column resolution cache.
//!
//! Holds the values of the row (or joined rows) currently being evaluated,
//! keyed by column name. The same column name may appear under several tables
//! during a join, so every name maps to an ordered list of `(table, value)`
//! entries.
//!
//! The cache is filled by row materialization before an expression is
//! evaluated and must be cleared before the next row is loaded; stale entries
//! would otherwise shadow or duplicate the new ones.

use crate::access::Value;
use crate::expression::{ExpressionError, ExpressionResult};
use log::trace;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
struct CacheEntry {
    table: String,
    value: Value,
}

/// Per-context mapping from column name to the current row's values
#[derive(Debug, Default, Clone)]
pub struct ColumnCache {
    columns: HashMap<String, Vec<CacheEntry>>,
}

impl ColumnCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `column` owned by `table`. Duplicates are kept.
    pub fn insert(&mut self, column: impl Into<String>, table: impl Into<String>, value: Value) {
        let column = column.into();
        let table = table.into();
        trace!("column cache insert {}.{} = {}", table, column, value);
        self.columns
            .entry(column)
            .or_default()
            .push(CacheEntry { table, value });
    }

    /// Load every column of one materialized row of `table`.
    pub fn insert_row<I, S>(&mut self, table: &str, row: I)
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        for (column, value) in row {
            self.insert(column, table, value);
        }
    }

    /// Remove every entry.
    pub fn clear_all(&mut self) {
        trace!("column cache clear all ({} entries)", self.len());
        self.columns.clear();
    }

    /// Remove the entries contributed by `table`, keeping all others.
    pub fn clear_table(&mut self, table: &str) {
        trace!("column cache clear table {}", table);
        self.columns.retain(|_, entries| {
            entries.retain(|entry| entry.table != table);
            !entries.is_empty()
        });
    }

    /// Resolve a column reference, optionally qualified by table name.
    ///
    /// An unqualified name must be unique across all cached tables.
    pub fn lookup(&self, column: &str, table: Option<&str>) -> ExpressionResult<Value> {
        let entries = match self.columns.get(column) {
            Some(entries) if !entries.is_empty() => entries,
            _ => return Err(unknown_column(column, table)),
        };

        if entries.len() > 1 && table.is_none() {
            return Err(ExpressionError::ColumnNotUnique {
                column: column.to_string(),
            });
        }

        entries
            .iter()
            .find(|entry| table.map_or(true, |t| entry.table == t))
            .map(|entry| entry.value.clone())
            .ok_or_else(|| unknown_column(column, table))
    }

    /// Total number of cached entries
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn unknown_column(column: &str, table: Option<&str>) -> ExpressionError {
    ExpressionError::UnknownColumn {
        column: column.to_string(),
        table: table.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined_cache() -> ColumnCache {
        let mut cache = ColumnCache::new();
        cache.insert("id", "t1", Value::Int(1));
        cache.insert("name", "t1", Value::String("alice".to_string()));
        cache.insert("id", "t2", Value::Int(2));
        cache.insert("price", "t2", Value::Double(9.5));
        cache
    }

    #[test]
    fn test_unique_lookup() {
        let cache = joined_cache();
        assert_eq!(
            cache.lookup("name", None).unwrap(),
            Value::String("alice".to_string())
        );
        assert_eq!(cache.lookup("price", Some("t2")).unwrap(), Value::Double(9.5));
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_ambiguous_lookup() {
        let cache = joined_cache();
        assert_eq!(
            cache.lookup("id", None),
            Err(ExpressionError::ColumnNotUnique {
                column: "id".to_string()
            })
        );
        assert_eq!(cache.lookup("id", Some("t1")).unwrap(), Value::Int(1));
        assert_eq!(cache.lookup("id", Some("t2")).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_unknown_column() {
        let cache = joined_cache();
        assert!(matches!(
            cache.lookup("missing", None),
            Err(ExpressionError::UnknownColumn { .. })
        ));
        // Column exists, but not under the requested table
        assert_eq!(
            cache.lookup("name", Some("t2")),
            Err(ExpressionError::UnknownColumn {
                column: "name".to_string(),
                table: Some("t2".to_string()),
            })
        );
    }

    #[test]
    fn test_duplicates_resolve_in_insertion_order() {
        let mut cache = ColumnCache::new();
        cache.insert("id", "t1", Value::Int(1));
        cache.insert("id", "t1", Value::Int(100));
        assert_eq!(cache.lookup("id", Some("t1")).unwrap(), Value::Int(1));
        assert!(matches!(
            cache.lookup("id", None),
            Err(ExpressionError::ColumnNotUnique { .. })
        ));
    }

    #[test]
    fn test_clear_table() {
        let mut cache = joined_cache();
        cache.clear_table("t1");

        assert!(matches!(
            cache.lookup("name", None),
            Err(ExpressionError::UnknownColumn { .. })
        ));
        // Only t2's id remains, so the bare name is unique again
        assert_eq!(cache.lookup("id", None).unwrap(), Value::Int(2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_clear_all() {
        let mut cache = joined_cache();
        cache.clear_all();
        assert!(cache.is_empty());
        assert!(cache.lookup("price", None).is_err());
    }

    #[test]
    fn test_insert_row() {
        let mut cache = ColumnCache::new();
        cache.insert_row(
            "users",
            vec![("id", Value::Int(7)), ("active", Value::Bool(true))],
        );
        assert_eq!(cache.lookup("id", Some("users")).unwrap(), Value::Int(7));
        assert_eq!(cache.lookup("active", None).unwrap(), Value::Bool(true));
    }
}
