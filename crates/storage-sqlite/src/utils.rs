//! Utility functions for SQLite storage operations.
//!
//! This module provides helpers for working with SQLite: chunking utilities
//! to avoid parameter limits and the TEXT encoding of decimal amounts.

use std::str::FromStr;

use rust_decimal::Decimal;
use xportfoy_core::errors::{DatabaseError, Error, Result};

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite has a compile-time limit on the number of parameters in a SQL statement,
/// typically around 999 (SQLITE_MAX_VARIABLE_NUMBER). To stay safely under this limit
/// and leave room for other parameters in the query, we use 500 as our chunk size.
///
/// Any query that uses `IN (...)` with a potentially large list of IDs should use
/// `chunk_for_sqlite` to split the list into manageable chunks.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into smaller slices for batch SQLite queries.
///
/// This function splits a slice into chunks of size `SQLITE_MAX_PARAMS_CHUNK` (500),
/// which can be used to safely execute multiple queries with `IN (...)` clauses
/// without exceeding SQLite's parameter limits.
///
/// # Example
///
/// ```ignore
/// let mut counts = HashMap::new();
/// for chunk in chunk_for_sqlite(&portfolio_ids) {
///     counts.extend(count_with_in_clause(chunk)?);
/// }
/// ```
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Parses a decimal stored as TEXT.
///
/// Scientific notation is accepted for rows written by external tools. A
/// value that cannot be parsed is a corrupted row, not a zero.
pub fn parse_decimal(value: &str, field: &str) -> Result<Decimal> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "invalid decimal in column {}: '{}' ({})",
                field, value, e
            )))
        })
}

/// Canonical TEXT encoding of a decimal amount.
pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}
