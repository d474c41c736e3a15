//! Schema metadata provider for completion candidates
//!
//! This module provides the trait the completion driver uses to look up
//! keyspace, table and column names, plus the ranking applied to what it
//! offers.

use std::cmp::Ordering;

use crate::error::Result;

/// Trait for providing schema names
///
/// Errors are not fatal to completion; the driver reports them back to its
/// caller and offers nothing at that position.
pub trait SchemaProvider {
    /// Get every keyspace name
    fn keyspaces(&self) -> Result<Vec<String>>;

    /// Get table names of a keyspace
    fn tables(&self, keyspace: &str) -> Result<Vec<String>>;

    /// Get column names of a table, in declaration order
    fn columns(&self, keyspace: &str, table: &str) -> Result<Vec<String>>;
}

/// Order candidates for display
///
/// Sort candidates intelligently:
/// 1. Shorter before longer (closest completion first)
/// 2. Alphabetically for same length
pub fn rank(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Sort, de-duplicate and drop empty entries
pub fn rank_candidates(mut items: Vec<String>) -> Vec<String> {
    items.retain(|item| !item.is_empty());
    items.sort_by(|a, b| rank(a, b));
    items.dedup();
    items
}
