//! WHERE clause resolution.
//!
//! A clause chain resolves to an ordered, duplicate-free id list. The
//! node's own condition resolves through the index matching the column's
//! declared type when the operator is equality; any other operator falls
//! back to a full scan with in-memory filtering. AND intersects with the
//! recursive resolution of its continuation (left order preserved), OR
//! unions with it (first-seen order, duplicates dropped).
//!
//! The resolver only sees the `IndexProvider` seam, so it can be exercised
//! against an in-memory fixture without a table on disk.

use std::collections::HashSet;

use serde_json::Value;

use crate::schema::id_key;

use super::clause::{Operator, WhereClause};
use super::errors::{QueryError, QueryResult};

/// What the resolver needs from the index layer.
pub trait IndexProvider {
    /// Ids matching `column = value`, via the index for the column's
    /// declared type.
    fn equality_candidates(&self, column: &str, value: &Value) -> QueryResult<Vec<String>>;

    /// Whether the column is declared at all.
    fn column_declared(&self, column: &str) -> bool;

    /// Every stored row, for the non-equality fallback.
    fn scan_rows(&self) -> QueryResult<Vec<Value>>;
}

/// Resolve a clause chain into candidate ids.
pub fn resolve<P: IndexProvider>(provider: &P, clause: &WhereClause) -> QueryResult<Vec<String>> {
    let mut ids = own_candidates(provider, clause)?;

    if let Some(ref and) = clause.and {
        let other: HashSet<String> = resolve(provider, and)?.into_iter().collect();
        ids.retain(|id| other.contains(id));
    }

    if let Some(ref or) = clause.or {
        let mut seen: HashSet<String> = ids.iter().cloned().collect();
        for id in resolve(provider, or)? {
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }

    Ok(ids)
}

/// Candidates for one node's own condition, duplicate-free.
fn own_candidates<P: IndexProvider>(
    provider: &P,
    clause: &WhereClause,
) -> QueryResult<Vec<String>> {
    let ids = if clause.operator.is_equality() {
        provider.equality_candidates(&clause.column, &clause.value)?
    } else {
        scan_candidates(provider, clause)?
    };
    Ok(dedup_preserving_order(ids))
}

/// Full-scan fallback for non-equality operators.
fn scan_candidates<P: IndexProvider>(
    provider: &P,
    clause: &WhereClause,
) -> QueryResult<Vec<String>> {
    if !provider.column_declared(&clause.column) {
        return Err(QueryError::unknown_column(&clause.column));
    }

    let mut ids = Vec::new();
    for row in provider.scan_rows()? {
        let matches = row
            .get(&clause.column)
            .map(|actual| value_matches(actual, clause.operator, &clause.value))
            .unwrap_or(false);
        if matches {
            if let Some(id) = row.get("id").and_then(id_key) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

/// Compare one field value against the clause value. No coercion: a
/// number never matches a string, and null matches nothing.
fn value_matches(actual: &Value, operator: Operator, expected: &Value) -> bool {
    if actual.is_null() {
        return false;
    }
    match operator {
        Operator::Eq => actual == expected,
        Operator::Neq => actual != expected,
        Operator::Lt => compare(actual, expected).map_or(false, |o| o.is_lt()),
        Operator::Lte => compare(actual, expected).map_or(false, |o| o.is_le()),
        Operator::Gt => compare(actual, expected).map_or(false, |o| o.is_gt()),
        Operator::Gte => compare(actual, expected).map_or(false, |o| o.is_ge()),
    }
}

/// Ordering for same-kind scalars: numeric for numbers, lexicographic for
/// strings. Mixed kinds do not order.
fn compare(actual: &Value, expected: &Value) -> Option<std::cmp::Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (a.as_f64()?, b.as_f64()?);
            a.partial_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
