//! WHERE clause structures.
//!
//! A clause is a right-extending chain, not a general expression tree:
//! each node carries its own (column, operator, value) condition plus
//! optional AND and OR continuations. Evaluation order is fixed — AND
//! binds before OR at each link — and there is no grouping.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Comparison operators a clause can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Neq => "!=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
        }
    }

    /// Only equality resolves through an index; everything else falls
    /// back to a scan.
    pub fn is_equality(&self) -> bool {
        matches!(self, Operator::Eq)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One link of a WHERE chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and: Option<Box<WhereClause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or: Option<Box<WhereClause>>,
}

impl WhereClause {
    pub fn new(column: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            column: column.into(),
            operator,
            value,
            and: None,
            or: None,
        }
    }

    pub fn eq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Operator::Eq, value)
    }

    pub fn neq(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Operator::Neq, value)
    }

    pub fn lt(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Operator::Lt, value)
    }

    pub fn lte(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Operator::Lte, value)
    }

    pub fn gt(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Operator::Gt, value)
    }

    pub fn gte(column: impl Into<String>, value: Value) -> Self {
        Self::new(column, Operator::Gte, value)
    }

    /// Append a clause at the end of this node's AND chain.
    pub fn with_and(mut self, clause: WhereClause) -> Self {
        self.and = Some(Box::new(match self.and.take() {
            Some(existing) => existing.with_and(clause),
            None => clause,
        }));
        self
    }

    /// Append a clause at the end of this node's OR chain.
    pub fn with_or(mut self, clause: WhereClause) -> Self {
        self.or = Some(Box::new(match self.or.take() {
            Some(existing) => existing.with_or(clause),
            None => clause,
        }));
        self
    }

    fn fmt_level(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let pad = "  ".repeat(level);
        writeln!(f, "{}{} {} {}", pad, self.column, self.operator, self.value)?;
        if let Some(ref and) = self.and {
            writeln!(f, "{}AND", pad)?;
            and.fmt_level(f, level + 1)?;
        }
        if let Some(ref or) = self.or {
            writeln!(f, "{}OR", pad)?;
            or.fmt_level(f, level + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_level(f, 0)
    }
}
