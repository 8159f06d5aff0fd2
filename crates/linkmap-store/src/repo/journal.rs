//! Write-statement journal
//!
//! When enabled, every statement a committed write executed is kept in
//! order, with its bound values. Rolled-back writes leave no trace.

use rusqlite::types::Value;

/// One executed write statement
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedStatement {
    pub table: &'static str,
    pub sql: String,
    pub params: Vec<Value>,
}

impl ExecutedStatement {
    /// True for INSERT/upsert statements
    pub fn is_insert(&self) -> bool {
        self.sql.starts_with("INSERT")
    }
}
