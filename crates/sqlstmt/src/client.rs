//! Execution layer: anything that can run a rendered [`Statement`].

use crate::error::{StmtError, StmtResult};
use crate::stmt::Statement;
use crate::value::Value;
use std::sync::Arc;

/// One result row: column names shared across the result set plus values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Create a row. `values` is expected to be parallel to `columns`.
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Column names in select order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `idx`.
    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Value of the column named `name`.
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of the column named `name`, or a decode error.
    pub fn try_get(&self, name: &str) -> StmtResult<&Value> {
        self.get_by_name(name)
            .ok_or_else(|| StmtError::decode(name, "no such column"))
    }

    /// Consume the row, returning its values.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// Summary of an INSERT/UPDATE/DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecResult {
    /// Rows changed by the statement.
    pub rows_affected: u64,
    /// Row id of the most recent successful INSERT on the connection.
    pub last_insert_id: i64,
}

/// A database that consumes rendered statements.
///
/// Builders stay oblivious to the database: implementations call
/// [`Statement::build`] and bind the values to the `?` placeholders.
pub trait Database {
    /// Check whether a connection is currently held.
    fn is_open(&self) -> bool;

    /// Open the connection. Opening an open database is a no-op.
    fn open(&mut self) -> StmtResult<()>;

    /// Close the connection. Closing a closed database is a no-op.
    fn close(&mut self) -> StmtResult<()>;

    /// Run a statement and return all rows.
    fn query(&self, stmt: &Statement) -> StmtResult<Vec<Row>>;

    /// Run a statement and return the change summary.
    fn execute(&self, stmt: &Statement) -> StmtResult<ExecResult>;

    /// Run a statement and return the first row, if any.
    fn query_opt(&self, stmt: &Statement) -> StmtResult<Option<Row>> {
        Ok(self.query(stmt)?.into_iter().next())
    }

    /// Run a statement and return the first row.
    ///
    /// Returns `StmtError::Other` if no rows are returned.
    fn query_one(&self, stmt: &Statement) -> StmtResult<Row> {
        self.query_opt(stmt)?
            .ok_or_else(|| StmtError::Other("Expected 1 row, got 0".to_string()))
    }
}
