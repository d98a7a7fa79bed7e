//! # sqlstmt
//!
//! A small fluent SQL statement builder.
//!
//! Describe a query as tables, fields, joins and per-table predicate groups,
//! then render it into `?`-parameterized SQL plus the values to bind, in
//! placeholder order.
//!
//! ## Features
//!
//! - **Four grammars**: SELECT, INSERT (optionally `OR IGNORE`), UPDATE, DELETE, plus raw
//!   passthrough
//! - **Aligned parameters**: the Nth `?` always corresponds to the Nth value
//! - **Two-level conjunctions**: AND/OR inside a table's group and between table groups
//! - **Pure rendering**: `build()` never fails and never mutates the statement
//! - **SQLite execution** (feature `sqlite`): run statements through `rusqlite`
//! - **Query hooks**: observe or veto SQL before it runs; `tracing` integration
//!
//! ## Example
//!
//! ```rust
//! use sqlstmt::Condition;
//!
//! let mut q = sqlstmt::update();
//! q.table("Accounts")
//!     .set("Name", "Bob")
//!     .set("Email", "bob@example.com")
//!     .where_("Id", Condition::Equals, 1);
//!
//! let (sql, values) = q.build().into_parts();
//! assert_eq!(sql, "UPDATE Accounts SET Name=?, Email=? WHERE (Id=?)");
//! assert_eq!(values.len(), 3);
//! ```

pub mod client;
pub mod condition;
pub mod error;
pub mod join;
pub mod monitor;
pub mod prelude;
pub mod stmt;
pub mod table;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use client::{Database, ExecResult, Row};
pub use condition::{Condition, Conjunction, Constraint, ConstraintGroup};
pub use error::{StmtError, StmtResult};
pub use join::Join;
pub use monitor::{HookAction, QueryContext, QueryHook, QueryResult, QueryType};
pub use stmt::{Action, BuiltStatement, OrderDirection, Statement};
pub use table::Table;
pub use value::Value;

#[cfg(feature = "tracing")]
pub use monitor::TracingSqlHook;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteDb};

/// Create a SELECT statement.
pub fn select() -> Statement {
    Statement::select()
}

/// Create an INSERT statement.
pub fn insert() -> Statement {
    Statement::insert()
}

/// Create an UPDATE statement.
pub fn update() -> Statement {
    Statement::update()
}

/// Create a DELETE statement.
pub fn delete() -> Statement {
    Statement::delete()
}

/// Create a passthrough statement that builds to `sql` with no values.
pub fn raw(sql: impl Into<String>) -> Statement {
    Statement::raw(sql)
}
