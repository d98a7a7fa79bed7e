//! Convenient imports for typical `sqlstmt` usage.
//!
//! ```ignore
//! use sqlstmt::prelude::*;
//! ```

pub use crate::{
    Action, Condition, Conjunction, Database, StmtError, StmtResult, Statement, Value, delete,
    insert, raw, select, update,
};

#[cfg(feature = "sqlite")]
pub use crate::{SqliteConfig, SqliteDb};
