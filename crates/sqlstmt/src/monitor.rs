//! Query hooks run by the execution layer around each statement.
//!
//! Hooks see the rendered SQL before it runs (and may veto it) and are told
//! how long it took afterwards. [`TracingSqlHook`] logs through `tracing`.

use crate::stmt::{Action, BuiltStatement, Statement};
use std::fmt;
use std::time::Duration;

/// Maximum length of error messages kept in [`QueryResult::Error`].
const MAX_ERROR_LEN: usize = 512;

/// Truncate to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
    /// Other SQL (e.g., DDL, pragmas)
    Other,
}

impl QueryType {
    /// Detect query type from the leading keyword of a SQL string.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start()
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or("");
        if keyword.eq_ignore_ascii_case("SELECT") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// Context information about the query being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// The SQL statement sent to the database.
    pub sql: String,
    /// Number of bound values.
    pub param_count: usize,
    /// Detected query type.
    pub query_type: QueryType,
    /// Optional query name/tag for identification.
    pub tag: Option<String>,
}

impl QueryContext {
    /// Create a new query context, detecting the type from the SQL text.
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
            tag: None,
        }
    }

    /// Create a context for a rendered statement.
    pub fn for_statement(stmt: &Statement, built: &BuiltStatement) -> Self {
        let query_type = match stmt.action() {
            Action::Select => QueryType::Select,
            Action::Insert => QueryType::Insert,
            Action::Update => QueryType::Update,
            Action::Delete => QueryType::Delete,
            Action::Raw => QueryType::from_sql(&built.sql),
        };
        Self {
            sql: built.sql.clone(),
            param_count: built.values.len(),
            query_type,
            tag: None,
        }
    }

    /// Add a tag to identify this query.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// Result of a query execution for monitoring purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Query returned rows.
    Rows(usize),
    /// Query affected rows (for mutations).
    Affected(u64),
    /// Query failed with an error (truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating long messages.
    pub fn error(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        if msg.len() > MAX_ERROR_LEN {
            return QueryResult::Error(format!("{}...", truncate_sql_bytes(&msg, MAX_ERROR_LEN)));
        }
        QueryResult::Error(msg)
    }
}

/// Action to take after a hook processes a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookAction {
    /// Run the query.
    Continue,
    /// Abort the query with an error.
    Abort(String),
}

/// Trait for hooking into the query execution lifecycle.
pub trait QueryHook: Send + Sync {
    /// Called before a query is executed.
    ///
    /// Return `HookAction::Abort` to cancel the query.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after a query completes (successfully or not).
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// `tracing::event!` on target `sqlstmt.sql` at a level chosen at runtime.
#[cfg(feature = "tracing")]
macro_rules! sql_event {
    ($level:expr, $($field:tt)+) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::event!(target: "sqlstmt.sql", tracing::Level::ERROR, $($field)+)
            }
            tracing::Level::WARN => {
                tracing::event!(target: "sqlstmt.sql", tracing::Level::WARN, $($field)+)
            }
            tracing::Level::INFO => {
                tracing::event!(target: "sqlstmt.sql", tracing::Level::INFO, $($field)+)
            }
            tracing::Level::DEBUG => {
                tracing::event!(target: "sqlstmt.sql", tracing::Level::DEBUG, $($field)+)
            }
            tracing::Level::TRACE => {
                tracing::event!(target: "sqlstmt.sql", tracing::Level::TRACE, $($field)+)
            }
        }
    };
}

/// Logs statements through `tracing` on target `sqlstmt.sql`.
///
/// Each statement is logged at `level` before it runs. Failures are always
/// logged at WARN; successful completions only with `log_completion`.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    pub level: tracing::Level,
    /// Byte limit for logged SQL; longer text is cut and suffixed with `...`.
    pub sql_limit: Option<usize>,
    pub log_completion: bool,
}

#[cfg(feature = "tracing")]
impl Default for TracingSqlHook {
    fn default() -> Self {
        Self::at(tracing::Level::DEBUG)
    }
}

#[cfg(feature = "tracing")]
impl TracingSqlHook {
    /// DEBUG level, SQL cut at 200 bytes, completions not logged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log at `level`.
    pub fn at(level: tracing::Level) -> Self {
        Self {
            level,
            sql_limit: Some(200),
            log_completion: false,
        }
    }

    /// Set the SQL byte limit. `None` logs SQL in full.
    pub fn sql_limit(mut self, limit: Option<usize>) -> Self {
        self.sql_limit = limit;
        self
    }

    /// Also log successful completions with their duration and outcome.
    pub fn log_completion(mut self, enabled: bool) -> Self {
        self.log_completion = enabled;
        self
    }

    fn display_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.sql_limit {
            Some(limit) if sql.len() > limit => {
                format!("{}...", truncate_sql_bytes(sql, limit)).into()
            }
            _ => sql.into(),
        }
    }

    /// Emit one event for `ctx`; `done` carries the duration and outcome
    /// once the statement has run.
    fn emit(&self, ctx: &QueryContext, done: Option<(Duration, &QueryResult)>) {
        use tracing::Level;

        let sql = self.display_sql(&ctx.sql);
        let tag = ctx.tag.as_deref().unwrap_or("-");

        let Some((duration, outcome)) = done else {
            sql_event!(
                self.level,
                query_type = ?ctx.query_type,
                tag,
                param_count = ctx.param_count,
                sql = %sql,
            );
            return;
        };

        let duration_ms = duration.as_millis() as u64;
        if let QueryResult::Error(message) = outcome {
            sql_event!(
                Level::WARN,
                query_type = ?ctx.query_type,
                tag,
                duration_ms,
                error = %message,
                sql = %sql,
                "statement failed"
            );
        } else if self.log_completion {
            sql_event!(
                self.level,
                query_type = ?ctx.query_type,
                tag,
                duration_ms,
                outcome = %outcome,
                "statement done"
            );
        }
    }
}

#[cfg(feature = "tracing")]
impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        self.emit(ctx, None);
        HookAction::Continue
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        self.emit(ctx, Some((duration, result)));
    }
}
