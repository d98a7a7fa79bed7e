//! SQLite execution layer backed by `rusqlite`.
//!
//! ```ignore
//! use sqlstmt::{Condition, Database, SqliteDb};
//!
//! let mut db = SqliteDb::new("game.db");
//! db.open()?;
//!
//! let mut q = sqlstmt::select();
//! q.from("Accounts").fields(["Name"]).where_("Id", Condition::Equals, 1);
//! let rows = db.query(&q)?;
//! ```

use crate::client::{Database, ExecResult, Row};
use crate::error::{StmtError, StmtResult};
use crate::monitor::{HookAction, QueryContext, QueryHook, QueryResult};
use crate::stmt::{BuiltStatement, Statement};
use crate::value::Value;
use rusqlite::{Connection, OpenFlags, params_from_iter};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Path that opens a private in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Configuration for [`SqliteDb`].
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// How long to wait on a locked database. `None` keeps SQLite's default.
    pub busy_timeout: Option<Duration>,
    /// Open the database read-only.
    pub read_only: bool,
    /// Create the database file if it does not exist (ignored when read-only).
    pub create_if_missing: bool,
    /// Queries slower than this are logged at WARN (with the `tracing` feature).
    pub slow_query_threshold: Option<Duration>,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout: None,
            read_only: false,
            create_if_missing: true,
            slow_query_threshold: None,
        }
    }
}

impl SqliteConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the busy timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }

    /// Open read-only.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Control whether a missing database file is created.
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Set the slow query threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    fn open_flags(&self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            base | OpenFlags::SQLITE_OPEN_READ_ONLY
        } else if self.create_if_missing {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
        } else {
            base | OpenFlags::SQLITE_OPEN_READ_WRITE
        }
    }
}

/// A path-addressed SQLite database that runs [`Statement`]s.
pub struct SqliteDb {
    path: PathBuf,
    config: SqliteConfig,
    conn: Option<Connection>,
    hooks: Vec<Arc<dyn QueryHook>>,
}

impl SqliteDb {
    /// Create a closed handle for the database at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: SqliteConfig::default(),
            conn: None,
            hooks: Vec::new(),
        }
    }

    /// Create a closed handle for a private in-memory database.
    pub fn in_memory() -> Self {
        Self::new(MEMORY_PATH)
    }

    /// Replace the configuration. Takes effect on the next `open`.
    pub fn with_config(mut self, config: SqliteConfig) -> Self {
        self.config = config;
        self
    }

    /// Install a query hook. Hooks run in installation order.
    pub fn with_hook(mut self, hook: impl QueryHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Database path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Active configuration.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Underlying connection, if open.
    pub fn conn(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    /// Render `stmt`, run hooks around `exec`, and report the outcome.
    fn run<T>(
        &self,
        stmt: &Statement,
        exec: impl FnOnce(&Connection, &BuiltStatement) -> StmtResult<T>,
        outcome: impl FnOnce(&T) -> QueryResult,
    ) -> StmtResult<T> {
        let conn = self.conn.as_ref().ok_or(StmtError::NotOpen)?;
        let built = stmt.build();
        let ctx = QueryContext::for_statement(stmt, &built);

        for hook in &self.hooks {
            if let HookAction::Abort(reason) = hook.before_query(&ctx) {
                return Err(StmtError::Aborted(reason));
            }
        }

        let start = Instant::now();
        let result = exec(conn, &built);
        let elapsed = start.elapsed();

        let summary = match &result {
            Ok(value) => outcome(value),
            Err(err) => QueryResult::error(err.to_string()),
        };
        for hook in &self.hooks {
            hook.after_query(&ctx, elapsed, &summary);
        }
        self.report_slow(&ctx, elapsed);

        result
    }

    /// A failed close hands the connection back; keep it so the handle stays
    /// open and `close` can be retried.
    fn settle_close(
        &mut self,
        result: Result<(), (Connection, rusqlite::Error)>,
    ) -> StmtResult<()> {
        if let Err((conn, err)) = result {
            self.conn = Some(conn);
            return Err(StmtError::Query(err));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "sqlstmt.sqlite",
            path = %self.path.display(),
            "closed database"
        );
        Ok(())
    }

    #[cfg(feature = "tracing")]
    fn report_slow(&self, ctx: &QueryContext, elapsed: Duration) {
        let threshold = self.config.slow_query_threshold;
        if threshold.is_some_and(|t| elapsed > t) {
            tracing::warn!(
                target: "sqlstmt.sql",
                query_type = ?ctx.query_type,
                duration_ms = elapsed.as_millis() as u64,
                sql = %ctx.sql,
                "slow query"
            );
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn report_slow(&self, _ctx: &QueryContext, _elapsed: Duration) {}
}

impl fmt::Debug for SqliteDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteDb")
            .field("path", &self.path)
            .field("config", &self.config)
            .field("open", &self.conn.is_some())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

fn read_rows(conn: &Connection, built: &BuiltStatement) -> StmtResult<Vec<Row>> {
    let mut prepared = conn.prepare(&built.sql)?;
    let columns: Arc<[String]> = prepared
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let mut rows = prepared.query(params_from_iter(built.values.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for idx in 0..columns.len() {
            values.push(Value::from(row.get_ref(idx)?));
        }
        out.push(Row::new(Arc::clone(&columns), values));
    }
    Ok(out)
}

impl Database for SqliteDb {
    fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    fn open(&mut self) -> StmtResult<()> {
        if self.is_open() {
            return Ok(());
        }
        let conn = Connection::open_with_flags(&self.path, self.config.open_flags()).map_err(|e| {
            StmtError::Connection(format!("{}: {e}", self.path.display()))
        })?;
        if let Some(timeout) = self.config.busy_timeout {
            conn.busy_timeout(timeout)?;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(target: "sqlstmt.sqlite", path = %self.path.display(), "opened database");

        self.conn = Some(conn);
        Ok(())
    }

    fn close(&mut self) -> StmtResult<()> {
        match self.conn.take() {
            Some(conn) => self.settle_close(conn.close()),
            None => Ok(()),
        }
    }

    fn query(&self, stmt: &Statement) -> StmtResult<Vec<Row>> {
        self.run(stmt, read_rows, |rows| QueryResult::Rows(rows.len()))
    }

    fn execute(&self, stmt: &Statement) -> StmtResult<ExecResult> {
        self.run(
            stmt,
            |conn, built| {
                let affected = conn.execute(&built.sql, params_from_iter(built.values.iter()))?;
                Ok(ExecResult {
                    rows_affected: affected as u64,
                    last_insert_id: conn.last_insert_rowid(),
                })
            },
            |res| QueryResult::Affected(res.rows_affected),
        )
    }
}
