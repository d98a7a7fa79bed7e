//! The root [`Statement`] and its accretion operations.
//!
//! A statement is built up incrementally through `&mut` handles and rendered
//! with [`Statement::build`]:
//!
//! ```rust
//! use sqlstmt::{Condition, Conjunction};
//!
//! let mut stmt = sqlstmt::select();
//! stmt.from("Accounts")
//!     .fields(["Name", "Email"])
//!     .where_("Name", Condition::Equals, "Bob")
//!     .or("Name", Condition::Equals, "Alice");
//! stmt.also_from("Characters", Conjunction::And)
//!     .fields(["Name", "Class"])
//!     .where_("Class", Condition::Equals, "Warrior");
//! stmt.join("Accounts", "Characters").on("Id", "AccountId");
//!
//! let built = stmt.build();
//! assert!(built.sql.starts_with("SELECT Accounts.Name, Accounts.Email"));
//! assert_eq!(built.values.len(), 3);
//! ```

mod render;

use crate::condition::Conjunction;
use crate::join::Join;
use crate::table::Table;
use crate::value::Value;
use std::fmt;

/// Statement kind. Selects the grammar used by [`Statement::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    Select,
    Insert,
    Update,
    Delete,
    /// Hand-written SQL passed through untouched.
    Raw,
}

impl Action {
    /// Leading SQL keyword (`RAW` for passthrough statements).
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Select => "SELECT",
            Action::Insert => "INSERT",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::Raw => "RAW",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderDirection {
    Ascending,
    Descending,
}

impl OrderDirection {
    /// SQL keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderDirection::Ascending => "ASC",
            OrderDirection::Descending => "DESC",
        }
    }
}

/// Rendered SQL text and its positional values.
///
/// The Nth `?` in `sql` corresponds to `values[N]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuiltStatement {
    pub sql: String,
    pub values: Vec<Value>,
}

impl BuiltStatement {
    /// Split into `(sql, values)`.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }
}

impl From<BuiltStatement> for (String, Vec<Value>) {
    fn from(built: BuiltStatement) -> Self {
        built.into_parts()
    }
}

/// Root query descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    action: Action,
    raw_text: Option<String>,
    tables: Vec<Table>,
    joins: Vec<Join>,
    order_by: Option<String>,
    order_direction: Option<OrderDirection>,
    limit: u64,
    offset: u64,
    ignore: bool,
    distinct: bool,
    qualify_columns: bool,
    exclude_join_targets: bool,
    skip_empty_where_groups: bool,
}

impl Statement {
    /// Create an empty statement of the given kind.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            raw_text: None,
            tables: Vec::new(),
            joins: Vec::new(),
            order_by: None,
            order_direction: None,
            limit: 0,
            offset: 0,
            ignore: false,
            distinct: false,
            qualify_columns: false,
            exclude_join_targets: false,
            skip_empty_where_groups: false,
        }
    }

    /// Create a SELECT statement.
    pub fn select() -> Self {
        Self::new(Action::Select)
    }

    /// Create an INSERT statement.
    pub fn insert() -> Self {
        Self::new(Action::Insert)
    }

    /// Create an UPDATE statement.
    pub fn update() -> Self {
        Self::new(Action::Update)
    }

    /// Create a DELETE statement.
    pub fn delete() -> Self {
        Self::new(Action::Delete)
    }

    /// Create a passthrough statement. `build` returns `sql` with no values and
    /// ignores everything else configured on the statement.
    pub fn raw(sql: impl Into<String>) -> Self {
        let mut stmt = Self::new(Action::Raw);
        stmt.raw_text = Some(sql.into());
        stmt
    }

    // ==================== Accessors ====================

    /// Statement kind.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Passthrough SQL, for [`Action::Raw`] statements.
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    /// Tables in first-referenced order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Joins in creation order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Look up a table without creating it.
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    // ==================== Tables & joins ====================

    fn pick_table(&mut self, name: &str, conjunction: Conjunction) -> &mut Table {
        let idx = match self.tables.iter().position(|t| t.name() == name) {
            Some(idx) => idx,
            None => {
                self.tables.push(Table::new(name, conjunction));
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx]
    }

    /// Get the table named `name`, creating it (joined with `AND`) if absent.
    pub fn table(&mut self, name: &str) -> &mut Table {
        self.pick_table(name, Conjunction::And)
    }

    /// Alias for [`Statement::table`].
    pub fn from(&mut self, name: &str) -> &mut Table {
        self.table(name)
    }

    /// Alias for [`Statement::table`].
    pub fn to(&mut self, name: &str) -> &mut Table {
        self.table(name)
    }

    /// Like [`Statement::table`], but a newly created table joins the previous
    /// table's WHERE group with `conjunction`.
    ///
    /// An existing table is returned unchanged; its conjunction is fixed by
    /// whichever call created it.
    pub fn also_from(&mut self, name: &str, conjunction: Conjunction) -> &mut Table {
        self.pick_table(name, conjunction)
    }

    /// Append a `LEFT JOIN right_table` and return it for [`Join::on`].
    pub fn join(&mut self, left_table: &str, right_table: &str) -> &mut Join {
        self.joins.push(Join::new(left_table, right_table));
        let last = self.joins.len() - 1;
        &mut self.joins[last]
    }

    /// Check whether `table_name` is the target of some join.
    ///
    /// With [`Statement::exclude_join_targets`] enabled, such tables appear only
    /// in their `LEFT JOIN` clause and are left out of the `FROM` list.
    pub fn is_join(&self, table_name: &str) -> bool {
        self.joins.iter().any(|j| j.right_table == table_name)
    }

    /// Check whether any table has predicates.
    pub fn has_constraints(&self) -> bool {
        self.tables.iter().any(|t| !t.constraints().is_empty())
    }

    // ==================== Modifiers ====================

    /// ORDER BY `field` with no explicit direction.
    pub fn order_by(&mut self, field: impl Into<String>) -> &mut Self {
        self.order_by = Some(field.into());
        self.order_direction = None;
        self
    }

    /// ORDER BY `field` ASC.
    pub fn order_ascending(&mut self, field: impl Into<String>) -> &mut Self {
        self.order_by = Some(field.into());
        self.order_direction = Some(OrderDirection::Ascending);
        self
    }

    /// ORDER BY `field` DESC.
    pub fn order_descending(&mut self, field: impl Into<String>) -> &mut Self {
        self.order_by = Some(field.into());
        self.order_direction = Some(OrderDirection::Descending);
        self
    }

    /// Set LIMIT and OFFSET. Zero omits the clause.
    pub fn limit(&mut self, limit: u64, offset: u64) -> &mut Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    pub fn paginate(&mut self, page: u64, per_page: u64) -> &mut Self {
        let page = page.max(1);
        self.limit(per_page, (page - 1) * per_page)
    }

    /// SELECT DISTINCT.
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// INSERT OR IGNORE.
    pub fn ignore(&mut self) -> &mut Self {
        self.ignore = true;
        self
    }

    /// Render WHERE and SET columns as `table.field`.
    pub fn qualify_columns(&mut self, qualify: bool) -> &mut Self {
        self.qualify_columns = qualify;
        self
    }

    /// Leave join targets out of the SELECT `FROM` list.
    ///
    /// Off by default: every table is listed in `FROM`, join targets included.
    pub fn exclude_join_targets(&mut self, exclude: bool) -> &mut Self {
        self.exclude_join_targets = exclude;
        self
    }

    /// Leave tables without predicates out of the WHERE clause.
    ///
    /// Off by default: such a table renders an empty `()` group preceded by
    /// its conjunction.
    pub fn skip_empty_where_groups(&mut self, skip: bool) -> &mut Self {
        self.skip_empty_where_groups = skip;
        self
    }

    // ==================== Build ====================

    /// Render the statement into SQL text and positional values.
    ///
    /// Pure: calling it repeatedly yields the same result. No validation is
    /// performed; unknown names or mismatched counts pass straight through.
    pub fn build(&self) -> BuiltStatement {
        let built = self.render();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            target: "sqlstmt.build",
            action = %self.action,
            tables = self.tables.len(),
            param_count = built.values.len(),
            sql = %built.sql,
        );

        built
    }

    /// Get the rendered SQL string (for debugging).
    pub fn to_sql(&self) -> String {
        self.render().sql
    }
}
