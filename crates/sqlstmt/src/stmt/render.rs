//! Rendering of the four statement grammars.
//!
//! Every function appends to one `sql` buffer and one `values` list in
//! lockstep: each `?` written is matched by exactly one pushed value.

use super::{Action, BuiltStatement, Statement};
use crate::table::Table;
use crate::value::Value;

/// Writes `, ` before every item but the first.
struct Separator {
    first: bool,
}

impl Separator {
    fn new() -> Self {
        Self { first: true }
    }

    fn write(&mut self, sql: &mut String) {
        if self.first {
            self.first = false;
        } else {
            sql.push_str(", ");
        }
    }
}

impl Statement {
    pub(super) fn render(&self) -> BuiltStatement {
        if self.action == Action::Raw {
            return BuiltStatement {
                sql: self.raw_text.clone().unwrap_or_default(),
                values: Vec::new(),
            };
        }

        let mut sql = String::with_capacity(128);
        let mut values = Vec::new();
        match self.action {
            Action::Select => self.render_select(&mut sql, &mut values),
            Action::Insert => self.render_insert(&mut sql, &mut values),
            Action::Update => self.render_update(&mut sql, &mut values),
            Action::Delete => self.render_delete(&mut sql, &mut values),
            Action::Raw => {}
        }
        BuiltStatement { sql, values }
    }

    fn qualifier<'a>(&self, table: &'a Table) -> Option<&'a str> {
        self.qualify_columns.then(|| table.name())
    }

    fn write_table_names(&self, sql: &mut String) {
        let mut sep = Separator::new();
        for table in &self.tables {
            sep.write(sql);
            sql.push_str(table.name());
        }
    }

    /// ` WHERE (a=? OR b=?) AND (c=?)`, or nothing when no table has predicates.
    ///
    /// Every table gets a group, `()` when it has no predicates, unless
    /// `skip_empty_where_groups` is set.
    fn render_where(&self, sql: &mut String, values: &mut Vec<Value>) {
        if !self.has_constraints() {
            return;
        }
        sql.push_str(" WHERE ");

        let mut first = true;
        for table in &self.tables {
            if self.skip_empty_where_groups && table.constraints().is_empty() {
                continue;
            }
            if !first {
                sql.push(' ');
                sql.push_str(table.conjunction().as_str());
                sql.push(' ');
            }
            first = false;

            sql.push('(');
            table
                .constraints()
                .render(self.qualifier(table), sql, values);
            sql.push(')');
        }
    }

    fn render_select(&self, sql: &mut String, values: &mut Vec<Value>) {
        sql.push_str("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        let mut sep = Separator::new();
        for table in &self.tables {
            for field in table.field_names() {
                sep.write(sql);
                sql.push_str(table.name());
                sql.push('.');
                sql.push_str(field);
            }
        }

        sql.push_str(" FROM ");
        let mut sep = Separator::new();
        for table in &self.tables {
            if self.exclude_join_targets && self.is_join(table.name()) {
                continue;
            }
            sep.write(sql);
            sql.push_str(table.name());
        }

        for join in &self.joins {
            join.render(sql);
        }

        self.render_where(sql, values);

        if let Some(ref field) = self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(field);
            if let Some(direction) = self.order_direction {
                sql.push(' ');
                sql.push_str(direction.as_str());
            }
        }

        if self.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", self.limit));
        }
        if self.offset > 0 {
            sql.push_str(&format!(" OFFSET {}", self.offset));
        }
    }

    fn render_insert(&self, sql: &mut String, values: &mut Vec<Value>) {
        if self.ignore {
            sql.push_str("INSERT OR IGNORE INTO ");
        } else {
            sql.push_str("INSERT INTO ");
        }
        self.write_table_names(sql);

        sql.push_str(" (");
        let mut sep = Separator::new();
        for table in &self.tables {
            for field in table.field_names() {
                sep.write(sql);
                sql.push_str(field);
            }
        }

        sql.push_str(") VALUES (");
        let mut sep = Separator::new();
        for table in &self.tables {
            for _ in table.field_names() {
                sep.write(sql);
                sql.push('?');
            }
            values.extend_from_slice(table.bound_values());
        }
        sql.push(')');
    }

    fn render_update(&self, sql: &mut String, values: &mut Vec<Value>) {
        sql.push_str("UPDATE ");
        self.write_table_names(sql);

        sql.push_str(" SET ");
        let mut sep = Separator::new();
        for table in &self.tables {
            let qualifier = self.qualifier(table);
            for (j, field) in table.field_names().iter().enumerate() {
                sep.write(sql);
                if let Some(name) = qualifier {
                    sql.push_str(name);
                    sql.push('.');
                }
                sql.push_str(field);
                sql.push_str("=?");
                // A field without a paired value binds NULL so placeholders stay aligned.
                values.push(table.bound_values().get(j).cloned().unwrap_or_default());
            }
        }

        self.render_where(sql, values);
    }

    fn render_delete(&self, sql: &mut String, values: &mut Vec<Value>) {
        sql.push_str("DELETE FROM ");
        self.write_table_names(sql);
        self.render_where(sql, values);
    }
}
