//! Equality join between two named tables.

/// A `LEFT JOIN right ON right.right_field=left.left_field` pairing.
///
/// Created by [`Statement::join`](crate::Statement::join) with the two table
/// names; the fields are attached afterward with [`Join::on`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Join {
    pub left_table: String,
    pub left_field: String,
    pub right_table: String,
    pub right_field: String,
}

impl Join {
    pub(crate) fn new(left_table: impl Into<String>, right_table: impl Into<String>) -> Self {
        Self {
            left_table: left_table.into(),
            right_table: right_table.into(),
            ..Self::default()
        }
    }

    /// Set the join fields. Calling it again replaces the pairing.
    pub fn on(
        &mut self,
        left_field: impl Into<String>,
        right_field: impl Into<String>,
    ) -> &mut Self {
        self.left_field = left_field.into();
        self.right_field = right_field.into();
        self
    }

    pub(crate) fn render(&self, sql: &mut String) {
        sql.push_str(" LEFT JOIN ");
        sql.push_str(&self.right_table);
        sql.push_str(" ON ");
        sql.push_str(&self.right_table);
        sql.push('.');
        sql.push_str(&self.right_field);
        sql.push('=');
        sql.push_str(&self.left_table);
        sql.push('.');
        sql.push_str(&self.left_field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_left_join() {
        let mut join = Join::new("Accounts", "Characters");
        join.on("Id", "AccountId");
        let mut sql = String::new();
        join.render(&mut sql);
        assert_eq!(sql, " LEFT JOIN Characters ON Characters.AccountId=Accounts.Id");
    }

    #[test]
    fn test_on_replaces_fields() {
        let mut join = Join::new("a", "b");
        join.on("x", "y").on("id", "a_id");
        assert_eq!(join.left_field, "id");
        assert_eq!(join.right_field, "a_id");
    }
}
