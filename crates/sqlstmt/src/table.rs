//! Per-table accumulation of fields, values and predicates.

use crate::condition::{Condition, Conjunction, ConstraintGroup};
use crate::value::Value;

/// A table referenced by a [`Statement`](crate::Statement).
///
/// # Example
///
/// ```rust
/// use sqlstmt::{Condition, Value};
///
/// let mut stmt = sqlstmt::update();
/// stmt.table("Accounts")
///     .set("Name", "Bob")
///     .where_("Id", Condition::Equals, 1);
/// let built = stmt.build();
/// assert_eq!(built.sql, "UPDATE Accounts SET Name=? WHERE (Id=?)");
/// assert_eq!(built.values, vec![Value::from("Bob"), Value::from(1)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    fields: Vec<String>,
    values: Vec<Value>,
    constraints: ConstraintGroup,
    conjunction: Conjunction,
}

impl Table {
    pub(crate) fn new(name: impl Into<String>, conjunction: Conjunction) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            values: Vec::new(),
            constraints: ConstraintGroup::new(),
            conjunction,
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in first-seen order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    /// Bound values in call order.
    pub fn bound_values(&self) -> &[Value] {
        &self.values
    }

    /// This table's predicates.
    pub fn constraints(&self) -> &ConstraintGroup {
        &self.constraints
    }

    /// How this table's WHERE group joins the previous table's group.
    pub fn conjunction(&self) -> Conjunction {
        self.conjunction
    }

    /// Check whether `name` is already in the field list.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Append fields, skipping names already present.
    pub fn fields<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if !self.has_field(&name) {
                self.fields.push(name);
            }
        }
        self
    }

    /// Append bulk values (INSERT), in the same order as the fields.
    pub fn values<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values.extend(values.into_iter().map(Into::into));
        self
    }

    /// Append a field/value pair (UPDATE).
    ///
    /// The pair is always added together, even if `field` is already present,
    /// so fields and values stay index-aligned.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.push(field.into());
        self.values.push(value.into());
        self
    }

    /// Alias for [`Table::and_where`].
    pub fn where_(
        &mut self,
        field: impl Into<String>,
        condition: Condition,
        value: impl Into<Value>,
    ) -> &mut ConstraintGroup {
        self.and_where(field, condition, value)
    }

    /// Append a predicate joined with `AND`; returns the group for chaining.
    pub fn and_where(
        &mut self,
        field: impl Into<String>,
        condition: Condition,
        value: impl Into<Value>,
    ) -> &mut ConstraintGroup {
        self.constraints.and(field, condition, value)
    }

    /// Append a predicate joined with `OR`; returns the group for chaining.
    pub fn or_where(
        &mut self,
        field: impl Into<String>,
        condition: Condition,
        value: impl Into<Value>,
    ) -> &mut ConstraintGroup {
        self.constraints.or(field, condition, value)
    }
}
