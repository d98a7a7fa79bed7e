//! Predicate primitives: [`Condition`] operators, [`Conjunction`]s, and the
//! per-table [`ConstraintGroup`].

use crate::value::Value;
use std::fmt;

/// Comparison operator of a single-field predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// `=`
    Equals,
    /// `<>`
    NotEquals,
    /// `<`
    LessThan,
    /// `>`
    GreaterThan,
    /// `<=`
    LessThanOrEquals,
    /// `>=`
    GreaterThanOrEquals,
    /// `LIKE`
    Like,
    /// `NOT LIKE`
    NotLike,
    /// `IN`
    In,
    /// `NOT IN`
    NotIn,
    /// `BETWEEN`
    Between,
    /// `NOT BETWEEN`
    NotBetween,
    /// `IS NULL` (no operand)
    IsNull,
    /// `IS NOT NULL` (no operand)
    IsNotNull,
}

impl Condition {
    /// SQL text of the operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Condition::Equals => "=",
            Condition::NotEquals => "<>",
            Condition::LessThan => "<",
            Condition::GreaterThan => ">",
            Condition::LessThanOrEquals => "<=",
            Condition::GreaterThanOrEquals => ">=",
            Condition::Like => "LIKE",
            Condition::NotLike => "NOT LIKE",
            Condition::In => "IN",
            Condition::NotIn => "NOT IN",
            Condition::Between => "BETWEEN",
            Condition::NotBetween => "NOT BETWEEN",
            Condition::IsNull => "IS NULL",
            Condition::IsNotNull => "IS NOT NULL",
        }
    }

    /// Whether the operator binds a value. `IS NULL` / `IS NOT NULL` do not.
    pub const fn takes_operand(self) -> bool {
        !matches!(self, Condition::IsNull | Condition::IsNotNull)
    }

    /// Whether the operator is a keyword (needs surrounding spaces) rather than a symbol.
    const fn is_keyword(self) -> bool {
        !matches!(
            self,
            Condition::Equals
                | Condition::NotEquals
                | Condition::LessThan
                | Condition::GreaterThan
                | Condition::LessThanOrEquals
                | Condition::GreaterThanOrEquals
        )
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator between two predicates or two table groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Conjunction {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl Conjunction {
    /// SQL keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One single-field predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub field: String,
    pub condition: Condition,
    /// How this predicate joins the one before it. Ignored for the first predicate.
    pub conjunction: Conjunction,
    pub value: Value,
}

impl Constraint {
    /// Write `field<op>?` and push the bound value.
    ///
    /// `qualifier` prefixes the field as `qualifier.field`.
    pub(crate) fn render(
        &self,
        qualifier: Option<&str>,
        sql: &mut String,
        values: &mut Vec<Value>,
    ) {
        if let Some(table) = qualifier {
            sql.push_str(table);
            sql.push('.');
        }
        sql.push_str(&self.field);

        let keyword = self.condition.is_keyword();
        if keyword {
            sql.push(' ');
        }
        sql.push_str(self.condition.as_str());

        if self.condition.takes_operand() {
            if keyword {
                sql.push(' ');
            }
            sql.push('?');
            values.push(self.value.clone());
        }
    }
}

/// Ordered, conjunction-linked predicates belonging to one table.
///
/// Predicates are only ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintGroup {
    constraints: Vec<Constraint>,
}

impl ConstraintGroup {
    /// Create an empty group.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        &mut self,
        field: impl Into<String>,
        condition: Condition,
        conjunction: Conjunction,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.constraints.push(Constraint {
            field: field.into(),
            condition,
            conjunction,
            value: value.into(),
        });
        self
    }

    /// Append a predicate joined with `AND`.
    pub fn and(
        &mut self,
        field: impl Into<String>,
        condition: Condition,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(field, condition, Conjunction::And, value)
    }

    /// Append a predicate joined with `OR`.
    pub fn or(
        &mut self,
        field: impl Into<String>,
        condition: Condition,
        value: impl Into<Value>,
    ) -> &mut Self {
        self.push(field, condition, Conjunction::Or, value)
    }

    /// Check if no predicate has been added.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Number of predicates.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Predicates in append order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of values this group binds when rendered.
    pub fn param_count(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| c.condition.takes_operand())
            .count()
    }

    /// Write the predicates (without surrounding parentheses).
    pub(crate) fn render(
        &self,
        qualifier: Option<&str>,
        sql: &mut String,
        values: &mut Vec<Value>,
    ) {
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                sql.push(' ');
                sql.push_str(constraint.conjunction.as_str());
                sql.push(' ');
            }
            constraint.render(qualifier, sql, values);
        }
    }
}
