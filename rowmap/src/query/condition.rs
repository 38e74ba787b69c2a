use crate::common::{Convertible, SortOrder, Value};
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use crate::mapper::{describe, resolve, Entity, EntityDescriptor, Field, Textual};
use crate::query::{Operator, Predicate};
use itertools::Itertools;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

/// Creates an empty condition builder for entity `E`.
///
/// # Examples
///
/// ```rust,ignore
/// use rowmap::query::condition;
///
/// let query = condition::<User>()
///     .equals(User::CATEGORY, "admin")
///     .greater_than(User::AGE, 30)
///     .order_by(User::USER_NAME, true)
///     .limit(0, 10);
///
/// assert_eq!(
///     query.build()?,
///     "WHERE category = 'admin' AND age > 30 ORDER BY user_name ASC LIMIT 0,10"
/// );
/// ```
pub fn condition<E: Entity>() -> ConditionBuilder<E> {
    ConditionBuilder::new()
}

/// Fluent builder for the WHERE / GROUP BY / ORDER BY / LIMIT tail of a statement.
///
/// Predicates are joined with `AND` in the order they were added. Ordering, grouping and
/// pagination each hold a single clause and a later call replaces the earlier one.
///
/// Field tokens are resolved against the entity descriptor as they are added. A
/// resolution failure does not panic: the first error is kept, later calls become no-ops,
/// and the error is returned by [build](ConditionBuilder::build) and by every engine call
/// that consumes the builder, before any SQL is sent.
///
/// # Not injection-safe
///
/// Values are rendered as inline literals (see [Value::to_sql_literal]). Strings are
/// wrapped in single quotes without any escaping, so a value containing `'` produces
/// broken or injectable SQL. Only pass trusted values.
///
/// A null value turns `equals` / `not_equals` into `IS NULL` / `IS NOT NULL`. The ordering
/// comparisons render `NULL` as is and match no rows.
pub struct ConditionBuilder<E> {
    descriptor: Option<Arc<EntityDescriptor>>,
    predicates: Vec<Predicate>,
    order: Option<(String, SortOrder)>,
    group: Option<String>,
    limit: Option<(u64, u64)>,
    error: Option<RowMapError>,
    _marker: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for ConditionBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> ConditionBuilder<E> {
    pub fn new() -> Self {
        let (descriptor, error) = match describe::<E>() {
            Ok(descriptor) => (Some(descriptor), None),
            Err(err) => (None, Some(err)),
        };

        ConditionBuilder {
            descriptor,
            predicates: Vec::new(),
            order: None,
            group: None,
            limit: None,
            error,
            _marker: PhantomData,
        }
    }

    /// Adds `<column> = <value>`, or `<column> IS NULL` when the value is null.
    pub fn equals<V: Convertible>(self, field: Field<E, V>, value: impl Into<V>) -> Self {
        self.compare(field, Operator::Equals, value.into())
    }

    /// Adds `<column> <> <value>`, or `<column> IS NOT NULL` when the value is null.
    pub fn not_equals<V: Convertible>(self, field: Field<E, V>, value: impl Into<V>) -> Self {
        self.compare(field, Operator::NotEquals, value.into())
    }

    /// Adds `<column> > <value>`.
    pub fn greater_than<V: Convertible>(self, field: Field<E, V>, value: impl Into<V>) -> Self {
        self.compare(field, Operator::GreaterThan, value.into())
    }

    /// Adds `<column> >= <value>`.
    pub fn greater_or_equal<V: Convertible>(
        self,
        field: Field<E, V>,
        value: impl Into<V>,
    ) -> Self {
        self.compare(field, Operator::GreaterOrEqual, value.into())
    }

    /// Adds `<column> < <value>`.
    pub fn less_than<V: Convertible>(self, field: Field<E, V>, value: impl Into<V>) -> Self {
        self.compare(field, Operator::LessThan, value.into())
    }

    /// Adds `<column> <= <value>`.
    pub fn less_or_equal<V: Convertible>(self, field: Field<E, V>, value: impl Into<V>) -> Self {
        self.compare(field, Operator::LessOrEqual, value.into())
    }

    /// Adds `<column> LIKE '%<pattern>%'`.
    ///
    /// Only text fields accept a pattern. A `None` pattern records
    /// [ErrorKind::NullPattern].
    pub fn like<V: Textual>(mut self, field: Field<E, V>, pattern: Option<&str>) -> Self {
        let column = match self.column(field) {
            Some(column) => column,
            None => return self,
        };

        match pattern {
            Some(pattern) => {
                let literal = Value::String(format!("%{}%", pattern)).to_sql_literal();
                self.predicates
                    .push(Predicate::new(&column, Operator::Like, literal));
            }
            None => {
                log::error!("LIKE on {} was given no pattern", column);
                self.record(RowMapError::new(
                    &format!("LIKE on {} was given no pattern", column),
                    ErrorKind::NullPattern,
                ));
            }
        }
        self
    }

    /// Sets the ORDER BY clause, replacing any earlier one.
    pub fn order_by<V>(mut self, field: Field<E, V>, ascending: bool) -> Self {
        if let Some(column) = self.column(field) {
            self.order = Some((column, SortOrder::from_ascending(ascending)));
        }
        self
    }

    /// Sets the GROUP BY clause, replacing any earlier one.
    pub fn group_by<V>(mut self, field: Field<E, V>) -> Self {
        if let Some(column) = self.column(field) {
            self.group = Some(column);
        }
        self
    }

    /// Sets the LIMIT clause, replacing any earlier one.
    pub fn limit(mut self, offset: u64, count: u64) -> Self {
        self.limit = Some((offset, count));
        self
    }

    /// Serializes the builder into a SQL fragment.
    ///
    /// The fragment has the form
    /// `[WHERE p1 AND p2 ...][ GROUP BY (col)][ ORDER BY col ASC|DESC][ LIMIT offset,count]`
    /// with no leading space. An empty builder yields an empty string. Calling it again
    /// returns the same text.
    pub fn build(&self) -> RowMapResult<String> {
        self.check()?;

        Ok([
            self.where_clause(),
            self.group_clause(),
            self.order_clause(),
            self.limit_clause(),
        ]
        .into_iter()
        .flatten()
        .join(" "))
    }

    /// Returns the first recorded error, if any.
    pub fn check(&self) -> RowMapResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    pub fn error(&self) -> Option<&RowMapError> {
        self.error.as_ref()
    }

    pub fn has_group_by(&self) -> bool {
        self.group.is_some()
    }

    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    /// Raw grouping column, without the parentheses used in the clause.
    pub fn group_column(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn where_clause(&self) -> Option<String> {
        if self.predicates.is_empty() {
            return None;
        }
        Some(format!("WHERE {}", self.predicates.iter().join(" AND ")))
    }

    pub fn group_clause(&self) -> Option<String> {
        self.group
            .as_ref()
            .map(|column| format!("GROUP BY ({})", column))
    }

    pub fn order_clause(&self) -> Option<String> {
        self.order
            .as_ref()
            .map(|(column, order)| format!("ORDER BY {} {}", column, order.keyword()))
    }

    pub fn limit_clause(&self) -> Option<String> {
        self.limit
            .map(|(offset, count)| format!("LIMIT {},{}", offset, count))
    }

    pub(crate) fn descriptor(&self) -> RowMapResult<Arc<EntityDescriptor>> {
        self.check()?;
        match &self.descriptor {
            Some(descriptor) => Ok(descriptor.clone()),
            None => describe::<E>(),
        }
    }

    fn compare<V: Convertible>(mut self, field: Field<E, V>, operator: Operator, value: V) -> Self {
        let column = match self.column(field) {
            Some(column) => column,
            None => return self,
        };

        match value.to_value() {
            Ok(value) => {
                let operator = match operator {
                    Operator::Equals if value.is_null() => Operator::Is,
                    Operator::NotEquals if value.is_null() => Operator::IsNot,
                    other => other,
                };
                self.predicates
                    .push(Predicate::new(&column, operator, value.to_sql_literal()));
            }
            Err(err) => {
                log::error!("Value for {} cannot be rendered: {}", column, err);
                self.record(err)
            }
        }
        self
    }

    fn column<V>(&mut self, field: Field<E, V>) -> Option<String> {
        if self.error.is_some() {
            return None;
        }

        let resolved = match &self.descriptor {
            Some(descriptor) => resolve(field, descriptor).map(|c| c.to_string()),
            None => return None,
        };

        match resolved {
            Ok(column) => Some(column),
            Err(err) => {
                self.record(err);
                None
            }
        }
    }

    fn record(&mut self, err: RowMapError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl<E> Debug for ConditionBuilder<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConditionBuilder")
            .field("predicates", &self.predicates)
            .field("order", &self.order)
            .field("group", &self.group)
            .field("limit", &self.limit)
            .field("error", &self.error.as_ref().map(|e| e.message()))
            .finish()
    }
}
