use crate::common::{Convertible, Value};
use crate::engine_config::EngineConfig;
use crate::errors::{ErrorCategory, ErrorKind, RowMapError, RowMapResult};
use crate::mapper::{
    describe, from_partial_row, from_row, key_value, to_row, Entity, EntityDescriptor,
};
use crate::query::ConditionBuilder;
use crate::repository::statement::{
    count_statement, delete_statement, insert_statement, select_statement, update_statement,
    upsert_statement,
};
use crate::repository::WriteResult;
use crate::store::{Dialect, Row, SqlConnection};
use std::collections::HashMap;

/// Generic CRUD operations for any [Entity] over one connection.
///
/// Every call issues at most one statement. Mapping and query-build errors are returned
/// before anything is sent to the store. A failing read returns an
/// [ErrorKind::Execution] error carrying the statement, unless the store could not map a
/// returned value, which keeps its mapping kind. A failing write returns a
/// [WriteResult] with zero affected rows and the error attached.
///
/// # Examples
///
/// ```rust,ignore
/// use rowmap::query::condition;
/// use rowmap::repository::CrudEngine;
/// use rowmap::store::SqliteConnection;
///
/// let engine = CrudEngine::new(SqliteConnection::open_in_memory()?);
/// engine.insert(&user)?;
/// let admins: Vec<User> = engine.select_where(condition::<User>().equals(User::ROLE, "admin"))?;
/// ```
pub struct CrudEngine<C> {
    connection: C,
    config: EngineConfig,
}

impl<C: SqlConnection> CrudEngine<C> {
    /// Creates an engine with default settings.
    pub fn new(connection: C) -> Self {
        CrudEngine::with_config(connection, EngineConfig::new())
    }

    pub fn with_config(connection: C, config: EngineConfig) -> Self {
        CrudEngine { connection, config }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Dialect in effect: the configured override, else the connection's own.
    pub fn dialect(&self) -> Dialect {
        self.config
            .dialect()
            .unwrap_or_else(|| self.connection.dialect())
    }

    /// Fetches every row of the entity's table.
    pub fn select_all<E: Entity>(&self) -> RowMapResult<Vec<E>> {
        let descriptor = describe::<E>()?;
        let sql = select_statement(descriptor.table_name(), "");
        self.fetch(&sql, &descriptor, from_row)
    }

    /// Fetches the rows matching `condition`.
    ///
    /// A grouped condition fails with [ErrorKind::GroupedSelect]; use
    /// [count_by_group](CrudEngine::count_by_group) instead.
    pub fn select_where<E: Entity>(&self, condition: ConditionBuilder<E>) -> RowMapResult<Vec<E>> {
        let descriptor = condition.descriptor()?;
        if condition.has_group_by() {
            log::error!(
                "Grouped condition cannot select entities of {}",
                descriptor.table_name()
            );
            return Err(RowMapError::new(
                &format!(
                    "Grouped condition cannot select entities of {}",
                    descriptor.table_name()
                ),
                ErrorKind::GroupedSelect,
            ));
        }

        let sql = select_statement(descriptor.table_name(), &condition.build()?);
        self.fetch(&sql, &descriptor, from_row)
    }

    /// Fetches the first row matching `condition`.
    ///
    /// Adds `LIMIT 0,1` unless the condition already carries a limit.
    pub fn select_one<E: Entity>(&self, condition: ConditionBuilder<E>) -> RowMapResult<Option<E>> {
        let condition = if condition.has_limit() {
            condition
        } else {
            condition.limit(0, 1)
        };
        Ok(self.select_where(condition)?.into_iter().next())
    }

    /// Counts rows per distinct value of the condition's grouping column.
    ///
    /// Fails with [ErrorKind::NoGroupBy] when the condition has no grouping.
    pub fn count_by_group<E: Entity>(
        &self,
        condition: ConditionBuilder<E>,
    ) -> RowMapResult<HashMap<Value, i64>> {
        let descriptor = condition.descriptor()?;
        let group_column = match condition.group_column() {
            Some(column) => column,
            None => {
                log::error!(
                    "Grouped count on {} needs a GROUP BY column",
                    descriptor.table_name()
                );
                return Err(RowMapError::new(
                    &format!(
                        "Grouped count on {} needs a GROUP BY column",
                        descriptor.table_name()
                    ),
                    ErrorKind::NoGroupBy,
                ));
            }
        };

        let sql = count_statement(descriptor.table_name(), group_column, &condition.build()?);
        let rows = self.run_query(&sql)?;

        let mut counts = HashMap::with_capacity(rows.len());
        for row in rows {
            let key = row.get(group_column).cloned().unwrap_or_default();
            let count = match row.get("count") {
                Some(value) => i64::from_value(value).inspect_err(|err| {
                    log::error!("Grouped count is not an integer: {}", err);
                })?,
                None => {
                    log::error!("Grouped count result has no count column");
                    return Err(RowMapError::new(
                        "Grouped count result has no count column",
                        ErrorKind::ObjectMapping,
                    ));
                }
            };
            counts.insert(key, count);
        }
        Ok(counts)
    }

    /// Inserts `entity`. The entity must declare a primary key.
    pub fn insert<E: Entity>(&self, entity: &E) -> RowMapResult<WriteResult> {
        let descriptor = describe::<E>()?;
        descriptor.primary_key_column()?;

        let (columns, params) = split_row(to_row(entity, &descriptor)?);
        let sql = insert_statement(descriptor.table_name(), &column_refs(&columns));
        Ok(self.run_write(&sql, &params))
    }

    /// Updates the row whose primary key matches `entity`, writing every persistent field.
    pub fn update<E: Entity>(&self, entity: &E) -> RowMapResult<WriteResult> {
        let descriptor = describe::<E>()?;
        let primary_key = descriptor.primary_key_column()?;

        let (columns, mut params) = split_row(to_row(entity, &descriptor)?);
        params.push(key_value(entity, &descriptor)?);
        let sql = update_statement(descriptor.table_name(), &column_refs(&columns), primary_key);
        Ok(self.run_write(&sql, &params))
    }

    /// Inserts `entity`, replacing any row with the same primary key.
    pub fn upsert<E: Entity>(&self, entity: &E) -> RowMapResult<WriteResult> {
        let descriptor = describe::<E>()?;
        descriptor.primary_key_column()?;

        let (columns, params) = split_row(to_row(entity, &descriptor)?);
        let sql = upsert_statement(
            self.dialect(),
            descriptor.table_name(),
            &column_refs(&columns),
        );
        Ok(self.run_write(&sql, &params))
    }

    /// Deletes the rows matching `condition`. An empty condition deletes every row.
    pub fn delete_where<E: Entity>(&self, condition: ConditionBuilder<E>) -> RowMapResult<WriteResult> {
        let descriptor = condition.descriptor()?;
        let sql = delete_statement(descriptor.table_name(), &condition.build()?);
        Ok(self.run_write(&sql, &[]))
    }

    /// Runs a hand-written query and returns the raw rows.
    pub fn query_raw(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        self.run_query(sql)
    }

    /// Runs a hand-written query and maps each row to `E`. No primary key is needed.
    ///
    /// The query may project a subset of the entity's columns. Fields whose column is not
    /// selected keep their default.
    pub fn select_raw<E: Entity>(&self, sql: &str) -> RowMapResult<Vec<E>> {
        let descriptor = describe::<E>()?;
        self.fetch(sql, &descriptor, from_partial_row)
    }

    fn fetch<E: Entity>(
        &self,
        sql: &str,
        descriptor: &EntityDescriptor,
        map: fn(&Row, &EntityDescriptor) -> RowMapResult<E>,
    ) -> RowMapResult<Vec<E>> {
        self.run_query(sql)?
            .iter()
            .map(|row| map(row, descriptor))
            .collect()
    }

    fn run_query(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        self.trace(sql, &[]);
        self.connection.query(sql).map_err(|err| {
            log::error!("Query failed: {} ({})", sql, err);
            if err.category() == ErrorCategory::Mapping {
                err
            } else {
                RowMapError::execution(sql, err)
            }
        })
    }

    fn run_write(&self, sql: &str, params: &[Value]) -> WriteResult {
        self.trace(sql, params);
        match self.connection.execute(sql, params) {
            Ok(affected) => {
                if affected == 0 {
                    log::warn!("Write affected no rows: {}", sql);
                }
                WriteResult::new(affected)
            }
            Err(err) => {
                log::error!("Write failed: {} ({})", sql, err);
                WriteResult::failed(RowMapError::execution(sql, err))
            }
        }
    }

    fn trace(&self, sql: &str, params: &[Value]) {
        if self.config.log_statements() {
            if params.is_empty() {
                log::debug!("{}", sql);
            } else {
                log::debug!("{} {:?}", sql, params);
            }
        }
    }
}

fn split_row(row: Vec<(String, Value)>) -> (Vec<String>, Vec<Value>) {
    row.into_iter().unzip()
}

fn column_refs(columns: &[String]) -> Vec<&str> {
    columns.iter().map(String::as_str).collect()
}
