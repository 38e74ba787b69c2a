use crate::common::{Value, TIMESTAMP_FORMAT};
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use crate::store::{Dialect, Row, SqlConnection};
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

/// [SqlConnection] over a `rusqlite` connection.
///
/// Booleans are stored as 0/1 integers and timestamps as `YYYY-MM-DD HH:MM:SS[.fff]` text,
/// which the entity mapper coerces back on read. BLOB columns are reported through
/// [Row::put_unmapped] instead of a value.
pub struct SqliteConnection {
    connection: Connection,
}

impl SqliteConnection {
    pub fn open_in_memory() -> RowMapResult<Self> {
        let connection = Connection::open_in_memory()?;
        Ok(SqliteConnection { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> RowMapResult<Self> {
        let connection = Connection::open(path)?;
        Ok(SqliteConnection { connection })
    }

    /// Wraps a connection the caller opened and configured.
    pub fn from_connection(connection: Connection) -> Self {
        SqliteConnection { connection }
    }

    /// Runs one or more semicolon-separated statements, typically DDL.
    pub fn execute_batch(&self, sql: &str) -> RowMapResult<()> {
        self.connection.execute_batch(sql)?;
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn into_inner(self) -> Connection {
        self.connection
    }
}

impl SqlConnection for SqliteConnection {
    fn query(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        let mut statement = self.connection.prepare(sql)?;
        let columns: Vec<String> = statement
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = statement.query([])?;
        let mut result = Vec::new();
        while let Some(sqlite_row) = rows.next()? {
            let mut row = Row::with_capacity(columns.len());
            for (index, column) in columns.iter().enumerate() {
                match from_sqlite(sqlite_row.get_ref(index)?)? {
                    Some(value) => row.put(column, value),
                    None => row.put_unmapped(column),
                }
            }
            result.push(row);
        }
        Ok(result)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> RowMapResult<usize> {
        let affected = self
            .connection
            .execute(sql, params_from_iter(params.iter().map(to_sqlite)))?;
        Ok(affected)
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }
}

fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Bool(b) => SqliteValue::Integer(*b as i64),
        Value::I32(i) => SqliteValue::Integer(*i as i64),
        Value::I64(i) => SqliteValue::Integer(*i),
        Value::F64(f) => SqliteValue::Real(*f),
        Value::String(s) => SqliteValue::Text(s.clone()),
        Value::Timestamp(ts) => SqliteValue::Text(ts.format(TIMESTAMP_FORMAT).to_string()),
    }
}

fn from_sqlite(value: ValueRef<'_>) -> RowMapResult<Option<Value>> {
    match value {
        ValueRef::Null => Ok(Some(Value::Null)),
        ValueRef::Integer(i) => Ok(Some(Value::I64(i))),
        ValueRef::Real(f) => Ok(Some(Value::F64(f))),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(Some(Value::String(text.to_string()))),
            Err(err) => Err(RowMapError::new(
                &format!("Text column is not valid UTF-8: {}", err),
                ErrorKind::ObjectMapping,
            )),
        },
        ValueRef::Blob(_) => Ok(None),
    }
}
