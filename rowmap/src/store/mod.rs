//! Connection abstraction the engine executes statements through.
//!
//! A store only needs to run a query returning rows and a write returning an affected
//! row count. The SQLite adapter ([SqliteConnection]) is available with the `sqlite`
//! feature.

mod row;
#[cfg(feature = "sqlite")]
mod sqlite;

use crate::common::Value;
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

pub use row::*;
#[cfg(feature = "sqlite")]
pub use sqlite::*;

/// SQL flavour of a connection. Only the upsert keyword differs between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Sqlite,
    MySql,
}

impl Dialect {
    /// Statement head for an insert-or-replace write.
    pub fn upsert_keyword(&self) -> &'static str {
        match self {
            Dialect::Sqlite => "INSERT OR REPLACE INTO",
            Dialect::MySql => "REPLACE INTO",
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Sqlite => write!(f, "sqlite"),
            Dialect::MySql => write!(f, "mysql"),
        }
    }
}

impl FromStr for Dialect {
    type Err = RowMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "mysql" => Ok(Dialect::MySql),
            other => {
                log::error!("Unknown SQL dialect {}", other);
                Err(RowMapError::new(
                    &format!("Unknown SQL dialect {}", other),
                    ErrorKind::InvalidConfiguration,
                ))
            }
        }
    }
}

/// An already-open relational connection.
///
/// Implementations run one statement per call and report driver failures as
/// [ErrorKind::Execution] errors. They never retry.
pub trait SqlConnection {
    /// Runs a statement that returns rows.
    fn query(&self, sql: &str) -> RowMapResult<Vec<Row>>;

    /// Runs a write with positional `?` parameters and returns the affected row count.
    fn execute(&self, sql: &str, params: &[Value]) -> RowMapResult<usize>;

    fn dialect(&self) -> Dialect;
}

impl<C: SqlConnection + ?Sized> SqlConnection for &C {
    fn query(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        (**self).query(sql)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> RowMapResult<usize> {
        (**self).execute(sql, params)
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

impl<C: SqlConnection + ?Sized> SqlConnection for Box<C> {
    fn query(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        (**self).query(sql)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> RowMapResult<usize> {
        (**self).execute(sql, params)
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

impl<C: SqlConnection + ?Sized> SqlConnection for Arc<C> {
    fn query(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        (**self).query(sql)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> RowMapResult<usize> {
        (**self).execute(sql, params)
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}
