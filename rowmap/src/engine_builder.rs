use crate::engine_config::EngineConfig;
use crate::errors::{RowMapError, RowMapResult};
use crate::repository::CrudEngine;
use crate::store::{Dialect, SqlConnection};

/// Builder for a [CrudEngine].
///
/// Configuration errors do not interrupt the chain. The first one is kept and returned
/// by [open](CrudEngineBuilder::open).
///
/// # Examples
///
/// ```rust,ignore
/// use rowmap::engine_builder::CrudEngineBuilder;
/// use rowmap::store::SqliteConnection;
///
/// let engine = CrudEngineBuilder::new()
///     .log_statements(true)
///     .open(SqliteConnection::open_in_memory()?)?;
/// ```
#[derive(Default)]
pub struct CrudEngineBuilder {
    error: Option<RowMapError>,
    config: EngineConfig,
}

impl CrudEngineBuilder {
    pub fn new() -> Self {
        CrudEngineBuilder {
            error: None,
            config: EngineConfig::new(),
        }
    }

    /// Logs every generated statement at debug level.
    pub fn log_statements(self, enabled: bool) -> Self {
        self.config.set_log_statements(enabled);
        self
    }

    /// Overrides the dialect reported by the connection.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_dialect(dialect) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Overrides the dialect by name (`sqlite` or `mysql`).
    pub fn dialect_name(mut self, name: &str) -> Self {
        if self.error.is_none() {
            match name.parse::<Dialect>() {
                Ok(dialect) => return self.dialect(dialect),
                Err(e) => self.error = Some(e),
            }
        }
        self
    }

    /// Creates the engine over an already-open connection.
    pub fn open<C: SqlConnection>(self, connection: C) -> RowMapResult<CrudEngine<C>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(CrudEngine::with_config(connection, self.config))
    }
}
