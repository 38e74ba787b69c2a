//! Configuration of a [CrudEngine](crate::repository::CrudEngine).

use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use crate::store::Dialect;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Engine settings.
///
/// Cloning is cheap and all clones share the same settings.
///
/// - `log_statements`: emit every generated statement at debug level.
/// - `dialect`: overrides the dialect reported by the connection. It can be set once.
#[derive(Clone)]
pub struct EngineConfig {
    inner: Arc<EngineConfigInner>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            inner: Arc::new(EngineConfigInner::new()),
        }
    }

    pub fn log_statements(&self) -> bool {
        self.inner.log_statements.load(Ordering::Relaxed)
    }

    pub fn set_log_statements(&self, enabled: bool) {
        self.inner.log_statements.store(enabled, Ordering::Relaxed);
    }

    /// Dialect override, if one was set.
    pub fn dialect(&self) -> Option<Dialect> {
        self.inner.dialect.get().copied()
    }

    /// Sets the dialect override.
    ///
    /// Setting the same dialect again is accepted. Changing it fails with
    /// [ErrorKind::InvalidConfiguration].
    pub fn set_dialect(&self, dialect: Dialect) -> RowMapResult<()> {
        self.inner.set_dialect(dialect)
    }
}

struct EngineConfigInner {
    log_statements: AtomicBool,
    dialect: OnceLock<Dialect>,
}

impl EngineConfigInner {
    fn new() -> Self {
        EngineConfigInner {
            log_statements: AtomicBool::new(false),
            dialect: OnceLock::new(),
        }
    }

    fn set_dialect(&self, dialect: Dialect) -> RowMapResult<()> {
        let current = *self.dialect.get_or_init(|| dialect);
        if current != dialect {
            log::error!("Dialect is already set to {}", current);
            return Err(RowMapError::new(
                &format!("Dialect is already set to {}", current),
                ErrorKind::InvalidConfiguration,
            ));
        }
        Ok(())
    }
}
