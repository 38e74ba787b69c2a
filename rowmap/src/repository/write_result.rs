use crate::errors::{RowMapError, RowMapResult};

/// The outcome of an insert, update, upsert or delete.
///
/// A write that reached the store but failed there is not an `Err` of the engine call.
/// It comes back as a `WriteResult` with zero affected rows and the store error attached,
/// so callers can tell "nothing matched" apart from "the statement failed".
///
/// # Examples
///
/// ```rust,ignore
/// let result = engine.insert(&user)?;
/// match result.error() {
///     Some(err) => log::error!("insert failed: {}", err),
///     None => assert_eq!(result.affected_rows(), 1),
/// }
/// ```
#[derive(Debug)]
pub struct WriteResult {
    affected_rows: usize,
    error: Option<RowMapError>,
}

impl WriteResult {
    /// Creates a successful result.
    ///
    /// # Arguments
    ///
    /// * `affected_rows` - Row count reported by the store
    pub fn new(affected_rows: usize) -> Self {
        WriteResult {
            affected_rows,
            error: None,
        }
    }

    /// Creates a failed result with zero affected rows.
    pub fn failed(error: RowMapError) -> Self {
        WriteResult {
            affected_rows: 0,
            error: Some(error),
        }
    }

    pub fn affected_rows(&self) -> usize {
        self.affected_rows
    }

    pub fn error(&self) -> Option<&RowMapError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Turns the result into the affected row count, or the store error.
    pub fn into_result(self) -> RowMapResult<usize> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.affected_rows),
        }
    }
}
