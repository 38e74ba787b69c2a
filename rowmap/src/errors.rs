use backtrace::Backtrace;
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Broad families of [ErrorKind].
///
/// Mapping and query-build failures are detected before any statement is sent to the
/// store. Execution failures come back from the store itself.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorCategory {
    /// The entity metadata or a value could not be mapped.
    Mapping,
    /// The condition builder was used in a way that cannot produce valid SQL.
    QueryBuild,
    /// The store rejected or failed the statement.
    Execution,
    /// The engine was configured with invalid settings.
    Configuration,
    /// Broken internal invariant.
    Internal,
}

/// Error kinds for rowmap operations.
///
/// # Examples
///
/// ```rust,ignore
/// use rowmap::errors::{RowMapError, ErrorKind, RowMapResult};
///
/// fn example() -> RowMapResult<()> {
///     Err(RowMapError::new("Entity User has no primary key", ErrorKind::NoPrimaryKey))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Mapping errors
    /// A field type has no column mapping
    UnsupportedFieldType,
    /// The operation needs a primary key but the entity declares none
    NoPrimaryKey,
    /// More than one field is tagged as the primary key
    MultiplePrimaryKeys,
    /// An accessor name does not follow the `get<Field>`/`is<Field>` convention
    InvalidAccessor,
    /// No persistent field matches the requested name
    UnknownField,
    /// A column value could not be coerced into the field type
    ObjectMapping,

    // Query build errors
    /// A grouped count was requested without a GROUP BY clause
    NoGroupBy,
    /// A LIKE predicate was given no pattern
    NullPattern,
    /// A plain SELECT was requested on a grouped builder
    GroupedSelect,

    // Execution errors
    /// The store failed the statement
    Execution,

    /// An engine setting is invalid or was set twice
    InvalidConfiguration,

    /// Internal error (usually indicates a bug)
    Internal,
}

impl ErrorKind {
    /// Returns the family this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::UnsupportedFieldType
            | ErrorKind::NoPrimaryKey
            | ErrorKind::MultiplePrimaryKeys
            | ErrorKind::InvalidAccessor
            | ErrorKind::UnknownField
            | ErrorKind::ObjectMapping => ErrorCategory::Mapping,
            ErrorKind::NoGroupBy | ErrorKind::NullPattern | ErrorKind::GroupedSelect => {
                ErrorCategory::QueryBuild
            }
            ErrorKind::Execution => ErrorCategory::Execution,
            ErrorKind::InvalidConfiguration => ErrorCategory::Configuration,
            ErrorKind::Internal => ErrorCategory::Internal,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnsupportedFieldType => write!(f, "Unsupported field type"),
            ErrorKind::NoPrimaryKey => write!(f, "No primary key"),
            ErrorKind::MultiplePrimaryKeys => write!(f, "Multiple primary keys"),
            ErrorKind::InvalidAccessor => write!(f, "Invalid accessor"),
            ErrorKind::UnknownField => write!(f, "Unknown field"),
            ErrorKind::ObjectMapping => write!(f, "Object mapping error"),
            ErrorKind::NoGroupBy => write!(f, "No group by"),
            ErrorKind::NullPattern => write!(f, "Null pattern"),
            ErrorKind::GroupedSelect => write!(f, "Grouped select"),
            ErrorKind::Execution => write!(f, "Execution error"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::Internal => write!(f, "Internal error"),
        }
    }
}

/// Custom rowmap error type.
///
/// `RowMapError` carries a message, a kind, the SQL statement that was being run (for
/// execution errors) and an optional cause. The backtrace is captured unresolved and
/// only symbolized when the error is debug-printed.
///
/// # Examples
///
/// ```rust,ignore
/// use rowmap::errors::{RowMapError, ErrorKind};
///
/// let cause = RowMapError::new("no such table: users", ErrorKind::Execution);
/// let err = RowMapError::execution("SELECT * FROM users", cause);
/// assert_eq!(err.statement(), Some("SELECT * FROM users"));
/// ```
#[derive(Clone)]
pub struct RowMapError {
    message: String,
    error_kind: ErrorKind,
    statement: Option<String>,
    cause: Option<Box<RowMapError>>,
    backtrace: Arc<Mutex<Backtrace>>,
}

impl RowMapError {
    /// Creates a new `RowMapError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        RowMapError {
            message: message.to_string(),
            error_kind,
            statement: None,
            cause: None,
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    /// Creates a new `RowMapError` with a cause error.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: RowMapError) -> Self {
        RowMapError {
            message: message.to_string(),
            error_kind,
            statement: None,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Mutex::new(Backtrace::new_unresolved())),
        }
    }

    /// Wraps a store failure together with the statement that triggered it.
    ///
    /// # Arguments
    ///
    /// * `statement` - The generated SQL text
    /// * `cause` - The failure reported by the connection
    pub fn execution(statement: &str, cause: RowMapError) -> Self {
        let message = format!("Failed to execute `{}`: {}", statement, cause.message());
        let mut error = RowMapError::new_with_cause(&message, ErrorKind::Execution, cause);
        error.statement = Some(statement.to_string());
        error
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.error_kind.category()
    }

    /// The SQL text attached to an execution error.
    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    pub fn cause(&self) -> Option<&RowMapError> {
        self.cause.as_deref()
    }
}

impl Display for RowMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for RowMapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => {
                let mut backtrace = self.backtrace.lock();
                backtrace.resolve();
                write!(f, "{}\n{:?}", self.message, *backtrace)
            }
        }
    }
}

impl Error for RowMapError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for rowmap operations.
pub type RowMapResult<T> = Result<T, RowMapError>;

impl From<std::num::ParseIntError> for RowMapError {
    fn from(err: std::num::ParseIntError) -> Self {
        RowMapError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::ObjectMapping,
        )
    }
}

impl From<std::num::ParseFloatError> for RowMapError {
    fn from(err: std::num::ParseFloatError) -> Self {
        RowMapError::new(
            &format!("Float parsing error: {}", err),
            ErrorKind::ObjectMapping,
        )
    }
}

impl From<std::num::TryFromIntError> for RowMapError {
    fn from(err: std::num::TryFromIntError) -> Self {
        RowMapError::new(
            &format!("Integer out of range: {}", err),
            ErrorKind::ObjectMapping,
        )
    }
}

impl From<chrono::ParseError> for RowMapError {
    fn from(err: chrono::ParseError) -> Self {
        RowMapError::new(
            &format!("Timestamp parsing error: {}", err),
            ErrorKind::ObjectMapping,
        )
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for RowMapError {
    fn from(err: rusqlite::Error) -> Self {
        RowMapError::new(&format!("SQLite error: {}", err), ErrorKind::Execution)
    }
}
