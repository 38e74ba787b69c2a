//! Fluent query conditions.
//!
//! [ConditionBuilder] collects predicates, grouping, ordering and pagination for one
//! entity and renders them as the tail of a SELECT, COUNT or DELETE statement.
//!
//! ```rust,ignore
//! use rowmap::query::condition;
//!
//! let query = condition::<Note>()
//!     .like(Note::TITLE, Some("draft"))
//!     .order_by(Note::CREATED_AT, false);
//! let notes = engine.select_where(query)?;
//! ```

mod condition;
mod predicate;

pub use condition::*;
pub use predicate::*;
