//! Common types shared by the mapper, the query builder and the store adapters.
//!
//! - [`Value`] is the column value exchanged with a store.
//! - [`Convertible`] converts field types to and from [`Value`].
//! - [`naming`] holds the camelCase / snake_case conversions used for column names.

mod convertible;
pub mod naming;
mod sort_order;
mod value;

pub use convertible::*;
pub use sort_order::*;
pub use value::*;
