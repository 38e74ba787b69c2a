//! Entity metadata and row conversion.
//!
//! An [Entity] describes its table through an [EntityDescriptor]. Descriptors are cached
//! process-wide by [describe]. Field tokens ([Field]) resolve to column names through the
//! [resolver], and [to_row] / [from_row] / [from_partial_row] move values between
//! instances and result rows.

mod entity;
mod field;
mod registry;
pub mod resolver;
mod row_mapping;

pub use entity::*;
pub use field::*;
pub use registry::*;
pub use resolver::{resolve, resolve_accessor};
pub use row_mapping::*;
