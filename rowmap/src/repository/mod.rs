//! CRUD execution for entities.
//!
//! [CrudEngine] turns entity descriptors and condition builders into SQL statements, runs
//! them through a [SqlConnection](crate::store::SqlConnection) and maps rows back into
//! entities.

mod crud_engine;
pub mod statement;
mod write_result;

pub use crud_engine::*;
pub use write_result::*;
