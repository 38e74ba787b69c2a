//! # rowmap - a small object-relational mapper
//!
//! rowmap maps plain structs to table rows, builds filtered queries through a typed
//! fluent builder and runs generic CRUD statements over one SQL connection.
//!
//! ## Key Features
//!
//! - **Derived metadata**: `#[derive(Entity)]` describes the table, the primary key and
//!   the column of every field
//! - **Typed field references**: queries name fields through generated constants such as
//!   `User::USER_NAME`, never through column strings
//! - **Fluent conditions**: equality, comparison, LIKE, ORDER BY, GROUP BY and LIMIT
//! - **Generic CRUD**: select, grouped count, insert, update, upsert and delete for any
//!   entity
//! - **Pluggable connection**: anything implementing [SqlConnection](store::SqlConnection);
//!   a SQLite adapter ships with the `sqlite` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rowmap::query::condition;
//! use rowmap::repository::CrudEngine;
//! use rowmap::store::SqliteConnection;
//! use rowmap::Entity;
//!
//! #[derive(Entity, Default, Debug)]
//! #[entity(table = "users")]
//! pub struct User {
//!     #[entity(id)]
//!     pub id: i64,
//!     pub user_name: String,
//!     pub age: i32,
//! }
//!
//! # fn main() -> rowmap::errors::RowMapResult<()> {
//! let connection = SqliteConnection::open_in_memory()?;
//! connection.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, user_name TEXT, age INTEGER)")?;
//!
//! let engine = CrudEngine::new(connection);
//! engine.insert(&User { id: 1, user_name: "alice".into(), age: 31 })?;
//!
//! let adults: Vec<User> = engine.select_where(
//!     condition::<User>()
//!         .greater_than(User::AGE, 17)
//!         .order_by(User::USER_NAME, true),
//! )?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Literal interpolation
//!
//! Condition values are embedded in the SQL text as literals, not bound as parameters,
//! and string literals are not escaped. Never build conditions from untrusted input.
//! Inserts, updates and upserts do bind their values.
//!
//! ## Module Organization
//!
//! - [`common`] - Column values, conversions and naming rules
//! - [`errors`] - Error types and result definitions
//! - [`mapper`] - Entity descriptors, field tokens and row conversion
//! - [`query`] - Fluent condition builder
//! - [`repository`] - The CRUD engine and write results
//! - [`store`] - Connection abstraction and the SQLite adapter
//! - [`engine_config`] - Engine settings
//! - [`engine_builder`] - Engine builder

extern crate self as rowmap;

pub mod common;
pub mod engine_builder;
pub mod engine_config;
pub mod errors;
pub mod mapper;
pub mod query;
pub mod repository;
pub mod store;

#[cfg(test)]
mod test_support;

pub use common::Value;
pub use mapper::Entity;
pub use rowmap_derive::Entity;

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
