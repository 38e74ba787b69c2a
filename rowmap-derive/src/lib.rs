#![recursion_limit = "128"]
//! # rowmap Derive Macros
//!
//! This crate provides the `Entity` derive used by `rowmap`.
//!
//! ## `Entity`
//!
//! Derives the `rowmap::mapper::Entity` trait for a struct with named fields. The
//! generated code:
//!
//! - builds the entity descriptor (table name, primary key and column of every field)
//! - reads and writes fields by logical name through `Convertible`
//! - adds one typed field constant per persisted field, named after the field in upper
//!   snake case (`user_name` and `userName` both become `User::USER_NAME`)
//!
//! ### Attributes
//!
//! - `#[entity(table = "...")]` on the struct overrides the table name. The struct name is
//!   used otherwise.
//! - `#[entity(id)]` marks the primary key field.
//! - `#[entity(column = "...")]` overrides a column name. The snake case field name is used
//!   otherwise.
//! - `#[entity(exclude)]` keeps a field out of every generated statement. Excluded fields
//!   are left at their `Default` value when rows are mapped.
//!
//! # Examples
//!
//! ```rust,ignore
//! use rowmap::Entity;
//!
//! #[derive(Entity, Default)]
//! #[entity(table = "users")]
//! pub struct User {
//!     #[entity(id)]
//!     pub id: i64,
//!     #[entity(column = "login")]
//!     pub user_name: String,
//!     pub nickname: Option<String>,
//!     #[entity(exclude)]
//!     pub session: Vec<u8>,
//! }
//! ```

extern crate proc_macro;
mod entity;

use crate::entity::generate_entity_for_struct;
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives the `Entity` trait for row mapping.
///
/// # Supported Types
///
/// - Structs with named fields only
/// - Enums, unions, tuple structs and unit structs are not supported
///
/// # Errors
///
/// Returns a compile error if:
/// - Applied to an enum or union
/// - More than one field is tagged `#[entity(id)]`
/// - The id field is also tagged `#[entity(exclude)]`
/// - A persisted field's type does not implement `Convertible`
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    match ast.data {
        Data::Struct(ref data) => match generate_entity_for_struct(&ast, data) {
            Ok(token_stream) => token_stream,
            Err(e) => {
                let error = syn::Error::new(
                    e.span(),
                    format!("Failed to derive Entity for struct '{}': {}", ast.ident, e),
                );
                error.to_compile_error().into()
            }
        },
        Data::Enum(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Entity for enums. Only structs with named fields are supported.",
            );
            error.to_compile_error().into()
        }
        Data::Union(_) => {
            let error = syn::Error::new_spanned(
                &ast,
                "Cannot derive Entity for unions. Only structs with named fields are supported.",
            );
            error.to_compile_error().into()
        }
    }
}
