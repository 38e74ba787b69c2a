use crate::common::Value;
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use crate::mapper::{Entity, EntityDescriptor};
use crate::store::Row;

/// Reads every persistent field of `entity` as `(column, value)` pairs in declaration
/// order.
pub fn to_row<E: Entity>(
    entity: &E,
    descriptor: &EntityDescriptor,
) -> RowMapResult<Vec<(String, Value)>> {
    descriptor
        .persistent_fields()
        .map(|field| {
            entity
                .read_field(field.logical_name())
                .map(|value| (field.column_name().to_string(), value))
        })
        .collect()
}

/// Reads the primary key value of `entity`.
pub fn key_value<E: Entity>(entity: &E, descriptor: &EntityDescriptor) -> RowMapResult<Value> {
    let key = descriptor.primary_key_field()?;
    entity.read_field(key.logical_name())
}

/// Builds a new instance of `E` from a result row.
///
/// Starts from `E::default()` and sets each persistent field from its column. A NULL
/// column sets a nullable field to `None` and leaves any other field at its default.
///
/// # Returns
///
/// The populated instance, or [ErrorKind::ObjectMapping] when a persistent column is
/// missing from the row or its value cannot be coerced, or
/// [ErrorKind::UnsupportedFieldType] when the store returned a column type with no
/// value mapping. No partially populated instance is ever returned.
pub fn from_row<E: Entity>(row: &Row, descriptor: &EntityDescriptor) -> RowMapResult<E> {
    map_row(row, descriptor, false)
}

/// Like [from_row], but persistent columns missing from the row leave their fields at
/// the default. Used for hand-written projections.
pub fn from_partial_row<E: Entity>(row: &Row, descriptor: &EntityDescriptor) -> RowMapResult<E> {
    map_row(row, descriptor, true)
}

fn map_row<E: Entity>(
    row: &Row,
    descriptor: &EntityDescriptor,
    allow_missing: bool,
) -> RowMapResult<E> {
    let mut entity = E::default();
    for field in descriptor.persistent_fields() {
        let column = field.column_name();
        let value = match row.get(column) {
            Some(value) => value,
            None if row.is_unmapped(column) => {
                log::error!(
                    "Column {} of {} has a type with no value mapping",
                    column,
                    descriptor.table_name()
                );
                return Err(RowMapError::new(
                    &format!(
                        "Column {} of {} has a type with no value mapping",
                        column,
                        descriptor.table_name()
                    ),
                    ErrorKind::UnsupportedFieldType,
                ));
            }
            None if allow_missing => continue,
            None => {
                log::error!(
                    "Column {} of {} is missing from the result row",
                    column,
                    descriptor.table_name()
                );
                return Err(RowMapError::new(
                    &format!(
                        "Column {} of {} is missing from the result row",
                        column,
                        descriptor.table_name()
                    ),
                    ErrorKind::ObjectMapping,
                ));
            }
        };

        if value.is_null() && !field.is_nullable() {
            continue;
        }

        if let Err(err) = entity.write_field(field.logical_name(), value) {
            log::error!(
                "Failed to map column {} of {}: {}",
                column,
                descriptor.table_name(),
                err
            );
            return Err(RowMapError::new_with_cause(
                &format!(
                    "Failed to map column {} of {}",
                    column,
                    descriptor.table_name()
                ),
                ErrorKind::ObjectMapping,
                err,
            ));
        }
    }
    Ok(entity)
}
