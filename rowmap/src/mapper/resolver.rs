use crate::common::naming::{to_camel_case, to_snake_case};
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use crate::mapper::{EntityDescriptor, Field};

/// Resolves a field token to its column name.
///
/// # Arguments
///
/// * `field` - Token generated for the entity
/// * `descriptor` - Descriptor of the same entity
///
/// # Returns
///
/// The column name, honouring any column override. Fails with [ErrorKind::UnknownField]
/// when the name is not a persistent field of the descriptor.
pub fn resolve<'d, E, V>(
    field: Field<E, V>,
    descriptor: &'d EntityDescriptor,
) -> RowMapResult<&'d str> {
    resolve_name(field.name(), descriptor)
}

/// Resolves a logical field name to its column name.
pub fn resolve_name<'d>(logical_name: &str, descriptor: &'d EntityDescriptor) -> RowMapResult<&'d str> {
    match descriptor.field(logical_name) {
        Some(field) if !field.is_excluded() => Ok(field.column_name()),
        Some(_) => {
            log::error!(
                "Field {} of {} is excluded from persistence",
                logical_name,
                descriptor.table_name()
            );
            Err(RowMapError::new(
                &format!(
                    "Field {} of {} is excluded from persistence",
                    logical_name,
                    descriptor.table_name()
                ),
                ErrorKind::UnknownField,
            ))
        }
        None => Err(unknown_field(logical_name, descriptor)),
    }
}

/// Resolves an accessor name such as `getUserName`, `isActive` or `get_user_name` to the
/// column of the field it reads.
///
/// The accessor must start with `get` or `is` followed by an uppercase letter or `_`,
/// otherwise it fails with [ErrorKind::InvalidAccessor]. The remainder, with its first
/// character lower-cased, is matched against each persistent field's logical name as-is,
/// in snake_case and in camelCase. An unmatched name fails with [ErrorKind::UnknownField].
pub fn resolve_accessor<'d>(
    accessor_name: &str,
    descriptor: &'d EntityDescriptor,
) -> RowMapResult<&'d str> {
    let candidate = accessor_field_name(accessor_name)?;
    let snake = to_snake_case(&candidate);

    descriptor
        .persistent_fields()
        .find(|f| {
            let logical = f.logical_name();
            logical == candidate || logical == snake || to_camel_case(logical) == candidate
        })
        .map(|f| f.column_name())
        .ok_or_else(|| unknown_field(accessor_name, descriptor))
}

/// Strips the accessor prefix and returns the logical field name it refers to.
pub fn accessor_field_name(accessor_name: &str) -> RowMapResult<String> {
    let remainder = ["get", "is"]
        .iter()
        .find_map(|prefix| accessor_name.strip_prefix(*prefix));

    let remainder = match remainder {
        Some(rest) => rest.strip_prefix('_').unwrap_or(rest),
        None => return Err(invalid_accessor(accessor_name)),
    };

    let prefix_len = accessor_name.len() - remainder.len();
    let separated = accessor_name[..prefix_len].ends_with('_');

    let mut chars = remainder.chars();
    match chars.next() {
        Some(first) if separated || first.is_uppercase() => {
            let mut name: String = first.to_lowercase().collect();
            name.push_str(chars.as_str());
            Ok(name)
        }
        _ => Err(invalid_accessor(accessor_name)),
    }
}

fn invalid_accessor(accessor_name: &str) -> RowMapError {
    log::error!("{} is not a get/is accessor name", accessor_name);
    RowMapError::new(
        &format!("{} is not a get/is accessor name", accessor_name),
        ErrorKind::InvalidAccessor,
    )
}

fn unknown_field(name: &str, descriptor: &EntityDescriptor) -> RowMapError {
    log::error!(
        "No persistent field matches {} in {}",
        name,
        descriptor.table_name()
    );
    RowMapError::new(
        &format!(
            "No persistent field matches {} in {}",
            name,
            descriptor.table_name()
        ),
        ErrorKind::UnknownField,
    )
}
