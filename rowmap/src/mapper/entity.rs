use crate::common::naming::to_snake_case;
use crate::common::{Convertible, Value, ValueType};
use crate::errors::{ErrorKind, RowMapError, RowMapResult};

/// A struct that maps to one table.
///
/// Usually implemented through `#[derive(Entity)]`. A hand-written implementation builds
/// its descriptor with [EntityDescriptor::builder] and dispatches `read_field` /
/// `write_field` on the logical field name.
///
/// # Examples
///
/// ```rust,ignore
/// use rowmap::Entity;
///
/// #[derive(Entity, Default)]
/// #[entity(table = "users")]
/// struct User {
///     #[entity(id)]
///     id: i64,
///     user_name: String,
///     #[entity(exclude)]
///     session: Option<String>,
/// }
/// ```
pub trait Entity: Default + 'static {
    /// Computes the descriptor from static metadata. Not cached; use
    /// [describe](crate::mapper::describe) to go through the process-wide cache.
    fn describe() -> RowMapResult<EntityDescriptor>;

    /// Reads a persistent field by its logical name.
    fn read_field(&self, logical_name: &str) -> RowMapResult<Value>;

    /// Coerces `value` into the field type and stores it.
    fn write_field(&mut self, logical_name: &str, value: &Value) -> RowMapResult<()>;
}

/// Metadata for one declared field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    logical_name: String,
    column_name: String,
    excluded: bool,
    is_id: bool,
    value_type: Option<ValueType>,
    nullable: bool,
}

impl FieldDescriptor {
    /// Creates a persistent field whose column name is the snake_case form of its name.
    pub fn new(logical_name: &str, value_type: ValueType, nullable: bool) -> Self {
        FieldDescriptor {
            logical_name: logical_name.to_string(),
            column_name: to_snake_case(logical_name),
            excluded: false,
            is_id: false,
            value_type: Some(value_type),
            nullable,
        }
    }

    /// Creates a persistent field typed after `T`.
    ///
    /// Only [Convertible] types have a column mapping, so an unsupported field type is
    /// rejected at compile time.
    pub fn of<T: Convertible>(logical_name: &str) -> Self {
        FieldDescriptor::new(logical_name, T::VALUE_TYPE, T::NULLABLE)
    }

    /// Creates a field that never takes part in generated SQL.
    pub fn excluded(logical_name: &str) -> Self {
        FieldDescriptor {
            logical_name: logical_name.to_string(),
            column_name: String::new(),
            excluded: true,
            is_id: false,
            value_type: None,
            nullable: true,
        }
    }

    /// Overrides the column name.
    pub fn with_column(mut self, column_name: &str) -> Self {
        self.column_name = column_name.to_string();
        self
    }

    /// Marks the field as the primary key.
    pub fn with_id(mut self) -> Self {
        self.is_id = true;
        self
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }

    pub fn is_id(&self) -> bool {
        self.is_id
    }

    /// Column type, `None` for excluded fields.
    pub fn value_type(&self) -> Option<ValueType> {
        self.value_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }
}

/// Table-level metadata for an entity type: table name, primary key and fields in
/// declaration order.
///
/// A missing primary key is not an error here. Operations that need one ask for it
/// through [EntityDescriptor::primary_key_column] and fail with
/// [ErrorKind::NoPrimaryKey] at that point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    table_name: String,
    primary_key: Option<usize>,
    fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Starts a descriptor for the given table.
    pub fn builder(table_name: &str) -> EntityDescriptorBuilder {
        EntityDescriptorBuilder {
            table_name: table_name.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Column of the primary key, if one is declared.
    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key
            .and_then(|index| self.fields.get(index))
            .map(|f| f.column_name())
    }

    /// Column of the primary key.
    ///
    /// # Returns
    ///
    /// The column name, or [ErrorKind::NoPrimaryKey] if no field is tagged as the id.
    pub fn primary_key_column(&self) -> RowMapResult<&str> {
        self.primary_key_field().map(|f| f.column_name())
    }

    /// Descriptor of the primary key field.
    pub fn primary_key_field(&self) -> RowMapResult<&FieldDescriptor> {
        match self.primary_key.and_then(|index| self.fields.get(index)) {
            Some(field) => Ok(field),
            None => {
                log::error!("Entity {} has no primary key", self.table_name);
                Err(RowMapError::new(
                    &format!("Entity {} has no primary key", self.table_name),
                    ErrorKind::NoPrimaryKey,
                ))
            }
        }
    }

    /// All declared fields, excluded ones included.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields that take part in generated SQL, in declaration order.
    pub fn persistent_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.excluded)
    }

    pub fn field(&self, logical_name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.logical_name == logical_name)
    }

    /// Persistent field stored under `column_name`.
    pub fn field_by_column(&self, column_name: &str) -> Option<&FieldDescriptor> {
        self.persistent_fields()
            .find(|f| f.column_name == column_name)
    }
}

/// Builder for [EntityDescriptor]. Used by the derive and by hand-written entities.
pub struct EntityDescriptorBuilder {
    table_name: String,
    fields: Vec<FieldDescriptor>,
}

impl EntityDescriptorBuilder {
    /// Appends a field. Declaration order is kept.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the fields and produces the descriptor.
    ///
    /// Fails with [ErrorKind::MultiplePrimaryKeys] when more than one field is tagged as
    /// the id, and with [ErrorKind::UnsupportedFieldType] when the id field is excluded.
    pub fn build(self) -> RowMapResult<EntityDescriptor> {
        let ids: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_id)
            .map(|(index, _)| index)
            .collect();

        if ids.len() > 1 {
            log::error!("Entity {} declares more than one primary key", self.table_name);
            return Err(RowMapError::new(
                &format!("Entity {} declares more than one primary key", self.table_name),
                ErrorKind::MultiplePrimaryKeys,
            ));
        }

        if let Some(index) = ids.first() {
            if self.fields[*index].excluded {
                log::error!("Primary key of entity {} cannot be excluded", self.table_name);
                return Err(RowMapError::new(
                    &format!("Primary key of entity {} cannot be excluded", self.table_name),
                    ErrorKind::UnsupportedFieldType,
                ));
            }
        }

        for (index, field) in self.fields.iter().enumerate() {
            if self.fields[..index]
                .iter()
                .any(|f| f.logical_name == field.logical_name)
            {
                log::error!(
                    "Entity {} declares field {} twice",
                    self.table_name,
                    field.logical_name
                );
                return Err(RowMapError::new(
                    &format!(
                        "Entity {} declares field {} twice",
                        self.table_name, field.logical_name
                    ),
                    ErrorKind::Internal,
                ));
            }
        }

        Ok(EntityDescriptor {
            table_name: self.table_name,
            primary_key: ids.first().copied(),
            fields: self.fields,
        })
    }
}
