use crate::common::{Convertible, Value};
use crate::errors::{ErrorKind, RowMapError, RowMapResult};
use crate::mapper::{Entity, EntityDescriptor, Field, FieldDescriptor};

/// Hand-written entity shared by the unit tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Person {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub score: f64,
    pub category: String,
    pub active: bool,
    pub nickname: Option<String>,
    pub scratch: String,
}

impl Person {
    pub const ID: Field<Person, i64> = Field::new("id");
    pub const NAME: Field<Person, String> = Field::new("name");
    pub const AGE: Field<Person, i32> = Field::new("age");
    pub const SCORE: Field<Person, f64> = Field::new("score");
    pub const CATEGORY: Field<Person, String> = Field::new("category");
    pub const ACTIVE: Field<Person, bool> = Field::new("active");
    pub const NICKNAME: Field<Person, Option<String>> = Field::new("nickname");
    pub const SCRATCH: Field<Person, String> = Field::new("scratch");

    pub fn new(id: i64, name: &str, category: &str) -> Self {
        Person {
            id,
            name: name.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }
}

impl Entity for Person {
    fn describe() -> RowMapResult<EntityDescriptor> {
        EntityDescriptor::builder("person")
            .field(FieldDescriptor::of::<i64>("id").with_id())
            .field(FieldDescriptor::of::<String>("name"))
            .field(FieldDescriptor::of::<i32>("age"))
            .field(FieldDescriptor::of::<f64>("score"))
            .field(FieldDescriptor::of::<String>("category").with_column("group_name"))
            .field(FieldDescriptor::of::<bool>("active"))
            .field(FieldDescriptor::of::<Option<String>>("nickname"))
            .field(FieldDescriptor::excluded("scratch"))
            .build()
    }

    fn read_field(&self, logical_name: &str) -> RowMapResult<Value> {
        match logical_name {
            "id" => self.id.to_value(),
            "name" => self.name.to_value(),
            "age" => self.age.to_value(),
            "score" => self.score.to_value(),
            "category" => self.category.to_value(),
            "active" => self.active.to_value(),
            "nickname" => self.nickname.to_value(),
            _ => Err(RowMapError::new(logical_name, ErrorKind::UnknownField)),
        }
    }

    fn write_field(&mut self, logical_name: &str, value: &Value) -> RowMapResult<()> {
        match logical_name {
            "id" => self.id = Convertible::from_value(value)?,
            "name" => self.name = Convertible::from_value(value)?,
            "age" => self.age = Convertible::from_value(value)?,
            "score" => self.score = Convertible::from_value(value)?,
            "category" => self.category = Convertible::from_value(value)?,
            "active" => self.active = Convertible::from_value(value)?,
            "nickname" => self.nickname = Convertible::from_value(value)?,
            _ => return Err(RowMapError::new(logical_name, ErrorKind::UnknownField)),
        }
        Ok(())
    }
}

/// Entity without a primary key.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct AuditLine {
    pub message: String,
}

impl AuditLine {
    pub const MESSAGE: Field<AuditLine, String> = Field::new("message");
}

impl Entity for AuditLine {
    fn describe() -> RowMapResult<EntityDescriptor> {
        EntityDescriptor::builder("audit_line")
            .field(FieldDescriptor::of::<String>("message"))
            .build()
    }

    fn read_field(&self, logical_name: &str) -> RowMapResult<Value> {
        match logical_name {
            "message" => self.message.to_value(),
            _ => Err(RowMapError::new(logical_name, ErrorKind::UnknownField)),
        }
    }

    fn write_field(&mut self, logical_name: &str, value: &Value) -> RowMapResult<()> {
        match logical_name {
            "message" => self.message = Convertible::from_value(value)?,
            _ => return Err(RowMapError::new(logical_name, ErrorKind::UnknownField)),
        }
        Ok(())
    }
}
