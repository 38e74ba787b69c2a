use crate::crud::{AuditEntry, User};
use rowmap::common::Value;
use rowmap::errors::{ErrorCategory, ErrorKind, RowMapError, RowMapResult};
use rowmap::mapper::{EntityDescriptor, Field, FieldDescriptor};
use rowmap::query::condition;
use rowmap::Entity;
use rowmap_int_test::test_util::{cleanup, create_test_context, run_test};

#[derive(Debug, Entity, Default)]
#[entity(table = "ghosts")]
struct Ghost {
    #[entity(id)]
    id: i64,
    name: String,
}

#[derive(Debug, Entity, Default, PartialEq)]
#[entity(table = "people")]
struct Renamed {
    #[entity(id)]
    id: i64,
    #[entity(column = "grp")]
    category: String,
}

#[derive(Debug, Entity, Default, PartialEq)]
#[entity(table = "docs")]
struct Doc {
    #[entity(id)]
    id: i64,
    title: String,
    #[entity(exclude)]
    payload: Vec<u8>,
}

/// Maps the BLOB column of `docs` onto a text field.
#[derive(Debug, Entity, Default)]
#[entity(table = "docs")]
struct DocWithPayload {
    #[entity(id)]
    id: i64,
    payload: String,
}

const DOCS_SCHEMA: &str = "
    CREATE TABLE docs (id INTEGER PRIMARY KEY, title TEXT, payload BLOB);
    INSERT INTO docs (id, title, payload) VALUES (1, 'manual', x'00ff10');
";

/// Hand-written entity that tags two fields as the key.
#[derive(Debug, Default)]
struct TwoKeys {
    left: i64,
    right: i64,
}

impl TwoKeys {
    const LEFT: Field<TwoKeys, i64> = Field::new("left");
}

impl Entity for TwoKeys {
    fn describe() -> RowMapResult<EntityDescriptor> {
        EntityDescriptor::builder("two_keys")
            .field(FieldDescriptor::of::<i64>("left").with_id())
            .field(FieldDescriptor::of::<i64>("right").with_id())
            .build()
    }

    fn read_field(&self, logical_name: &str) -> RowMapResult<Value> {
        match logical_name {
            "left" => Ok(Value::I64(self.left)),
            "right" => Ok(Value::I64(self.right)),
            _ => Err(RowMapError::new(logical_name, ErrorKind::UnknownField)),
        }
    }

    fn write_field(&mut self, _logical_name: &str, _value: &Value) -> RowMapResult<()> {
        Ok(())
    }
}

// =============================================================================
// MAPPING ERRORS
// =============================================================================

#[test]
fn test_insert_without_primary_key() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            let entry = AuditEntry {
                message: "boot".to_string(),
                level: 1,
            };

            for err in [
                engine.insert(&entry).unwrap_err(),
                engine.update(&entry).unwrap_err(),
                engine.upsert(&entry).unwrap_err(),
            ] {
                assert_eq!(err.kind(), &ErrorKind::NoPrimaryKey);
                assert_eq!(err.category(), ErrorCategory::Mapping);
            }
            assert!(ctx.statements().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_multiple_primary_keys() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;

            let err = engine.insert(&TwoKeys::default()).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MultiplePrimaryKeys);

            let err = engine
                .select_where(condition::<TwoKeys>().equals(TwoKeys::LEFT, 1))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::MultiplePrimaryKeys);

            assert!(ctx.statements().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_unmappable_column_fails_whole_read() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.connection().execute_batch(
                "INSERT INTO users (id, user_name, age) VALUES (1, 'alice', 30);
                 INSERT INTO users (id, user_name, age) VALUES (2, 'bob', 'unknown');",
            )?;

            let err = ctx.engine()?.select_all::<User>().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ObjectMapping);
            assert!(err.message().contains("age"));
            assert_eq!(err.cause().map(|c| c.kind()), Some(&ErrorKind::ObjectMapping));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_null_in_non_nullable_column_keeps_default() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.connection()
                .execute_batch("INSERT INTO users (id, user_name) VALUES (1, NULL);")?;

            let users: Vec<User> = ctx.engine()?.select_all()?;
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].user_name, "");
            assert_eq!(users[0].age, 0);
            assert!(!users[0].active);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_column_missing_from_table_fails_read() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.connection().execute_batch(
                "CREATE TABLE people (id INTEGER PRIMARY KEY, group_name TEXT);
                 INSERT INTO people (id, group_name) VALUES (1, 'A');",
            )?;
            let engine = ctx.engine()?;

            let err = engine.select_all::<Renamed>().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ObjectMapping);
            assert!(err.message().contains("grp"));
            assert!(err.message().contains("people"));

            let err = engine.select_one(condition::<Renamed>()).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::ObjectMapping);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_excluded_field_over_blob_column_is_readable() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.connection().execute_batch(DOCS_SCHEMA)?;

            let docs: Vec<Doc> = ctx.engine()?.select_all()?;
            assert_eq!(
                docs,
                vec![Doc {
                    id: 1,
                    title: "manual".to_string(),
                    payload: vec![],
                }]
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_persistent_field_over_blob_column_is_unsupported() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.connection().execute_batch(DOCS_SCHEMA)?;

            let err = ctx.engine()?.select_all::<DocWithPayload>().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::UnsupportedFieldType);
            assert_eq!(err.category(), ErrorCategory::Mapping);
            assert!(err.message().contains("payload"));
            Ok(())
        },
        cleanup,
    )
}

// =============================================================================
// QUERY BUILD ERRORS
// =============================================================================

#[test]
fn test_grouped_select_fails_before_execution() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx
                .engine()?
                .select_where(condition::<User>().group_by(User::CATEGORY))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::GroupedSelect);
            assert_eq!(err.category(), ErrorCategory::QueryBuild);
            assert!(ctx.statements().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_like_without_pattern() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            let builder = condition::<User>()
                .like(User::USER_NAME, None)
                .equals(User::AGE, 3);
            assert_eq!(builder.build().unwrap_err().kind(), &ErrorKind::NullPattern);

            let err = engine.delete_where(builder).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NullPattern);
            assert!(ctx.statements().is_empty());
            Ok(())
        },
        cleanup,
    )
}

// =============================================================================
// EXECUTION ERRORS
// =============================================================================

#[test]
fn test_read_on_missing_table() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.engine()?.select_all::<Ghost>().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::Execution);
            assert_eq!(err.statement(), Some("SELECT * FROM ghosts"));
            assert!(err.cause().is_some());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_write_on_missing_table() {
    run_test(
        create_test_context,
        |ctx| {
            let ghost = Ghost {
                id: 1,
                name: "casper".to_string(),
            };
            let result = ctx.engine()?.insert(&ghost)?;
            assert!(!result.is_success());
            assert_eq!(result.affected_rows(), 0);

            let err = result.error().unwrap();
            assert_eq!(err.kind(), &ErrorKind::Execution);
            assert_eq!(err.statement(), Some("INSERT INTO ghosts (id, name) VALUES (?, ?)"));

            let err = result.into_result().unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Execution);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_duplicate_key_insert() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            engine.insert(&User::new(1, "alice", "A"))?.into_result()?;

            let result = engine.insert(&User::new(1, "again", "A"))?;
            assert!(!result.is_success());
            assert_eq!(result.error().map(|e| e.kind()), Some(&ErrorKind::Execution));

            let users: Vec<User> = engine.select_all()?;
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].user_name, "alice");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_raw_query() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx.engine()?.query_raw("SELEC nothing").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::Execution);
            assert_eq!(err.statement(), Some("SELEC nothing"));
            Ok(())
        },
        cleanup,
    )
}
