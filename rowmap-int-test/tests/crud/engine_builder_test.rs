use crate::crud::Item;
use rowmap::engine_builder::CrudEngineBuilder;
use rowmap::errors::ErrorKind;
use rowmap::repository::CrudEngine;
use rowmap::store::{Dialect, SqliteConnection};
use rowmap_int_test::test_util::{cleanup, create_test_context, run_test, FIXTURE_SCHEMA};

#[test]
fn test_engine_over_plain_sqlite_connection() {
    let connection = SqliteConnection::open_in_memory().unwrap();
    connection.execute_batch(FIXTURE_SCHEMA).unwrap();

    let engine = CrudEngine::new(connection);
    assert_eq!(engine.dialect(), Dialect::Sqlite);
    assert!(!engine.config().log_statements());

    let item = Item {
        id: 1,
        label: "washer".to_string(),
        amount: Some(250),
    };
    assert_eq!(engine.insert(&item).unwrap().affected_rows(), 1);

    let items: Vec<Item> = engine.select_all().unwrap();
    assert_eq!(items, vec![item]);
}

#[test]
fn test_builder_enables_statement_logging() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            assert!(engine.config().log_statements());
            assert_eq!(engine.dialect(), Dialect::Sqlite);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_mysql_dialect_changes_upsert_keyword() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = CrudEngineBuilder::new()
                .dialect_name("mysql")
                .open(ctx.connection())?;
            assert_eq!(engine.dialect(), Dialect::MySql);

            let item = Item {
                id: 2,
                label: "nut".to_string(),
                amount: None,
            };
            // SQLite accepts REPLACE INTO as an alias, so the write still lands
            engine.upsert(&item)?.into_result()?;
            assert_eq!(
                ctx.last_statement().unwrap(),
                "REPLACE INTO Item (id, label, amount) VALUES (?, ?, ?)"
            );

            let items: Vec<Item> = engine.select_all()?;
            assert_eq!(items, vec![item]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_builder_reports_bad_dialect() {
    run_test(
        create_test_context,
        |ctx| {
            let err = CrudEngineBuilder::new()
                .log_statements(true)
                .dialect_name("postgres")
                .open(ctx.connection())
                .err()
                .unwrap();
            assert_eq!(err.kind(), &ErrorKind::InvalidConfiguration);
            Ok(())
        },
        cleanup,
    )
}
