use crate::crud::User;
use rowmap::common::Value;
use rowmap::errors::ErrorKind;
use rowmap::query::condition;
use rowmap_int_test::test_util::{cleanup, create_test_context, run_test};
use std::collections::HashMap;

#[test]
fn test_count_by_group() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            engine.insert(&User::new(1, "alice", "A"))?.into_result()?;
            engine.insert(&User::new(2, "bob", "A"))?.into_result()?;
            engine.insert(&User::new(3, "carol", "B"))?.into_result()?;

            let counts = engine.count_by_group(condition::<User>().group_by(User::CATEGORY))?;
            let expected: HashMap<Value, i64> =
                HashMap::from([(Value::from("A"), 2), (Value::from("B"), 1)]);
            assert_eq!(counts, expected);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT group_name, count(*) AS count FROM users GROUP BY (group_name)"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_by_group_with_filter() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            for (id, name, category) in [(1, "alice", "A"), (2, "bob", "A"), (3, "carol", "B")] {
                let mut user = User::new(id, name, category);
                user.age = 20 * id as i32;
                engine.insert(&user)?.into_result()?;
            }

            let counts = engine.count_by_group(
                condition::<User>()
                    .greater_than(User::AGE, 30)
                    .group_by(User::CATEGORY),
            )?;
            assert_eq!(counts.get(&Value::from("A")), Some(&1));
            assert_eq!(counts.get(&Value::from("B")), Some(&1));
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT group_name, count(*) AS count FROM users WHERE age > 30 GROUP BY (group_name)"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_by_numeric_group() {
    run_test(
        create_test_context,
        |ctx| {
            let engine = ctx.engine()?;
            for id in 1..=4 {
                let mut user = User::new(id, "u", "A");
                user.age = if id < 4 { 30 } else { 40 };
                engine.insert(&user)?.into_result()?;
            }

            let counts = engine.count_by_group(condition::<User>().group_by(User::AGE))?;
            assert_eq!(counts.len(), 2);
            // integer keys compare by value whatever their width
            assert_eq!(counts.get(&Value::I32(30)), Some(&3));
            assert_eq!(counts.get(&Value::I64(40)), Some(&1));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_by_group_on_empty_table() {
    run_test(
        create_test_context,
        |ctx| {
            let counts = ctx
                .engine()?
                .count_by_group(condition::<User>().group_by(User::CATEGORY))?;
            assert!(counts.is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_without_group_fails_before_execution() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx
                .engine()?
                .count_by_group(condition::<User>().equals(User::CATEGORY, "A"))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NoGroupBy);
            assert!(ctx.statements().is_empty());
            Ok(())
        },
        cleanup,
    )
}
