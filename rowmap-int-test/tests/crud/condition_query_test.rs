use crate::crud::User;
use rowmap::errors::RowMapResult;
use rowmap::query::condition;
use rowmap_int_test::test_util::{cleanup, create_test_context, run_test, timestamp, TestContext};

fn seed(ctx: &TestContext) -> RowMapResult<()> {
    let engine = ctx.engine()?;
    let people = [
        (1, "alice", 31, 4.5, true, "A", Some("ally")),
        (2, "bob", 17, 2.0, false, "B", None),
        (3, "carol", 45, 3.5, true, "A", Some("caz")),
        (4, "dave", 17, 1.0, true, "C", None),
        (5, "malice", 60, 5.0, false, "B", Some("mal")),
    ];

    for (id, name, age, score, active, category, nickname) in people {
        engine
            .insert(&User {
                id,
                user_name: name.to_string(),
                age,
                score,
                active,
                joined: timestamp(2024, 1, id as u32, 9, 0, 0),
                nickname: nickname.map(String::from),
                category: category.to_string(),
                session_tags: vec![],
            })?
            .into_result()?;
    }
    Ok(())
}

fn ids(users: &[User]) -> Vec<i64> {
    users.iter().map(|u| u.id).collect()
}

#[test]
fn test_equals_string() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx
                .engine()?
                .select_where(condition::<User>().equals(User::USER_NAME, "carol"))?;
            assert_eq!(ids(&users), vec![3]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE user_name = 'carol'"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_equals_number_is_unquoted() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx.engine()?.select_where(
                condition::<User>()
                    .equals(User::AGE, 17)
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&users), vec![2, 4]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE age = 17 ORDER BY id ASC"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_comparisons_are_anded() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx.engine()?.select_where(
                condition::<User>()
                    .greater_or_equal(User::AGE, 31)
                    .less_than(User::SCORE, 5.0)
                    .order_by(User::AGE, false),
            )?;
            assert_eq!(ids(&users), vec![3, 1]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE age >= 31 AND score < 5 ORDER BY age DESC"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_not_equals_and_less_or_equal() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx.engine()?.select_where(
                condition::<User>()
                    .not_equals(User::CATEGORY, "A")
                    .less_or_equal(User::AGE, 17)
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&users), vec![2, 4]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_greater_than_boolean_and_timestamp() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let engine = ctx.engine()?;

            let active: Vec<User> = engine.select_where(
                condition::<User>()
                    .equals(User::ACTIVE, true)
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&active), vec![1, 3, 4]);

            let late: Vec<User> = engine.select_where(
                condition::<User>()
                    .greater_than(User::JOINED, timestamp(2024, 1, 3, 9, 0, 0))
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&late), vec![4, 5]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE joined > '2024-01-03 09:00:00' ORDER BY id ASC"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_like_matches_substring() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx.engine()?.select_where(
                condition::<User>()
                    .like(User::USER_NAME, Some("lice"))
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&users), vec![1, 5]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE user_name LIKE '%lice%' ORDER BY id ASC"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_like_on_nullable_text() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx
                .engine()?
                .select_where(condition::<User>().like(User::NICKNAME, Some("a")))?;
            let mut found = ids(&users);
            found.sort();
            assert_eq!(found, vec![1, 3, 5]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_null_equality_matches_missing_values() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let engine = ctx.engine()?;

            let without: Vec<User> = engine.select_where(
                condition::<User>()
                    .equals(User::NICKNAME, None::<String>)
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&without), vec![2, 4]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE nickname IS NULL ORDER BY id ASC"
            );

            let with: Vec<User> = engine.select_where(
                condition::<User>()
                    .not_equals(User::NICKNAME, None::<String>)
                    .order_by(User::ID, true),
            )?;
            assert_eq!(ids(&with), vec![1, 3, 5]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_renamed_column_in_condition() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let users: Vec<User> = ctx.engine()?.select_where(
                condition::<User>()
                    .equals(User::CATEGORY, "B")
                    .order_by(User::USER_NAME, false),
            )?;
            assert_eq!(ids(&users), vec![5, 2]);
            assert_eq!(
                ctx.last_statement().unwrap(),
                "SELECT * FROM users WHERE group_name = 'B' ORDER BY user_name DESC"
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_pagination() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let page: Vec<User> = ctx.engine()?.select_where(
                condition::<User>()
                    .order_by(User::ID, true)
                    .limit(2, 2),
            )?;
            assert_eq!(ids(&page), vec![3, 4]);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_empty_condition_selects_everything() {
    run_test(
        create_test_context,
        |ctx| {
            seed(&ctx)?;
            let builder = condition::<User>();
            assert_eq!(builder.build()?, "");

            let users: Vec<User> = ctx.engine()?.select_where(builder)?;
            assert_eq!(users.len(), 5);
            assert_eq!(ctx.last_statement().unwrap(), "SELECT * FROM users");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_build_is_repeatable() {
    let builder = condition::<User>()
        .equals(User::USER_NAME, "alice")
        .group_by(User::CATEGORY)
        .order_by(User::AGE, true)
        .limit(0, 10);

    let first = builder.build().unwrap();
    assert_eq!(
        first,
        "WHERE user_name = 'alice' GROUP BY (group_name) ORDER BY age ASC LIMIT 0,10"
    );
    assert_eq!(builder.build().unwrap(), first);
}
