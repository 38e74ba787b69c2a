//! SQL text for each engine operation. Pure string assembly, nothing is executed here.

use crate::store::Dialect;
use itertools::Itertools;

fn with_fragment(head: String, fragment: &str) -> String {
    if fragment.is_empty() {
        head
    } else {
        format!("{} {}", head, fragment)
    }
}

fn placeholders(count: usize) -> String {
    std::iter::repeat("?").take(count).join(", ")
}

/// `SELECT * FROM <table>[ <fragment>]`
pub fn select_statement(table: &str, fragment: &str) -> String {
    with_fragment(format!("SELECT * FROM {}", table), fragment)
}

/// `SELECT <group>, count(*) AS count FROM <table> <fragment>`
pub fn count_statement(table: &str, group_column: &str, fragment: &str) -> String {
    with_fragment(
        format!("SELECT {}, count(*) AS count FROM {}", group_column, table),
        fragment,
    )
}

/// `INSERT INTO <table> (<cols>) VALUES (?, ...)`
pub fn insert_statement(table: &str, columns: &[&str]) -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.iter().join(", "),
        placeholders(columns.len())
    )
}

/// `UPDATE <table> SET c1 = ?, ... WHERE <pk> = ?`
pub fn update_statement(table: &str, columns: &[&str], primary_key: &str) -> String {
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table,
        columns.iter().map(|c| format!("{} = ?", c)).join(", "),
        primary_key
    )
}

/// Insert-or-replace over all columns, keyword chosen by dialect.
pub fn upsert_statement(dialect: Dialect, table: &str, columns: &[&str]) -> String {
    format!(
        "{} {} ({}) VALUES ({})",
        dialect.upsert_keyword(),
        table,
        columns.iter().join(", "),
        placeholders(columns.len())
    )
}

/// `DELETE FROM <table>[ <fragment>]`
pub fn delete_statement(table: &str, fragment: &str) -> String {
    with_fragment(format!("DELETE FROM {}", table), fragment)
}
