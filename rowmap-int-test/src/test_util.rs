use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use rowmap::common::Value;
use rowmap::engine_builder::CrudEngineBuilder;
use rowmap::errors::RowMapResult;
use rowmap::repository::CrudEngine;
use rowmap::store::{Dialect, Row, SqlConnection, SqliteConnection};
use std::backtrace::Backtrace;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tables every test context starts with.
pub const FIXTURE_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        user_name TEXT,
        age INTEGER,
        score REAL,
        active INTEGER,
        joined TEXT,
        nickname TEXT,
        group_name TEXT
    );
    CREATE TABLE audit_log (message TEXT, level INTEGER);
    CREATE TABLE Item (id INTEGER PRIMARY KEY, label TEXT, amount INTEGER);
";

/// Runs a test with retry logic and error handling.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> RowMapResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> RowMapResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> RowMapResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    const MAX_RETRIES: u32 = 3;
    let mut last_error: Option<String> = None;

    for attempt in 1..=MAX_RETRIES {
        let start_time = Instant::now();

        let result = std::panic::catch_unwind(|| {
            let backtrace = Backtrace::capture();
            match before() {
                Ok(ctx) => match test(ctx.clone()) {
                    Ok(_) => match after(ctx) {
                        Ok(_) => Ok(()),
                        Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
                    },
                    Err(e) => {
                        let _ = after(ctx);
                        Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                    }
                },
                Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
            }
        });

        let elapsed = start_time.elapsed();

        let message = match result {
            Ok(Ok(_)) => return,
            Ok(Err((e, bt))) => {
                if !bt.is_empty() && !bt.contains("disabled") {
                    eprintln!("Backtrace:\n{}", bt);
                }
                e
            }
            Err(panic_err) => {
                if let Some(s) = panic_err.downcast_ref::<&str>() {
                    format!("Panic: {}", s)
                } else if let Some(s) = panic_err.downcast_ref::<String>() {
                    format!("Panic: {}", s)
                } else {
                    "Panic: unknown payload".to_string()
                }
            }
        };

        if attempt < MAX_RETRIES {
            eprintln!(
                "\n========== Test Attempt {}/{} Failed (took {:?}) ==========",
                attempt, MAX_RETRIES, elapsed
            );
            eprintln!("Error: {}", message);
            eprintln!("Retrying in {}ms...\n", 100 * attempt);
            thread::sleep(Duration::from_millis(100 * attempt as u64));
        }
        last_error = Some(message);
    }

    panic!(
        "Test failed after {} attempts. Last error: {}",
        MAX_RETRIES,
        last_error.unwrap_or_default()
    );
}

/// Connection wrapper that records every statement it is asked to run.
pub struct RecordingConnection {
    inner: SqliteConnection,
    statements: Mutex<Vec<String>>,
}

impl RecordingConnection {
    pub fn new(inner: SqliteConnection) -> Self {
        RecordingConnection {
            inner,
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().clone()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.statements.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.statements.lock().clear();
    }

    pub fn execute_batch(&self, sql: &str) -> RowMapResult<()> {
        self.inner.execute_batch(sql)
    }
}

impl SqlConnection for RecordingConnection {
    fn query(&self, sql: &str) -> RowMapResult<Vec<Row>> {
        self.statements.lock().push(sql.to_string());
        self.inner.query(sql)
    }

    fn execute(&self, sql: &str, params: &[Value]) -> RowMapResult<usize> {
        self.statements.lock().push(sql.to_string());
        self.inner.execute(sql, params)
    }

    fn dialect(&self) -> Dialect {
        self.inner.dialect()
    }
}

#[derive(Clone)]
pub struct TestContext {
    connection: Arc<RecordingConnection>,
}

impl TestContext {
    pub fn new(connection: RecordingConnection) -> Self {
        TestContext {
            connection: Arc::new(connection),
        }
    }

    pub fn connection(&self) -> Arc<RecordingConnection> {
        self.connection.clone()
    }

    /// Engine over the shared connection with statement logging on.
    pub fn engine(&self) -> RowMapResult<CrudEngine<Arc<RecordingConnection>>> {
        CrudEngineBuilder::new()
            .log_statements(true)
            .open(self.connection.clone())
    }

    pub fn statements(&self) -> Vec<String> {
        self.connection.statements()
    }

    pub fn last_statement(&self) -> Option<String> {
        self.connection.last_statement()
    }
}

/// Opens an in-memory SQLite database with the fixture tables.
pub fn create_test_context() -> RowMapResult<TestContext> {
    let sqlite = SqliteConnection::open_in_memory()?;
    sqlite.execute_batch(FIXTURE_SCHEMA)?;
    Ok(TestContext::new(RecordingConnection::new(sqlite)))
}

pub fn cleanup(ctx: TestContext) -> RowMapResult<()> {
    ctx.connection.clear();
    Ok(())
}

pub fn timestamp(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, min, sec))
        .unwrap_or_default()
}
